//! Error types for record decoding.

/// Errors that can occur when decoding a batch of records.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The payload was not valid JSON.
    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The payload was valid JSON but neither an array nor a `{ "data": [...] }` envelope.
    #[error("Expected a JSON array or an object with a `data` array, found {found}")]
    UnexpectedShape { found: &'static str },
}
