use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::Error;

/// A list of documents as returned by a list endpoint.
///
/// Endpoints answer either with a bare array or with `{ "data": [...] }`;
/// both are accepted. Elements are decoded one at a time: an element that
/// cannot be read as `T` is dropped and counted in `rejected` instead of
/// failing the whole batch.
#[derive(Debug, Clone)]
pub struct RecordBatch<T> {
    pub records: Vec<T>,
    pub rejected: usize,
}

impl<T: DeserializeOwned> RecordBatch<T> {
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, Error> {
        let items = match value {
            Value::Array(items) => items,
            Value::Object(mut map) => match map.remove("data") {
                Some(Value::Array(items)) => items,
                _ => return Err(Error::UnexpectedShape { found: "object" }),
            },
            Value::Null => return Err(Error::UnexpectedShape { found: "null" }),
            Value::Bool(_) => return Err(Error::UnexpectedShape { found: "boolean" }),
            Value::Number(_) => return Err(Error::UnexpectedShape { found: "number" }),
            Value::String(_) => return Err(Error::UnexpectedShape { found: "string" }),
        };

        let mut records = Vec::with_capacity(items.len());
        let mut rejected = 0;
        for (index, item) in items.into_iter().enumerate() {
            match serde_json::from_value::<T>(item) {
                Ok(record) => records.push(record),
                Err(e) => {
                    rejected += 1;
                    tracing::debug!("Skipping element {}: {}", index, e);
                }
            }
        }
        tracing::debug!(
            "Decoded batch of {} records ({} rejected)",
            records.len(),
            rejected
        );
        Ok(Self { records, rejected })
    }
}

impl<T> RecordBatch<T> {
    pub fn into_inner(self) -> Vec<T> {
        self.records
    }

    /// Number of elements that could not be decoded.
    pub fn rejected(&self) -> usize {
        self.rejected
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
