use serde::{Deserialize, Deserializer};
use serde_json::Value;

mod batch;
pub use self::batch::RecordBatch;

mod reference;
pub use self::reference::{RawRef, RefDoc};

mod sale;
pub use self::sale::{RawLineItem, RawSale};

mod payment;
pub use self::payment::RawPayment;

mod expense;
pub use self::expense::RawExpense;

/// Decodes `null` the same way as an absent field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Reads a label or identifier. Numbers are kept as their decimal text; any
/// other JSON type reads as absent.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
