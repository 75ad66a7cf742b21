use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{lenient_string, RawRef};

/// An operating expense.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawExpense {
    #[serde(rename = "_id", default, deserialize_with = "lenient_string")]
    pub id: Option<String>,

    #[serde(default)]
    pub amount: Option<Value>,

    #[serde(default, alias = "date")]
    pub created_at: Option<Value>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub category: Option<String>,

    #[serde(default)]
    pub supplier: Option<RawRef>,

    /// The user who recorded the expense.
    #[serde(default)]
    pub user: Option<RawRef>,
}
