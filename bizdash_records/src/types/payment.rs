use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{lenient_string, RawRef};

/// A payment collected against a sale.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawPayment {
    #[serde(rename = "_id", default, deserialize_with = "lenient_string")]
    pub id: Option<String>,

    #[serde(default)]
    pub amount: Option<Value>,

    /// When the money was received. May fall in a different period than the sale.
    #[serde(default, alias = "date")]
    pub payment_date: Option<Value>,

    #[serde(default)]
    pub created_at: Option<Value>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub method: Option<String>,

    #[serde(default)]
    pub sale: Option<RawRef>,

    /// The user who collected the payment.
    #[serde(default, alias = "collectedBy")]
    pub user: Option<RawRef>,
}
