use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{lenient_string, null_as_default, RawRef};

/// A sale document as stored by the backend.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawSale {
    #[serde(rename = "_id", default, deserialize_with = "lenient_string")]
    pub id: Option<String>,

    /// Creation timestamp: an ISO-8601 string or epoch milliseconds.
    #[serde(default)]
    pub created_at: Option<Value>,

    #[serde(default)]
    pub total_amount: Option<Value>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub products: Vec<RawLineItem>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub status: Option<String>,

    #[serde(default)]
    pub client: Option<RawRef>,

    /// The selling user.
    #[serde(default, alias = "seller", alias = "createdBy")]
    pub user: Option<RawRef>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub payments: Vec<RawRef>,

    /// Explicit profit recorded on the sale, when the backend stored one.
    #[serde(default)]
    pub profit: Option<Value>,
}

/// One product line of a sale.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawLineItem {
    #[serde(default)]
    pub product: Option<RawRef>,

    #[serde(default)]
    pub quantity: Option<Value>,

    /// Unit price charged at the time of sale.
    #[serde(default, alias = "price", alias = "unitPrice")]
    pub price_at_sale: Option<Value>,

    /// Unit cost captured on the line itself; takes precedence over the product's.
    #[serde(default)]
    pub cost_price: Option<Value>,
}
