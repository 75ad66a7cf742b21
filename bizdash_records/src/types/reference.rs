//! References between documents.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::lenient_string;

/// A reference to another document.
///
/// The backend either returns the bare identifier or, when the relation was
/// populated, the referenced document itself. Anything else (a number, a
/// boolean) is kept as `Other` and carries neither id nor name.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum RawRef {
    Id(String),
    Doc(RefDoc),
    Other(Value),
}

/// The subset of a populated document the analytics care about.
///
/// Products, clients, users, suppliers and payments all share this shape; the
/// fields that do not apply to a given kind are simply absent.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RefDoc {
    #[serde(rename = "_id", default, deserialize_with = "lenient_string")]
    pub id: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub username: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub first_name: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub last_name: Option<String>,

    /// Unit cost of a populated product.
    #[serde(default)]
    pub cost_price: Option<Value>,

    /// Amount of a populated payment.
    #[serde(default)]
    pub amount: Option<Value>,
}

impl RawRef {
    /// Identifier of the referenced document, if one is known.
    pub fn id(&self) -> Option<&str> {
        match self {
            RawRef::Id(id) => Some(id.as_str()),
            RawRef::Doc(doc) => doc.id.as_deref(),
            RawRef::Other(_) => None,
        }
    }

    /// Human-readable label: `name`, then `username`, then `firstName lastName`.
    pub fn display_name(&self) -> Option<String> {
        let doc = match self {
            RawRef::Id(_) | RawRef::Other(_) => return None,
            RawRef::Doc(doc) => doc,
        };

        if let Some(name) = non_blank(doc.name.as_deref()) {
            return Some(name.to_string());
        }
        if let Some(username) = non_blank(doc.username.as_deref()) {
            return Some(username.to_string());
        }

        let full = [doc.first_name.as_deref(), doc.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if full.is_empty() {
            None
        } else {
            Some(full)
        }
    }

    /// The populated document, if this reference was populated.
    pub fn doc(&self) -> Option<&RefDoc> {
        match self {
            RawRef::Id(_) | RawRef::Other(_) => None,
            RawRef::Doc(doc) => Some(doc),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
