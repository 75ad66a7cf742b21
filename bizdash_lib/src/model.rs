//! Canonical record shapes consumed by every aggregation component.
//!
//! These are produced by [`crate::normalize`] from the loosely-typed wire
//! documents. Amounts are non-negative and dates are calendar days already
//! resolved through the configured UTC offset.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

/// A stable reference to a product, client, user or supplier.
///
/// `id` is the aggregation key. `name` is for display only and may repeat
/// across distinct entities.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityRef {
    pub id: String,
    pub name: String,
}

impl EntityRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Lifecycle status of a sale.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    Pending,
    PartiallyPaid,
    Completed,
    Cancelled,
    /// Any status string outside the known set, kept verbatim.
    Other(String),
}

impl SaleStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "pending" => SaleStatus::Pending,
            "partially_paid" => SaleStatus::PartiallyPaid,
            "completed" => SaleStatus::Completed,
            "cancelled" | "canceled" => SaleStatus::Cancelled,
            _ => SaleStatus::Other(raw.trim().to_string()),
        }
    }
}

impl fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaleStatus::Pending => write!(f, "pending"),
            SaleStatus::PartiallyPaid => write!(f, "partially_paid"),
            SaleStatus::Completed => write!(f, "completed"),
            SaleStatus::Cancelled => write!(f, "cancelled"),
            SaleStatus::Other(s) => write!(f, "{}", s),
        }
    }
}

/// How a payment was made.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMethod {
    Cash,
    MobileMoney,
    Credit,
    Other,
}

impl PaymentMethod {
    /// Parses a method label; unknown labels map to [`PaymentMethod::Other`].
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().replace(['_', ' '], "-").as_str() {
            "cash" | "especes" | "espèces" => PaymentMethod::Cash,
            "mobile-money" | "mobile" | "momo" | "orange-money" | "wave" => {
                PaymentMethod::MobileMoney
            }
            "credit" | "crédit" | "card" => PaymentMethod::Credit,
            _ => PaymentMethod::Other,
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::MobileMoney => "mobile-money",
            PaymentMethod::Credit => "credit",
            PaymentMethod::Other => "other",
        };
        write!(f, "{}", label)
    }
}

/// One product line of a sale.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct LineItem {
    pub product: Option<EntityRef>,
    pub quantity: f64,
    pub price_at_sale: f64,
    /// Unit cost, when either the line or the populated product carried one.
    pub cost_price: Option<f64>,
}

impl LineItem {
    /// Revenue of the line: unit price at sale times quantity.
    pub fn revenue(&self) -> f64 {
        self.price_at_sale * self.quantity
    }

    /// Profit of the line. An unknown cost counts as zero.
    pub fn profit(&self) -> f64 {
        (self.price_at_sale - self.cost_price.unwrap_or(0.0)) * self.quantity
    }
}

/// A reference from a sale to one of its payments.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PaymentRef {
    pub id: Option<String>,
    /// Present when the payment document was populated inline.
    pub amount: Option<f64>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SaleRecord {
    pub id: String,
    pub created_on: Option<NaiveDate>,
    pub total_amount: f64,
    pub items: Vec<LineItem>,
    pub status: SaleStatus,
    pub client: Option<EntityRef>,
    pub seller: Option<EntityRef>,
    pub payments: Vec<PaymentRef>,
    /// Profit stored explicitly on the sale document.
    pub profit: Option<f64>,
}

impl SaleRecord {
    /// Number of product units sold on this sale.
    pub fn units(&self) -> f64 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PaymentRecord {
    pub id: String,
    pub amount: f64,
    pub paid_on: Option<NaiveDate>,
    pub created_on: Option<NaiveDate>,
    pub method: PaymentMethod,
    pub sale_id: Option<String>,
    pub collected_by: Option<EntityRef>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ExpenseRecord {
    pub id: String,
    pub amount: f64,
    pub created_on: Option<NaiveDate>,
    pub category: String,
    pub supplier: Option<EntityRef>,
    pub recorded_by: Option<EntityRef>,
}

/// A normalized snapshot of everything one aggregation run looks at.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct RecordSet {
    pub sales: Vec<SaleRecord>,
    pub payments: Vec<PaymentRecord>,
    pub expenses: Vec<ExpenseRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_variants() {
        assert_eq!(SaleStatus::parse("completed"), SaleStatus::Completed);
        assert_eq!(SaleStatus::parse("Partially-Paid"), SaleStatus::PartiallyPaid);
        assert_eq!(SaleStatus::parse(" pending "), SaleStatus::Pending);
        assert_eq!(SaleStatus::parse("canceled"), SaleStatus::Cancelled);
        assert_eq!(
            SaleStatus::parse("refunded"),
            SaleStatus::Other("refunded".to_string())
        );
    }

    #[test]
    fn test_method_parse_variants() {
        assert_eq!(PaymentMethod::parse("cash"), PaymentMethod::Cash);
        assert_eq!(PaymentMethod::parse("mobile_money"), PaymentMethod::MobileMoney);
        assert_eq!(PaymentMethod::parse("Mobile Money"), PaymentMethod::MobileMoney);
        assert_eq!(PaymentMethod::parse("credit"), PaymentMethod::Credit);
        assert_eq!(PaymentMethod::parse("cheque"), PaymentMethod::Other);
    }

    #[test]
    fn test_line_item_profit_without_cost_is_revenue() {
        let item = LineItem {
            product: None,
            quantity: 2.0,
            price_at_sale: 1000.0,
            cost_price: None,
        };
        assert_eq!(item.revenue(), 2000.0);
        assert_eq!(item.profit(), 2000.0);
    }

    #[test]
    fn test_line_item_profit_with_cost() {
        let item = LineItem {
            product: None,
            quantity: 3.0,
            price_at_sale: 1000.0,
            cost_price: Some(750.0),
        };
        assert_eq!(item.profit(), 750.0);
    }
}
