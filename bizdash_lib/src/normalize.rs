//! Record normalization: raw wire documents into canonical records.
//!
//! Nothing in here fails. Missing amounts become zero, unparseable amounts
//! become zero and are counted, and records whose date cannot be read are kept
//! with no date so that they still reach status classification and rankings
//! while being skipped by the bucketer.

use bizdash_records::{RawExpense, RawLineItem, RawPayment, RawRef, RawSale};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::model::{
    EntityRef, ExpenseRecord, LineItem, PaymentMethod, PaymentRecord, PaymentRef, RecordSet,
    SaleRecord, SaleStatus,
};
use crate::scope::Scope;

/// Label given to expenses recorded without a category.
pub const UNCATEGORIZED: &str = "uncategorized";

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

/// Counts of records the normalizer had to repair or set aside.
#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizationReport {
    pub undated_sales: usize,
    pub undated_payments: usize,
    pub undated_expenses: usize,
    /// Amount fields that were present but unusable (non-numeric, negative, non-finite).
    pub coerced_amounts: usize,
}

impl NormalizationReport {
    /// Records excluded from the bucketed series.
    pub fn skipped_from_buckets(&self) -> usize {
        self.undated_sales + self.undated_payments + self.undated_expenses
    }

    /// Undated records in an already-normalized set. Coerced amounts are not
    /// recoverable at this point and stay zero.
    pub fn count_undated(records: &RecordSet) -> Self {
        Self {
            undated_sales: records.sales.iter().filter(|s| s.created_on.is_none()).count(),
            undated_payments: records.payments.iter().filter(|p| p.paid_on.is_none()).count(),
            undated_expenses: records.expenses.iter().filter(|e| e.created_on.is_none()).count(),
            coerced_amounts: 0,
        }
    }
}

/// Output of a normalization pass.
#[derive(Debug, Clone, Default)]
pub struct Normalized {
    pub records: RecordSet,
    pub report: NormalizationReport,
}

impl Normalized {
    /// Narrows the records to `scope`. Undated counts follow the records that
    /// survive; the coerced-amount count is carried over unchanged.
    pub fn scoped(&self, scope: &Scope) -> Normalized {
        let records = scope.apply(&self.records);
        let report = NormalizationReport {
            coerced_amounts: self.report.coerced_amounts,
            ..NormalizationReport::count_undated(&records)
        };
        Normalized { records, report }
    }
}

/// Converts raw documents into canonical records.
///
/// Timestamps are shifted by `utc_offset` before their calendar day is taken,
/// so every component agrees on which day an instant belongs to.
#[derive(Debug, Clone)]
pub struct Normalizer {
    utc_offset: FixedOffset,
    report: NormalizationReport,
}

impl Normalizer {
    pub fn new(utc_offset_minutes: i32) -> Self {
        let utc_offset = utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix());
        Self {
            utc_offset,
            report: NormalizationReport::default(),
        }
    }

    /// Normalizes one batch of each record kind.
    pub fn run(
        mut self,
        sales: &[RawSale],
        payments: &[RawPayment],
        expenses: &[RawExpense],
    ) -> Normalized {
        let records = RecordSet {
            sales: sales
                .iter()
                .enumerate()
                .map(|(idx, raw)| self.sale(idx, raw))
                .collect(),
            payments: payments
                .iter()
                .enumerate()
                .map(|(idx, raw)| self.payment(idx, raw))
                .collect(),
            expenses: expenses
                .iter()
                .enumerate()
                .map(|(idx, raw)| self.expense(idx, raw))
                .collect(),
        };

        Normalized {
            records,
            report: self.report,
        }
    }

    fn sale(&mut self, idx: usize, raw: &RawSale) -> SaleRecord {
        let id = raw.id.clone().unwrap_or_else(|| format!("sale-{}", idx));
        let created_on = parse_calendar_date(raw.created_at.as_ref(), self.utc_offset);
        if created_on.is_none() {
            self.report.undated_sales += 1;
            tracing::debug!("Sale {} has no usable creation date, skipped from buckets", id);
        }

        let status = match raw.status.as_deref() {
            Some(s) => SaleStatus::parse(s),
            None => SaleStatus::Pending,
        };
        if let SaleStatus::Other(ref label) = status {
            tracing::debug!("Sale {} has untracked status '{}'", id, label);
        }

        let total_amount = self.amount(raw.total_amount.as_ref());
        let items = raw.products.iter().map(|item| self.line_item(item)).collect();
        let payments = raw
            .payments
            .iter()
            .map(|p| PaymentRef {
                id: p.id().map(str::to_string),
                amount: p
                    .doc()
                    .and_then(|doc| doc.amount.as_ref())
                    .filter(|v| !v.is_null())
                    .map(|v| self.amount(Some(v))),
            })
            .collect();
        let profit = raw
            .profit
            .as_ref()
            .filter(|v| !v.is_null())
            .and_then(parse_number);

        SaleRecord {
            id,
            created_on,
            total_amount,
            items,
            status,
            client: raw.client.as_ref().and_then(entity_ref),
            seller: raw.user.as_ref().and_then(entity_ref),
            payments,
            profit,
        }
    }

    fn line_item(&mut self, raw: &RawLineItem) -> LineItem {
        let cost_price = raw
            .cost_price
            .as_ref()
            .or_else(|| {
                raw.product
                    .as_ref()
                    .and_then(RawRef::doc)
                    .and_then(|doc| doc.cost_price.as_ref())
            })
            .and_then(parse_amount);

        LineItem {
            product: raw.product.as_ref().and_then(entity_ref),
            quantity: self.amount(raw.quantity.as_ref()),
            price_at_sale: self.amount(raw.price_at_sale.as_ref()),
            cost_price,
        }
    }

    fn payment(&mut self, idx: usize, raw: &RawPayment) -> PaymentRecord {
        let id = raw.id.clone().unwrap_or_else(|| format!("payment-{}", idx));
        let paid_on = parse_calendar_date(raw.payment_date.as_ref(), self.utc_offset);
        if paid_on.is_none() {
            self.report.undated_payments += 1;
            tracing::debug!("Payment {} has no usable payment date, skipped from buckets", id);
        }

        let method = match raw.method.as_deref() {
            Some(m) => PaymentMethod::parse(m),
            None => PaymentMethod::Other,
        };
        if method == PaymentMethod::Other {
            tracing::debug!("Payment {} method {:?} counted as other", id, raw.method);
        }

        PaymentRecord {
            amount: self.amount(raw.amount.as_ref()),
            paid_on,
            created_on: parse_calendar_date(raw.created_at.as_ref(), self.utc_offset),
            method,
            sale_id: raw.sale.as_ref().and_then(|s| s.id()).map(str::to_string),
            collected_by: raw.user.as_ref().and_then(entity_ref),
            id,
        }
    }

    fn expense(&mut self, idx: usize, raw: &RawExpense) -> ExpenseRecord {
        let id = raw.id.clone().unwrap_or_else(|| format!("expense-{}", idx));
        let created_on = parse_calendar_date(raw.created_at.as_ref(), self.utc_offset);
        if created_on.is_none() {
            self.report.undated_expenses += 1;
            tracing::debug!("Expense {} has no usable date, skipped from buckets", id);
        }

        let category = raw
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(UNCATEGORIZED)
            .to_string();

        ExpenseRecord {
            amount: self.amount(raw.amount.as_ref()),
            created_on,
            category,
            supplier: raw.supplier.as_ref().and_then(entity_ref),
            recorded_by: raw.user.as_ref().and_then(entity_ref),
            id,
        }
    }

    /// Missing or null amounts are zero. Present but unusable amounts are zero and counted.
    fn amount(&mut self, value: Option<&Value>) -> f64 {
        match value {
            None | Some(Value::Null) => 0.0,
            Some(v) => match parse_amount(v) {
                Some(amount) => amount,
                None => {
                    self.report.coerced_amounts += 1;
                    tracing::debug!("Unusable amount {} treated as 0", v);
                    0.0
                }
            },
        }
    }
}

/// Normalizes raw batches with the given UTC offset.
pub fn normalize(
    sales: &[RawSale],
    payments: &[RawPayment],
    expenses: &[RawExpense],
    utc_offset_minutes: i32,
) -> Normalized {
    Normalizer::new(utc_offset_minutes).run(sales, payments, expenses)
}

/// Reads a JSON number or numeric string.
fn parse_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// A usable monetary amount or quantity: finite and non-negative.
pub fn parse_amount(value: &Value) -> Option<f64> {
    parse_number(value).filter(|n| *n >= 0.0)
}

/// Resolves a date field to a calendar day.
///
/// Accepts RFC 3339 timestamps (converted to `offset`), naive timestamps and
/// plain `YYYY-MM-DD` dates (taken as already local), and epoch milliseconds.
/// Anything else is treated as missing.
pub fn parse_calendar_date(value: Option<&Value>, offset: FixedOffset) -> Option<NaiveDate> {
    match value? {
        Value::String(s) => parse_date_str(s.trim(), offset),
        Value::Number(n) => {
            let millis = n.as_i64()?;
            DateTime::<Utc>::from_timestamp_millis(millis)
                .map(|dt| dt.with_timezone(&offset).date_naive())
        }
        _ => None,
    }
}

fn parse_date_str(s: &str, offset: FixedOffset) -> Option<NaiveDate> {
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&offset).date_naive());
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Builds a stable reference. Identified documents are keyed by id; a
/// populated document without an id falls back to a name-derived key.
fn entity_ref(raw: &RawRef) -> Option<EntityRef> {
    let name = raw.display_name();
    match (raw.id(), name) {
        (Some(id), Some(name)) => Some(EntityRef::new(id, name)),
        (Some(id), None) => Some(EntityRef::new(id, id)),
        (None, Some(name)) => Some(EntityRef::new(format!("name:{}", name), name)),
        (None, None) => None,
    }
}
