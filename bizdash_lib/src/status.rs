//! Payment-status breakdown of sales.
//!
//! Dates play no part here; the classifier works on whatever slice of sales
//! it is handed. Sales whose status is neither completed, partially paid nor
//! pending are left out of all three groups.

use std::collections::HashMap;

use serde::Serialize;

use crate::model::{PaymentRecord, SaleRecord, SaleStatus};

/// Totals for one status group.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct StatusBucket {
    pub count: usize,
    pub total_amount: f64,
    pub paid_amount: f64,
    /// `total_amount - paid_amount`. Negative when the sales were overpaid.
    pub outstanding_balance: f64,
}

impl StatusBucket {
    fn add(&mut self, total: f64, paid: f64) {
        self.count += 1;
        self.total_amount += total;
        self.paid_amount += paid;
        self.outstanding_balance = self.total_amount - self.paid_amount;
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct StatusBreakdown {
    pub completed: StatusBucket,
    pub partially_paid: StatusBucket,
    pub pending: StatusBucket,
    /// Sales left out because of an untracked status (cancelled, refunded, ...).
    pub excluded: usize,
}

/// Looks up payment amounts by payment id and by the sale they point back to.
#[derive(Debug, Default)]
pub struct PaymentIndex<'a> {
    by_id: HashMap<&'a str, f64>,
    by_sale: HashMap<&'a str, Vec<&'a PaymentRecord>>,
}

impl<'a> PaymentIndex<'a> {
    pub fn new(payments: &'a [PaymentRecord]) -> Self {
        let mut by_id = HashMap::with_capacity(payments.len());
        let mut by_sale: HashMap<&str, Vec<&PaymentRecord>> = HashMap::new();
        for p in payments {
            *by_id.entry(p.id.as_str()).or_insert(0.0) += p.amount;
            if let Some(sale_id) = p.sale_id.as_deref() {
                by_sale.entry(sale_id).or_default().push(p);
            }
        }
        Self { by_id, by_sale }
    }

    /// Amount paid against `sale`: populated payment amounts as recorded,
    /// otherwise the amount of the referenced payment in the index, plus any
    /// payment pointing back at the sale that the sale does not list itself.
    /// Never capped at the sale total.
    pub fn amount_paid(&self, sale: &SaleRecord) -> f64 {
        let listed: f64 = sale
            .payments
            .iter()
            .map(|p| match (p.amount, p.id.as_deref()) {
                (Some(amount), _) => amount,
                (None, Some(id)) => self.by_id.get(id).copied().unwrap_or(0.0),
                (None, None) => 0.0,
            })
            .sum();

        let listed_ids: Vec<&str> = sale.payments.iter().filter_map(|r| r.id.as_deref()).collect();
        let back_linked: f64 = self
            .by_sale
            .get(sale.id.as_str())
            .map(|payments| {
                payments
                    .iter()
                    .filter(|p| !listed_ids.contains(&p.id.as_str()))
                    .map(|p| p.amount)
                    .sum()
            })
            .unwrap_or(0.0);

        listed + back_linked
    }
}

/// Partitions `sales` by payment status.
///
/// `payments` resolves payment references that were not populated on the sale
/// and supplies payments recorded against a sale that does not list them.
pub fn classify_by_status(sales: &[SaleRecord], payments: &[PaymentRecord]) -> StatusBreakdown {
    let index = PaymentIndex::new(payments);
    let mut breakdown = StatusBreakdown::default();

    for sale in sales {
        let bucket = match sale.status {
            SaleStatus::Completed => &mut breakdown.completed,
            SaleStatus::PartiallyPaid => &mut breakdown.partially_paid,
            SaleStatus::Pending => &mut breakdown.pending,
            SaleStatus::Cancelled | SaleStatus::Other(_) => {
                breakdown.excluded += 1;
                continue;
            }
        };
        bucket.add(sale.total_amount, index.amount_paid(sale));
    }

    breakdown
}
