//! Derived financial metrics.
//!
//! The same formulas apply to a single bucket and to a whole record set.
//! Ratios are percentages. A ratio whose denominator is zero is reported as
//! 0, meaning "no data yet" rather than "zero performance".

use serde::Serialize;

use crate::bucket::{BucketKey, TimeBucket};
use crate::model::RecordSet;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct FinancialMetrics {
    pub sales_total: f64,
    pub paid_total: f64,
    pub expense_total: f64,
    pub transaction_count: usize,
    /// Cash collected minus expenses.
    pub gross_profit: f64,
    /// Revenue minus expenses.
    pub net_profit: f64,
    pub profit_margin: f64,
    pub net_margin: f64,
    pub operational_efficiency: f64,
    /// Gross profit over expenses.
    pub roi: f64,
    /// Cash collected over revenue.
    pub collection_rate: f64,
    pub average_sale: f64,
}

/// Metrics attached to one bucket of the series.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct BucketMetrics {
    pub key: BucketKey,
    pub metrics: FinancialMetrics,
}

/// `numerator / denominator` as a percentage, 0 when the denominator is 0.
pub fn percent(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator * 100.0
    }
}

/// Computes metrics from the three totals.
pub fn compute_metrics(sales_total: f64, expense_total: f64, paid_total: f64) -> FinancialMetrics {
    let gross_profit = paid_total - expense_total;
    let net_profit = sales_total - expense_total;

    FinancialMetrics {
        sales_total,
        paid_total,
        expense_total,
        transaction_count: 0,
        gross_profit,
        net_profit,
        profit_margin: percent(gross_profit, sales_total),
        net_margin: percent(net_profit, sales_total),
        operational_efficiency: percent(gross_profit, sales_total),
        roi: percent(gross_profit, expense_total),
        collection_rate: percent(paid_total, sales_total),
        average_sale: 0.0,
    }
}

impl FinancialMetrics {
    /// Sets the sale count and the average sale value derived from it.
    pub fn with_transactions(mut self, transaction_count: usize) -> Self {
        self.transaction_count = transaction_count;
        self.average_sale = if transaction_count == 0 {
            0.0
        } else {
            self.sales_total / transaction_count as f64
        };
        self
    }
}

pub fn metrics_for_bucket(bucket: &TimeBucket) -> FinancialMetrics {
    compute_metrics(bucket.sales_total, bucket.expense_total, bucket.paid_total)
        .with_transactions(bucket.transaction_count)
}

/// Per-bucket metrics, in series order.
pub fn per_bucket(series: &[TimeBucket]) -> Vec<BucketMetrics> {
    series
        .iter()
        .map(|b| BucketMetrics {
            key: b.key.clone(),
            metrics: metrics_for_bucket(b),
        })
        .collect()
}

/// Metrics over the totals of a bucketed series. Only dated records count.
pub fn summarize_series(series: &[TimeBucket]) -> FinancialMetrics {
    let sales_total = series.iter().map(|b| b.sales_total).sum();
    let paid_total = series.iter().map(|b| b.paid_total).sum();
    let expense_total = series.iter().map(|b| b.expense_total).sum();
    let transactions = series.iter().map(|b| b.transaction_count).sum();

    compute_metrics(sales_total, expense_total, paid_total).with_transactions(transactions)
}

/// Metrics over every record, dated or not.
pub fn summarize_records(records: &RecordSet) -> FinancialMetrics {
    let sales_total = records.sales.iter().map(|s| s.total_amount).sum();
    let paid_total = records.payments.iter().map(|p| p.amount).sum();
    let expense_total = records.expenses.iter().map(|e| e.amount).sum();

    compute_metrics(sales_total, expense_total, paid_total).with_transactions(records.sales.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bucket::{Granularity, WeekStart};
    use chrono::NaiveDate;

    const EPSILON: f64 = 0.0001;

    #[test]
    fn test_reference_scenario() {
        let m = compute_metrics(1000.0, 300.0, 800.0);
        assert!((m.gross_profit - 500.0).abs() < EPSILON);
        assert!((m.net_profit - 700.0).abs() < EPSILON);
        assert!((m.profit_margin - 50.0).abs() < EPSILON);
        assert!((m.net_margin - 70.0).abs() < EPSILON);
        assert!((m.operational_efficiency - 50.0).abs() < EPSILON);
        assert!((m.roi - 166.6667).abs() < 0.001);
        assert!((m.collection_rate - 80.0).abs() < EPSILON);
    }

    #[test]
    fn test_zero_sales_zero_margins() {
        let m = compute_metrics(0.0, 300.0, 100.0);
        assert_eq!(m.profit_margin, 0.0);
        assert_eq!(m.net_margin, 0.0);
        assert_eq!(m.operational_efficiency, 0.0);
        assert_eq!(m.collection_rate, 0.0);
        assert!((m.gross_profit + 200.0).abs() < EPSILON);
        assert!(m.roi.is_finite());
    }

    #[test]
    fn test_zero_expenses_zero_roi() {
        let m = compute_metrics(1000.0, 0.0, 1000.0);
        assert_eq!(m.roi, 0.0);
        assert!((m.profit_margin - 100.0).abs() < EPSILON);
    }

    #[test]
    fn test_all_zero_is_all_zero() {
        let m = compute_metrics(0.0, 0.0, 0.0).with_transactions(0);
        assert_eq!(m, FinancialMetrics::default());
    }

    #[test]
    fn test_overpayment_not_clamped() {
        let m = compute_metrics(1000.0, 0.0, 1200.0);
        assert!((m.collection_rate - 120.0).abs() < EPSILON);
    }

    #[test]
    fn test_average_sale() {
        let m = compute_metrics(900.0, 0.0, 0.0).with_transactions(3);
        assert!((m.average_sale - 300.0).abs() < EPSILON);
    }

    #[test]
    fn test_per_bucket_and_summary_use_same_formulas() {
        let mut a = TimeBucket::empty(
            Granularity::Day.key(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), WeekStart::Monday),
        );
        a.sales_total = 1000.0;
        a.paid_total = 800.0;
        a.expense_total = 300.0;
        a.transaction_count = 1;

        let per = per_bucket(std::slice::from_ref(&a));
        let summary = summarize_series(std::slice::from_ref(&a));
        assert_eq!(per.len(), 1);
        assert_eq!(per[0].metrics, summary);
        assert_eq!(per[0].key.label, "2024-01-01");
    }
}
