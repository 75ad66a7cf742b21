//! Full dashboard payload: every aggregate the dashboard renders, computed in
//! one pass over a record set.

use bizdash_records::{RawExpense, RawPayment, RawSale};
use serde::Serialize;

use crate::bucket::{bucket_records, TimeBucket};
use crate::config::AnalyticsConfig;
use crate::metrics::{per_bucket, summarize_records, BucketMetrics, FinancialMetrics};
use crate::model::RecordSet;
use crate::normalize::{normalize, NormalizationReport, Normalized};
use crate::ranking::{
    clients_by_spend, expenses_by_category, inactive_clients, payments_by_method,
    products_by_quantity, products_by_revenue, sellers_by_profit, sellers_by_sales, RankDirection,
    RankedEntity,
};
use crate::status::{classify_by_status, StatusBreakdown};
use crate::trend::{analyze_trends_as_of, analyze_trends_with, TrendOptions, TrendSummary};

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Rankings {
    pub top_products: Vec<RankedEntity>,
    pub bottom_products: Vec<RankedEntity>,
    pub products_by_quantity: Vec<RankedEntity>,
    pub top_clients: Vec<RankedEntity>,
    pub inactive_clients: Vec<RankedEntity>,
    pub sellers_by_sales: Vec<RankedEntity>,
    pub sellers_by_profit: Vec<RankedEntity>,
    pub expense_categories: Vec<RankedEntity>,
    pub payment_methods: Vec<RankedEntity>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct DashboardReport {
    pub series: Vec<TimeBucket>,
    pub bucket_metrics: Vec<BucketMetrics>,
    pub summary: FinancialMetrics,
    pub trends: TrendSummary,
    pub status: StatusBreakdown,
    pub rankings: Rankings,
    pub normalization: NormalizationReport,
}

fn rankings(records: &RecordSet, config: &AnalyticsConfig) -> Rankings {
    let n = config.top_n;
    let sales = &records.sales;
    Rankings {
        top_products: products_by_revenue(sales, n, RankDirection::Top),
        bottom_products: products_by_revenue(sales, n, RankDirection::Bottom),
        products_by_quantity: products_by_quantity(sales, n, RankDirection::Top),
        top_clients: clients_by_spend(sales, n, RankDirection::Top),
        inactive_clients: inactive_clients(sales, n, RankDirection::Top),
        sellers_by_sales: sellers_by_sales(sales, n, RankDirection::Top),
        sellers_by_profit: sellers_by_profit(
            sales,
            n,
            RankDirection::Top,
            config.fallback_profit_rate,
        ),
        expense_categories: expenses_by_category(&records.expenses, n, RankDirection::Top),
        payment_methods: payments_by_method(&records.payments, n, RankDirection::Top),
    }
}

/// Growth trends over `series` with the configured window, monthly factor and
/// reference day.
pub fn trends_for(series: &[TimeBucket], config: &AnalyticsConfig) -> TrendSummary {
    let options = TrendOptions {
        window: config.trend_window,
        monthly_factor: config.monthly_weeks_factor,
    };
    match config.as_of {
        Some(as_of) => analyze_trends_as_of(series, as_of, options),
        None => analyze_trends_with(series, options),
    }
}

/// Builds the dashboard report for `records`.
pub fn build_report(records: &RecordSet, config: &AnalyticsConfig) -> DashboardReport {
    assemble(records, config, NormalizationReport::count_undated(records))
}

/// Builds the report for a normalization result, carrying its repair counts.
pub fn build_report_normalized(normalized: &Normalized, config: &AnalyticsConfig) -> DashboardReport {
    assemble(&normalized.records, config, normalized.report)
}

/// Normalizes raw documents with the configured UTC offset, then builds the report.
pub fn build_report_from_raw(
    sales: &[RawSale],
    payments: &[RawPayment],
    expenses: &[RawExpense],
    config: &AnalyticsConfig,
) -> DashboardReport {
    let normalized = normalize(sales, payments, expenses, config.utc_offset_minutes);
    build_report_normalized(&normalized, config)
}

fn assemble(
    records: &RecordSet,
    config: &AnalyticsConfig,
    normalization: NormalizationReport,
) -> DashboardReport {
    let series = bucket_records(records, config.granularity, config.week_start);
    let trends = trends_for(&series, config);
    let summary = summarize_records(records);

    let skipped = normalization.skipped_from_buckets();
    if skipped > 0 {
        tracing::warn!(
            "{} undated record(s) left out of the series ({} sales, {} payments, {} expenses)",
            skipped,
            normalization.undated_sales,
            normalization.undated_payments,
            normalization.undated_expenses
        );
    }
    tracing::info!(
        "Report built: {} buckets, {} sales, {} payments, {} expenses",
        series.len(),
        records.sales.len(),
        records.payments.len(),
        records.expenses.len()
    );

    DashboardReport {
        bucket_metrics: per_bucket(&series),
        series,
        summary,
        trends,
        status: classify_by_status(&records.sales, &records.payments),
        rankings: rankings(records, config),
        normalization,
    }
}
