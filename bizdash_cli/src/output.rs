use anyhow::Result;
use bizdash_lib::{BucketMetrics, FinancialMetrics, RankedEntity, StatusBreakdown, StatusBucket, TrendSummary};
use serde::Serialize;
use tabled::{Table, Tabled};

#[derive(Clone, Debug, PartialEq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Tabled, Serialize)]
struct MetricRow {
    #[tabled(rename = "Metric")]
    #[serde(rename = "Metric")]
    metric: String,
    #[tabled(rename = "Value")]
    #[serde(rename = "Value")]
    value: String,
}

#[derive(Tabled, Serialize)]
struct StatusRow {
    #[tabled(rename = "Status")]
    #[serde(rename = "Status")]
    status: String,
    #[tabled(rename = "Sales")]
    #[serde(rename = "Sales")]
    count: usize,
    #[tabled(rename = "Total")]
    #[serde(rename = "Total")]
    total: String,
    #[tabled(rename = "Paid")]
    #[serde(rename = "Paid")]
    paid: String,
    #[tabled(rename = "Outstanding")]
    #[serde(rename = "Outstanding")]
    outstanding: String,
}

#[derive(Tabled, Serialize)]
struct SeriesRow {
    #[tabled(rename = "Period")]
    #[serde(rename = "Period")]
    period: String,
    #[tabled(rename = "Sales")]
    #[serde(rename = "Sales")]
    sales: String,
    #[tabled(rename = "Paid")]
    #[serde(rename = "Paid")]
    paid: String,
    #[tabled(rename = "Expenses")]
    #[serde(rename = "Expenses")]
    expenses: String,
    #[tabled(rename = "Transactions")]
    #[serde(rename = "Transactions")]
    transactions: usize,
    #[tabled(rename = "Units")]
    #[serde(rename = "Units")]
    units: String,
    #[tabled(rename = "Gross Profit")]
    #[serde(rename = "Gross Profit")]
    gross_profit: String,
    #[tabled(rename = "Net Margin")]
    #[serde(rename = "Net Margin")]
    net_margin: String,
}

#[derive(Tabled, Serialize)]
struct RankRow {
    #[tabled(rename = "Rank")]
    #[serde(rename = "Rank")]
    rank: usize,
    #[tabled(rename = "Name")]
    #[serde(rename = "Name")]
    name: String,
    #[tabled(rename = "Measure")]
    #[serde(rename = "Measure")]
    measure: String,
    #[tabled(rename = "Count")]
    #[serde(rename = "Count")]
    count: String,
}

// -- Row builders --

fn build_metric_rows(summary: &FinancialMetrics, trends: &TrendSummary) -> Vec<MetricRow> {
    let row = |metric: &str, value: String| MetricRow {
        metric: metric.to_string(),
        value,
    };
    vec![
        row("Sales", format_amount(summary.sales_total)),
        row("Collected", format_amount(summary.paid_total)),
        row("Expenses", format_amount(summary.expense_total)),
        row("Transactions", summary.transaction_count.to_string()),
        row("Average sale", format_amount(summary.average_sale)),
        row("Gross profit", format_amount(summary.gross_profit)),
        row("Net profit", format_amount(summary.net_profit)),
        row("Profit margin", format_percent(summary.profit_margin)),
        row("Net margin", format_percent(summary.net_margin)),
        row("Operational efficiency", format_percent(summary.operational_efficiency)),
        row("ROI", format_percent(summary.roi)),
        row("Collection rate", format_percent(summary.collection_rate)),
        row("Daily growth", format_percent(trends.daily_growth)),
        row("Weekly growth", format_percent(trends.weekly_growth)),
        row("Monthly estimate", format_percent(trends.monthly_growth_estimate)),
    ]
}

fn build_status_rows(status: &StatusBreakdown) -> Vec<StatusRow> {
    let row = |name: &str, b: &StatusBucket| StatusRow {
        status: name.to_string(),
        count: b.count,
        total: format_amount(b.total_amount),
        paid: format_amount(b.paid_amount),
        outstanding: format_amount(b.outstanding_balance),
    };
    vec![
        row("completed", &status.completed),
        row("partially_paid", &status.partially_paid),
        row("pending", &status.pending),
    ]
}

fn build_series_rows(buckets: &[BucketMetrics], units: &[f64]) -> Vec<SeriesRow> {
    buckets
        .iter()
        .zip(units.iter().chain(std::iter::repeat(&0.0)))
        .map(|(b, units)| SeriesRow {
            period: b.key.label.clone(),
            sales: format_amount(b.metrics.sales_total),
            paid: format_amount(b.metrics.paid_total),
            expenses: format_amount(b.metrics.expense_total),
            transactions: b.metrics.transaction_count,
            units: format_quantity(*units),
            gross_profit: format_amount(b.metrics.gross_profit),
            net_margin: format_percent(b.metrics.net_margin),
        })
        .collect()
}

fn build_rank_rows(ranked: &[RankedEntity]) -> Vec<RankRow> {
    ranked
        .iter()
        .enumerate()
        .map(|(i, r)| RankRow {
            rank: i + 1,
            name: r.name.clone(),
            measure: format_amount(r.measure),
            count: format_quantity(r.count),
        })
        .collect()
}

// -- Table output --

fn print_table<T: Tabled>(rows: Vec<T>) {
    println!("{}", Table::new(rows));
}

pub fn print_summary_table(summary: &FinancialMetrics, trends: &TrendSummary, status: &StatusBreakdown) {
    print_table(build_metric_rows(summary, trends));
    print_table(build_status_rows(status));
    if status.excluded > 0 {
        println!("{} sale(s) with other statuses not shown", status.excluded);
    }
}

pub fn print_series_table(buckets: &[BucketMetrics], units: &[f64]) {
    print_table(build_series_rows(buckets, units));
}

pub fn print_ranking_table(ranked: &[RankedEntity]) {
    print_table(build_rank_rows(ranked));
}

// -- CSV output --

fn write_csv<T: Serialize>(rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn print_summary_csv(summary: &FinancialMetrics, trends: &TrendSummary) -> Result<()> {
    write_csv(&build_metric_rows(summary, trends))
}

pub fn print_series_csv(buckets: &[BucketMetrics], units: &[f64]) -> Result<()> {
    write_csv(&build_series_rows(buckets, units))
}

pub fn print_ranking_csv(ranked: &[RankedEntity]) -> Result<()> {
    write_csv(&build_rank_rows(ranked))
}

// -- JSON output --

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

fn format_amount(value: f64) -> String {
    format!("{:.2}", value)
}

fn format_percent(value: f64) -> String {
    format!("{:.2}%", value)
}

/// Whole quantities print without decimals.
fn format_quantity(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}
