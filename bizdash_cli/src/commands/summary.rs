//! The `summary` subcommand: headline metrics, growth trends and the payment
//! status breakdown.

use anyhow::Result;
use bizdash_lib::{
    bucket_records, classify_by_status, summarize_records, trends_for, AnalyticsConfig,
    FinancialMetrics, StatusBreakdown, TrendSummary,
};
use clap::Args;
use serde::Serialize;

use crate::commands::input::InputArgs;
use crate::output::{print_json, print_summary_csv, print_summary_table, OutputFormat};

#[derive(Args)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

#[derive(Serialize)]
struct SummaryOutput {
    summary: FinancialMetrics,
    trends: TrendSummary,
    status: StatusBreakdown,
}

pub fn run(args: &SummaryArgs, base: &AnalyticsConfig, format: &OutputFormat) -> Result<()> {
    let loaded = args.input.load(base)?;
    let config = &loaded.config;
    let records = &loaded.normalized.records;

    let series = bucket_records(records, config.granularity, config.week_start);
    let out = SummaryOutput {
        summary: summarize_records(records),
        trends: trends_for(&series, config),
        status: classify_by_status(&records.sales, &records.payments),
    };

    match format {
        OutputFormat::Table => print_summary_table(&out.summary, &out.trends, &out.status),
        OutputFormat::Json => print_json(&out),
        OutputFormat::Csv => print_summary_csv(&out.summary, &out.trends)?,
    }
    Ok(())
}
