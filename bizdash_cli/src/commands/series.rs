//! The `series` subcommand: the bucketed time series with per-bucket metrics.

use anyhow::Result;
use bizdash_lib::{bucket_records, metrics::per_bucket, AnalyticsConfig, BucketMetrics, TimeBucket};
use clap::Args;
use serde::Serialize;

use crate::commands::input::InputArgs;
use crate::output::{print_json, print_series_csv, print_series_table, OutputFormat};

#[derive(Args)]
pub struct SeriesArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

#[derive(Serialize)]
struct SeriesOutput<'a> {
    series: &'a [TimeBucket],
    metrics: &'a [BucketMetrics],
}

pub fn run(args: &SeriesArgs, base: &AnalyticsConfig, format: &OutputFormat) -> Result<()> {
    let loaded = args.input.load(base)?;
    let config = &loaded.config;
    let series = bucket_records(&loaded.normalized.records, config.granularity, config.week_start);

    if series.is_empty() {
        eprintln!("No dated records in scope.");
        return Ok(());
    }

    let metrics = per_bucket(&series);
    let units: Vec<f64> = series.iter().map(|b| b.product_count).collect();

    match format {
        OutputFormat::Table => print_series_table(&metrics, &units),
        OutputFormat::Json => print_json(&SeriesOutput {
            series: &series,
            metrics: &metrics,
        }),
        OutputFormat::Csv => print_series_csv(&metrics, &units)?,
    }
    Ok(())
}
