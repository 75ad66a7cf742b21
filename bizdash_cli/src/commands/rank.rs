//! The `rank` subcommand: top or bottom products, clients, sellers, expense
//! categories and payment methods.

use anyhow::Result;
use bizdash_lib::{run_ranking, validation, AnalyticsConfig};
use clap::Args;

use crate::commands::input::InputArgs;
use crate::output::{print_json, print_ranking_csv, print_ranking_table, OutputFormat};

#[derive(Args)]
pub struct RankArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// What to rank: products, clients, inactive-clients, sellers, categories, methods
    #[arg(long)]
    pub entity: String,

    /// Measure: revenue, quantity, spend, sales, profit, count, amount (default depends on entity)
    #[arg(long)]
    pub by: Option<String>,

    /// top (highest first) or bottom (lowest first)
    #[arg(long, default_value = "top")]
    pub direction: String,

    /// Number of results (default: top_n from config)
    #[arg(long)]
    pub top: Option<usize>,
}

pub fn run(args: &RankArgs, base: &AnalyticsConfig, format: &OutputFormat) -> Result<()> {
    let request = validation::validate_ranking(
        &args.entity,
        args.by.as_deref(),
        &args.direction,
        args.top.unwrap_or(base.top_n),
    )?;
    let loaded = args.input.load(base)?;

    let ranked = run_ranking(
        &loaded.normalized.records,
        &request,
        loaded.config.fallback_profit_rate,
    );
    tracing::debug!(
        "Ranked {} by {} ({} results)",
        request.entity,
        request.measure,
        ranked.len()
    );

    match format {
        OutputFormat::Table => print_ranking_table(&ranked),
        OutputFormat::Json => print_json(&ranked),
        OutputFormat::Csv => print_ranking_csv(&ranked)?,
    }
    Ok(())
}
