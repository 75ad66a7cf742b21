mod commands;
mod output;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use bizdash_lib::AnalyticsConfig;
use clap::{Parser, Subcommand};

use crate::output::OutputFormat;

const CONFIG_ENV: &str = "BIZDASH_CONFIG";

#[derive(Parser)]
#[command(name = "bizdash")]
#[command(about = "Aggregate sales, payments and expenses into dashboard metrics")]
struct Cli {
    /// Output format: table, json or csv
    #[arg(long, default_value = "table", global = true)]
    output: String,

    /// Analytics config TOML (falls back to $BIZDASH_CONFIG, then built-in defaults)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Headline metrics, trends and payment status breakdown
    Summary(commands::summary::SummaryArgs),
    /// Bucketed time series with per-bucket metrics
    Series(commands::series::SeriesArgs),
    /// Rank products, clients, sellers, expense categories or payment methods
    Rank(Box<commands::rank::RankArgs>),
    /// Full dashboard report as JSON
    Report(commands::report::ReportArgs),
}

fn parse_output_format(value: &str) -> Result<OutputFormat> {
    match value.trim().to_lowercase().as_str() {
        "table" => Ok(OutputFormat::Table),
        "json" => Ok(OutputFormat::Json),
        "csv" => Ok(OutputFormat::Csv),
        _ => bail!(
            "Invalid --output value: '{}'. Valid options: table, json, csv",
            value
        ),
    }
}

fn load_config(flag: Option<&PathBuf>) -> Result<AnalyticsConfig> {
    let path = flag
        .cloned()
        .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
    match path {
        Some(path) => AnalyticsConfig::from_file(&path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(AnalyticsConfig::embedded()?),
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("bizdash=info".parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let format = parse_output_format(&cli.output)?;
    let config = load_config(cli.config.as_ref())?;

    match &cli.command {
        Commands::Summary(args) => commands::summary::run(args, &config, &format)?,
        Commands::Series(args) => commands::series::run(args, &config, &format)?,
        Commands::Rank(args) => commands::rank::run(args.as_ref(), &config, &format)?,
        Commands::Report(args) => commands::report::run(args, &config)?,
    }

    Ok(())
}
