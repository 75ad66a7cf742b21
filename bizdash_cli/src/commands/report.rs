//! The `report` subcommand: the full dashboard payload, always as JSON.

use anyhow::Result;
use bizdash_lib::{build_report_normalized, AnalyticsConfig};
use clap::Args;

use crate::commands::input::InputArgs;
use crate::output::print_json;

#[derive(Args)]
pub struct ReportArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

pub fn run(args: &ReportArgs, base: &AnalyticsConfig) -> Result<()> {
    let loaded = args.input.load(base)?;
    let report = build_report_normalized(&loaded.normalized, &loaded.config);
    print_json(&report);
    Ok(())
}
