//! Input arguments shared by every subcommand: record files, scope and
//! bucketing overrides.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use bizdash_lib::{
    normalize, validation, AnalyticsConfig, Normalized, RawExpense, RawPayment, RawSale,
    RecordBatch, Scope,
};
use clap::Args;
use serde::de::DeserializeOwned;

#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// Sales JSON file (array or {"data": [...]})
    #[arg(long)]
    pub sales: Option<PathBuf>,

    /// Payments JSON file
    #[arg(long)]
    pub payments: Option<PathBuf>,

    /// Expenses JSON file
    #[arg(long)]
    pub expenses: Option<PathBuf>,

    /// Keep records dated on or after this day (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// Keep records dated on or before this day (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,

    /// Keep records owned by this user id
    #[arg(long)]
    pub owner: Option<String>,

    /// Bucket size: day, week, month, year (overrides config)
    #[arg(long)]
    pub granularity: Option<String>,

    /// First day of week buckets: monday, sunday (overrides config)
    #[arg(long)]
    pub week_start: Option<String>,

    /// Reference day for trends (YYYY-MM-DD, overrides config)
    #[arg(long)]
    pub as_of: Option<String>,
}

/// Records loaded, normalized and scoped, with the effective configuration.
pub struct Loaded {
    pub normalized: Normalized,
    pub config: AnalyticsConfig,
}

fn read_batch<T: DeserializeOwned>(path: Option<&Path>, kind: &str) -> Result<Vec<T>> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {} file {}", kind, path.display()))?;
    let batch = RecordBatch::<T>::from_json(&content)
        .with_context(|| format!("failed to decode {} file {}", kind, path.display()))?;
    if batch.rejected() > 0 {
        tracing::warn!(
            "Skipped {} undecodable {} element(s) in {}",
            batch.rejected(),
            kind,
            path.display()
        );
    }
    tracing::debug!("Read {} {} from {}", batch.len(), kind, path.display());
    Ok(batch.into_inner())
}

impl InputArgs {
    /// Applies the command-line overrides on top of `base`.
    pub fn effective_config(&self, base: &AnalyticsConfig) -> Result<AnalyticsConfig> {
        let mut config = base.clone();
        if let Some(ref g) = self.granularity {
            config.granularity = validation::validate_granularity(g)?;
        }
        if let Some(ref w) = self.week_start {
            config.week_start = validation::validate_week_start(w)?;
        }
        if let Some(ref d) = self.as_of {
            config.as_of = Some(validation::validate_date(d)?);
        }
        Ok(config)
    }

    pub fn scope(&self) -> Result<Scope> {
        let range = validation::validate_date_range(self.from.as_deref(), self.to.as_deref())?;
        let owner = match self.owner {
            Some(ref val) => Some(validation::validate_owner(val)?),
            None => None,
        };
        Ok(Scope::new(range, owner))
    }

    pub fn load(&self, base: &AnalyticsConfig) -> Result<Loaded> {
        if self.sales.is_none() && self.payments.is_none() && self.expenses.is_none() {
            bail!("No input given. Pass at least one of --sales, --payments, --expenses");
        }
        let config = self.effective_config(base)?;
        let scope = self.scope()?;

        let sales: Vec<RawSale> = read_batch(self.sales.as_deref(), "sales")?;
        let payments: Vec<RawPayment> = read_batch(self.payments.as_deref(), "payments")?;
        let expenses: Vec<RawExpense> = read_batch(self.expenses.as_deref(), "expenses")?;

        let normalized =
            normalize(&sales, &payments, &expenses, config.utc_offset_minutes).scoped(&scope);

        Ok(Loaded { normalized, config })
    }
}
