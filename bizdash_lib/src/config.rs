//! Tunables for an aggregation run.
//!
//! Defaults live in `seed_data/default_config.toml`, embedded at compile time.
//! A user file only needs the keys it overrides.

use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bucket::{Granularity, WeekStart};

/// Largest UTC offset in use anywhere (UTC+14 / UTC-12 rounded up).
pub const MAX_UTC_OFFSET_MINUTES: i32 = 14 * 60;

/// Longest trend window accepted, in buckets.
pub const MAX_TREND_WINDOW: usize = 366;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(String),
    #[error("Config value `{field}` out of range: {reason}")]
    OutOfRange { field: &'static str, reason: String },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AnalyticsConfig {
    pub granularity: Granularity,
    pub week_start: WeekStart,
    pub utc_offset_minutes: i32,
    pub top_n: usize,
    pub trend_window: usize,
    pub monthly_weeks_factor: f64,
    pub fallback_profit_rate: f64,
    /// Reference day for trend comparisons. Buckets after it are ignored.
    pub as_of: Option<NaiveDate>,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            granularity: Granularity::Day,
            week_start: WeekStart::Monday,
            utc_offset_minutes: 0,
            top_n: 3,
            trend_window: 7,
            monthly_weeks_factor: 4.0,
            fallback_profit_rate: 0.2,
            as_of: None,
        }
    }
}

impl AnalyticsConfig {
    /// The defaults shipped in `seed_data/default_config.toml`.
    pub fn embedded() -> Result<Self, ConfigError> {
        let toml_content = include_str!("../../seed_data/default_config.toml");
        Self::from_toml_str(toml_content)
    }

    pub fn from_toml_str(toml_content: &str) -> Result<Self, ConfigError> {
        let config: AnalyticsConfig =
            toml::from_str(toml_content).map_err(|e| ConfigError::TomlParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        tracing::debug!("Loaded config from {}", path.display());
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.utc_offset_minutes.unsigned_abs() > MAX_UTC_OFFSET_MINUTES.unsigned_abs() {
            return Err(ConfigError::OutOfRange {
                field: "utc_offset_minutes",
                reason: format!(
                    "{} is beyond +/-{}",
                    self.utc_offset_minutes, MAX_UTC_OFFSET_MINUTES
                ),
            });
        }
        if self.top_n == 0 {
            return Err(ConfigError::OutOfRange {
                field: "top_n",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.trend_window == 0 || self.trend_window > MAX_TREND_WINDOW {
            return Err(ConfigError::OutOfRange {
                field: "trend_window",
                reason: format!("{} is outside 1..={}", self.trend_window, MAX_TREND_WINDOW),
            });
        }
        if !self.monthly_weeks_factor.is_finite() || self.monthly_weeks_factor <= 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "monthly_weeks_factor",
                reason: format!("{} is not a positive number", self.monthly_weeks_factor),
            });
        }
        if !(0.0..=1.0).contains(&self.fallback_profit_rate) {
            return Err(ConfigError::OutOfRange {
                field: "fallback_profit_rate",
                reason: format!("{} is outside 0..=1", self.fallback_profit_rate),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_matches_default() {
        let embedded = AnalyticsConfig::embedded().unwrap();
        assert_eq!(embedded, AnalyticsConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = AnalyticsConfig::from_toml_str(
            r#"
            granularity = "month"
            week_start = "sunday"
            as_of = "2024-03-31"
            "#,
        )
        .unwrap();
        assert_eq!(config.granularity, Granularity::Month);
        assert_eq!(config.week_start, WeekStart::Sunday);
        assert_eq!(config.as_of, NaiveDate::from_ymd_opt(2024, 3, 31));
        assert_eq!(config.top_n, 3);
    }

    #[test]
    fn test_empty_file_is_default() {
        let config = AnalyticsConfig::from_toml_str("").unwrap();
        assert_eq!(config, AnalyticsConfig::default());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = AnalyticsConfig::from_toml_str("colour = \"red\"").unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse(_)));
    }

    #[test]
    fn test_bad_granularity_rejected() {
        let err = AnalyticsConfig::from_toml_str("granularity = \"hour\"").unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse(_)));
    }

    #[test]
    fn test_zero_top_n_rejected() {
        let err = AnalyticsConfig::from_toml_str("top_n = 0").unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { field: "top_n", .. }));
    }

    #[test]
    fn test_fallback_rate_range() {
        let err = AnalyticsConfig::from_toml_str("fallback_profit_rate = 1.5").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::OutOfRange {
                field: "fallback_profit_rate",
                ..
            }
        ));
    }

    #[test]
    fn test_offset_range() {
        assert!(AnalyticsConfig::from_toml_str("utc_offset_minutes = 60").is_ok());
        assert!(AnalyticsConfig::from_toml_str("utc_offset_minutes = -900").is_err());
        assert!(AnalyticsConfig::from_toml_str("utc_offset_minutes = -840").is_ok());

        let extreme = AnalyticsConfig {
            utc_offset_minutes: i32::MIN,
            ..AnalyticsConfig::default()
        };
        assert!(matches!(
            extreme.validate(),
            Err(ConfigError::OutOfRange { field: "utc_offset_minutes", .. })
        ));
    }

    #[test]
    fn test_trend_window_bounds() {
        assert!(AnalyticsConfig::from_toml_str("trend_window = 366").is_ok());
        assert!(AnalyticsConfig::from_toml_str("trend_window = 0").is_err());
        let huge = AnalyticsConfig {
            trend_window: usize::MAX,
            ..AnalyticsConfig::default()
        };
        assert!(matches!(
            huge.validate(),
            Err(ConfigError::OutOfRange { field: "trend_window", .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = AnalyticsConfig::from_file(Path::new("/nonexistent/bizdash.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
