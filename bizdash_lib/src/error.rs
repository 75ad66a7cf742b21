//! Error types for the library layer.

use std::fmt;

use crate::config::ConfigError;

/// Errors produced around the aggregation engine: decoding inputs, loading
/// configuration and validating caller-supplied parameters.
///
/// The aggregation functions themselves never fail.
#[derive(Debug)]
pub enum DashboardError {
    /// A batch of records could not be decoded.
    Records(bizdash_records::Error),
    /// The configuration could not be loaded or is out of range.
    Config(ConfigError),
    /// User-provided input failed validation.
    InvalidInput(String),
}

impl fmt::Display for DashboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Records(e) => write!(f, "Record error: {}", e),
            Self::Config(e) => write!(f, "Config error: {}", e),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for DashboardError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Records(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::InvalidInput(_) => None,
        }
    }
}

impl From<bizdash_records::Error> for DashboardError {
    fn from(e: bizdash_records::Error) -> Self {
        Self::Records(e)
    }
}

impl From<ConfigError> for DashboardError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}
