//! Screener configuration.
//!
//! Thresholds are passed to the engines explicitly as a [`ScreenerConfig`]
//! value; nothing inside the engines reads process-wide state.
//!
//! ```toml
//! min_volume = 1000000
//! min_stock_price = 5.0
//! strike_count = 20
//! call_window_days = 90
//! require_positive_bid = true
//! ```

use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Thresholds applied by the eligibility filter and engines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenerConfig {
    /// Minimum trading volume of the underlying.
    pub min_volume: i64,
    /// Minimum underlying price (excludes penny stocks).
    pub min_stock_price: Decimal,
    /// Maximum strikes a loader keeps per symbol, expiration and side.
    pub strike_count: usize,
    /// Forward window for covered call expirations, in days.
    pub call_window_days: i64,
    /// Exclude contracts quoted with a zero bid.
    pub require_positive_bid: bool,
}

impl Default for ScreenerConfig {
    fn default() -> Self {
        Self {
            min_volume: 1_000_000,
            min_stock_price: Decimal::from(5),
            strike_count: 20,
            call_window_days: 90,
            require_positive_bid: true,
        }
    }
}

impl ScreenerConfig {
    /// Parse configuration from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}
