//! Screening requests and their validation.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{ScreenError, ScreenResult};

/// Parse a `YYYY-MM-DD` date supplied by a caller.
pub fn parse_date(s: &str) -> ScreenResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| ScreenError::InvalidRequest(format!("invalid date '{}': {}", s, e)))
}

/// Input to put screening.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningRequest {
    /// Cash available to secure puts.
    pub funds: Decimal,
    /// Expiration date to screen; only exact matches are eligible.
    pub target_date: NaiveDate,
    /// Maximum number of candidates returned.
    pub result_count: usize,
    /// Include split/merger adjusted contracts.
    #[serde(default)]
    pub include_nonstandard: bool,
    /// Keep only the best candidate per underlying.
    #[serde(default)]
    pub best_per_symbol: bool,
}

impl ScreeningRequest {
    pub fn new(funds: Decimal, target_date: NaiveDate, result_count: usize) -> Self {
        Self {
            funds,
            target_date,
            result_count,
            include_nonstandard: false,
            best_per_symbol: false,
        }
    }

    pub fn include_nonstandard(mut self, include: bool) -> Self {
        self.include_nonstandard = include;
        self
    }

    pub fn best_per_symbol(mut self, best: bool) -> Self {
        self.best_per_symbol = best;
        self
    }

    /// Reject requests that cannot produce a meaningful screen.
    pub fn validate(&self) -> ScreenResult<()> {
        if self.funds <= Decimal::ZERO {
            return Err(ScreenError::InvalidRequest(format!(
                "funds must be positive, got {}",
                self.funds
            )));
        }
        if self.result_count == 0 {
            return Err(ScreenError::InvalidRequest(
                "result count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Input to covered call selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoveredCallRequest {
    pub symbol: String,
    /// Evaluation date; expirations are measured from here.
    pub as_of: NaiveDate,
    #[serde(default)]
    pub include_nonstandard: bool,
}

impl CoveredCallRequest {
    pub fn new(symbol: &str, as_of: NaiveDate) -> Self {
        Self {
            symbol: symbol.trim().to_uppercase(),
            as_of,
            include_nonstandard: false,
        }
    }

    pub fn include_nonstandard(mut self, include: bool) -> Self {
        self.include_nonstandard = include;
        self
    }

    pub fn validate(&self) -> ScreenResult<()> {
        if self.symbol.trim().is_empty() {
            return Err(ScreenError::InvalidRequest(
                "symbol must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
