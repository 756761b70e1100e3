//! Core data types for option screening.
//!
//! One [`OptionContract`] is one row of a materialized option chain. Fields
//! the screening engines require (strike, bid, expiration) are optional here
//! because raw chain rows can arrive incomplete; the engines reject such rows
//! instead of treating a missing value as zero.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{ScreenError, ScreenResult};

/// Number of shares covered by one standard contract.
pub const CONTRACT_MULTIPLIER: i64 = 100;

/// Length of the root portion of an OCC-style option symbol.
const OPTION_ROOT_LEN: usize = 6;

/// Option type (call or put).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "C" | "CALL" => Some(Self::Call),
            "P" | "PUT" => Some(Self::Put),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Call => "CALL",
            Self::Put => "PUT",
        }
    }
}

/// A single option contract from a chain snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionContract {
    /// Underlying symbol (e.g., "AAPL")
    pub symbol: String,

    /// Full option symbol, e.g. "AAPL  250418P00150000"
    #[serde(default)]
    pub option_symbol: String,

    /// Underlying stock price at snapshot time
    pub underlying_price: Decimal,

    /// Option type (call or put)
    pub option_type: OptionType,

    /// Strike price
    pub strike: Option<Decimal>,

    /// Option expiration date
    pub expiration: Option<NaiveDate>,

    /// Bid price
    pub bid: Option<Decimal>,

    /// Trading volume of the underlying
    pub underlying_volume: i64,

    /// False for split/merger adjusted contracts
    pub is_standard: bool,

    pub delta: Option<f64>,

    pub theta: Option<f64>,
}

impl OptionContract {
    /// Identifier used in log lines and errors.
    pub fn label(&self) -> &str {
        if self.option_symbol.is_empty() {
            &self.symbol
        } else {
            &self.option_symbol
        }
    }

    fn malformed(&self, field: &'static str) -> ScreenError {
        ScreenError::MalformedContract {
            contract: self.label().to_string(),
            field,
        }
    }

    /// Strike price, which must be present and positive.
    pub fn strike_price(&self) -> ScreenResult<Decimal> {
        match self.strike {
            Some(strike) if strike > Decimal::ZERO => Ok(strike),
            _ => Err(self.malformed("strike")),
        }
    }

    pub fn bid_price(&self) -> ScreenResult<Decimal> {
        match self.bid {
            Some(bid) if bid >= Decimal::ZERO => Ok(bid),
            _ => Err(self.malformed("bid")),
        }
    }

    pub fn expiration_date(&self) -> ScreenResult<NaiveDate> {
        self.expiration.ok_or_else(|| self.malformed("expiration"))
    }

    /// Delta and theta, required by the covered call flow.
    pub fn greeks(&self) -> ScreenResult<(f64, f64)> {
        let delta = self.delta.ok_or_else(|| self.malformed("delta"))?;
        let theta = self.theta.ok_or_else(|| self.malformed("theta"))?;
        Ok((delta, theta))
    }

    /// Strike below the underlying price.
    ///
    /// Unknown strikes are never considered below the price.
    pub fn strike_below_price(&self) -> bool {
        self.strike.is_some_and(|k| k < self.underlying_price)
    }

    /// Premium received per share relative to the strike (bid / strike).
    pub fn premium_yield(&self) -> Option<Decimal> {
        match (self.bid, self.strike) {
            (Some(bid), Some(strike)) if strike > Decimal::ZERO => Some(bid / strike),
            _ => None,
        }
    }
}

/// Check whether an option symbol belongs to a standard (unadjusted) contract.
///
/// Adjusted contracts created by splits or mergers carry a digit in their
/// root, e.g. `AAPL1 250418C00150000`.
pub fn is_standard_option_symbol(option_symbol: &str) -> bool {
    !option_symbol
        .chars()
        .take(OPTION_ROOT_LEN)
        .any(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn put(strike: i64, bid: Decimal) -> OptionContract {
        OptionContract {
            symbol: "XYZ".to_string(),
            option_symbol: "XYZ   250418P00020000".to_string(),
            underlying_price: Decimal::from(25),
            option_type: OptionType::Put,
            strike: Some(Decimal::from(strike)),
            expiration: NaiveDate::from_ymd_opt(2025, 4, 18),
            bid: Some(bid),
            underlying_volume: 2_000_000,
            is_standard: true,
            delta: None,
            theta: None,
        }
    }

    #[test]
    fn test_option_type_parsing() {
        assert_eq!(OptionType::from_str("C"), Some(OptionType::Call));
        assert_eq!(OptionType::from_str("P"), Some(OptionType::Put));
        assert_eq!(OptionType::from_str("call"), Some(OptionType::Call));
        assert_eq!(OptionType::from_str(" PUT "), Some(OptionType::Put));
        assert_eq!(OptionType::from_str("X"), None);
    }

    #[test]
    fn test_standard_symbol_detection() {
        assert!(is_standard_option_symbol("AAPL  250418C00150000"));
        assert!(is_standard_option_symbol("F     250418P00010000"));
        assert!(!is_standard_option_symbol("AAPL1 250418C00150000"));
        assert!(!is_standard_option_symbol("T2    250418P00020000"));
        // Digits after the root are the expiration and strike.
        assert!(is_standard_option_symbol("GOOGL 250418C00150000"));
    }

    #[test]
    fn test_premium_yield() {
        let contract = put(20, Decimal::new(150, 2));
        assert_eq!(contract.premium_yield(), Some(Decimal::new(75, 3)));

        let mut missing = contract.clone();
        missing.bid = None;
        assert_eq!(missing.premium_yield(), None);
    }

    #[test]
    fn test_required_fields() {
        let contract = put(20, Decimal::ONE);
        assert_eq!(contract.strike_price().unwrap(), Decimal::from(20));
        assert_eq!(contract.bid_price().unwrap(), Decimal::ONE);
        assert!(contract.expiration_date().is_ok());

        let mut broken = contract.clone();
        broken.strike = Some(Decimal::ZERO);
        broken.bid = None;
        assert_eq!(
            broken.strike_price(),
            Err(ScreenError::MalformedContract {
                contract: "XYZ   250418P00020000".to_string(),
                field: "strike",
            })
        );
        assert!(broken.bid_price().is_err());

        // Puts carry no greeks here; only the covered call flow needs them.
        assert!(matches!(
            contract.greeks(),
            Err(ScreenError::MalformedContract { field: "delta", .. })
        ));
    }

    #[test]
    fn test_strike_below_price() {
        assert!(put(20, Decimal::ONE).strike_below_price());
        assert!(!put(25, Decimal::ONE).strike_below_price());

        let mut unknown = put(20, Decimal::ONE);
        unknown.strike = None;
        assert!(!unknown.strike_below_price());
    }
}
