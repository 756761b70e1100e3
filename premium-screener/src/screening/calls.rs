//! Covered call selection.
//!
//! For one underlying, picks a single strike per expiration inside the
//! forward window: the highest strike strictly below the underlying price.
//! Each pick reports:
//! - Annualized return: (bid / price) x (365 / max(DTE, 1)) x 100
//! - Return if called: (strike - price + bid) / price x 100
//!
//! Same-day expirations (DTE 0) annualize as a one-day hold. This is an
//! approximation kept for compatibility with existing reports.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rayon::prelude::*;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::ScreenerConfig;
use crate::data::{days_to_expiration, OptionContract};
use crate::error::{ScreenError, ScreenResult};

use super::eligibility::{EligibilityFilter, FilterOptions};
use super::request::CoveredCallRequest;

const DAYS_PER_YEAR: i64 = 365;

/// The selected call for one expiration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallPick {
    pub contract: OptionContract,
    pub expiration: NaiveDate,
    pub strike: Decimal,
    pub bid: Decimal,
    pub underlying_price: Decimal,
    pub days_to_expiration: i64,
    pub delta: f64,
    pub theta: f64,
    /// Annualized premium return, percent.
    pub annualized_return_pct: Decimal,
    /// Total return if the shares are called away, percent.
    pub return_if_called_pct: Decimal,
}

impl CallPick {
    /// Compute pick metrics for `contract` evaluated on `as_of`.
    pub fn price(contract: &OptionContract, as_of: NaiveDate) -> ScreenResult<Self> {
        let strike = contract.strike_price()?;
        let bid = contract.bid_price()?;
        let expiration = contract.expiration_date()?;
        let (delta, theta) = contract.greeks()?;

        let price = contract.underlying_price;
        if price <= Decimal::ZERO {
            return Err(ScreenError::MalformedContract {
                contract: contract.label().to_string(),
                field: "underlying_price",
            });
        }

        let dte = days_to_expiration(expiration, as_of);
        let hundred = Decimal::ONE_HUNDRED;
        let annualized_return_pct = bid * Decimal::from(DAYS_PER_YEAR) * hundred
            / (price * Decimal::from(dte.max(1)));
        let return_if_called_pct = (strike - price + bid) * hundred / price;

        Ok(Self {
            contract: contract.clone(),
            expiration,
            strike,
            bid,
            underlying_price: price,
            days_to_expiration: dte,
            delta,
            theta,
            annualized_return_pct,
            return_if_called_pct,
        })
    }
}

/// True when the contract expires outside `[0, window_days]` from `as_of`.
/// A missing expiration is left for pricing to report.
fn outside_window(contract: &OptionContract, as_of: NaiveDate, window_days: i64) -> bool {
    contract
        .expiration
        .is_some_and(|exp| !(0..=window_days).contains(&days_to_expiration(exp, as_of)))
}

/// Select one call per expiration, nearest expiration first.
///
/// Only expirations with DTE in `[0, window_days]` are considered. An
/// expiration with no strike below the underlying price contributes nothing.
pub fn select_calls(
    eligible: &[&OptionContract],
    as_of: NaiveDate,
    window_days: i64,
) -> Vec<CallPick> {
    let mut best: BTreeMap<NaiveDate, CallPick> = BTreeMap::new();

    for contract in eligible {
        if outside_window(contract, as_of, window_days) {
            continue;
        }
        let pick = match CallPick::price(contract, as_of) {
            Ok(pick) => pick,
            Err(e) => {
                warn!("Skipping contract: {}", e);
                continue;
            }
        };

        if pick.strike >= pick.underlying_price {
            continue;
        }

        let higher = best
            .get(&pick.expiration)
            .map_or(true, |current| pick.strike > current.strike);
        if higher {
            best.insert(pick.expiration, pick);
        }
    }

    best.into_values().collect()
}

/// Covered call selector: eligibility filter plus per-expiration selection.
#[derive(Debug, Clone, Default)]
pub struct CoveredCallSelector {
    filter: EligibilityFilter,
}

impl CoveredCallSelector {
    pub fn new(config: ScreenerConfig) -> Self {
        Self {
            filter: EligibilityFilter::new(config),
        }
    }

    /// Select covered calls for the request's symbol.
    pub fn select(
        &self,
        contracts: &[OptionContract],
        request: &CoveredCallRequest,
    ) -> ScreenResult<Vec<CallPick>> {
        request.validate()?;

        let options = FilterOptions::covered_calls(&request.symbol, request.include_nonstandard);
        let eligible = self.filter.filter(contracts, &options);
        if let Some(first) = eligible.first() {
            info!(
                "Analyzing covered calls for {} at price ${}",
                request.symbol, first.underlying_price
            );
        }

        let picks = select_calls(&eligible, request.as_of, self.filter.config().call_window_days);
        if picks.is_empty() {
            warn!("No valid covered call options found for {}", request.symbol);
        }
        for pick in &picks {
            debug!(
                "Option: {} - ${} (bid: ${}, delta: {})",
                pick.expiration, pick.strike, pick.bid, pick.delta
            );
        }

        Ok(picks)
    }

    /// Run [`Self::select`] for several symbols in parallel.
    ///
    /// Results follow the order of `symbols`.
    pub fn select_many(
        &self,
        contracts: &[OptionContract],
        symbols: &[String],
        as_of: NaiveDate,
        include_nonstandard: bool,
    ) -> ScreenResult<Vec<(String, Vec<CallPick>)>> {
        symbols
            .par_iter()
            .map(|symbol| {
                let request =
                    CoveredCallRequest::new(symbol, as_of).include_nonstandard(include_nonstandard);
                let picks = self.select(contracts, &request)?;
                Ok((request.symbol, picks))
            })
            .collect()
    }
}
