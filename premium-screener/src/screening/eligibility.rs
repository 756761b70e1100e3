//! Eligibility filtering for option contracts.
//!
//! Applies, in order:
//! - Scope: option type of the flow (and symbol for covered calls)
//! - Underlying volume floor
//! - Underlying price floor
//! - Required fields for the flow (malformed rows are skipped with a warning)
//! - Positive bid
//! - Standard contracts only, unless non-standard contracts are requested
//! - Moneyness (puts: strike below the underlying price)
//! - Exact expiration match (puts)

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::config::ScreenerConfig;
use crate::data::{OptionContract, OptionType};
use crate::error::ScreenResult;

/// Which engine the filtered contracts are destined for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenFlow {
    /// Cash-secured puts expiring exactly on `target_date`.
    Puts { target_date: NaiveDate },
    /// Covered calls on a single underlying.
    CoveredCalls { symbol: String },
}

/// Per-request filter options.
#[derive(Debug, Clone)]
pub struct FilterOptions {
    pub flow: ScreenFlow,
    pub include_nonstandard: bool,
}

impl FilterOptions {
    pub fn puts(target_date: NaiveDate, include_nonstandard: bool) -> Self {
        Self {
            flow: ScreenFlow::Puts { target_date },
            include_nonstandard,
        }
    }

    pub fn covered_calls(symbol: &str, include_nonstandard: bool) -> Self {
        Self {
            flow: ScreenFlow::CoveredCalls {
                symbol: symbol.to_string(),
            },
            include_nonstandard,
        }
    }

    fn option_type(&self) -> OptionType {
        match self.flow {
            ScreenFlow::Puts { .. } => OptionType::Put,
            ScreenFlow::CoveredCalls { .. } => OptionType::Call,
        }
    }
}

/// Contract-level eligibility filter.
#[derive(Debug, Clone, Default)]
pub struct EligibilityFilter {
    config: ScreenerConfig,
}

impl EligibilityFilter {
    pub fn new(config: ScreenerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScreenerConfig {
        &self.config
    }

    /// Return the contracts that pass every predicate, in input order.
    pub fn filter<'a>(
        &self,
        contracts: &'a [OptionContract],
        options: &FilterOptions,
    ) -> Vec<&'a OptionContract> {
        let mut eligible = Vec::new();
        let mut nonstandard_excluded = 0usize;
        let mut malformed = 0usize;
        let mut no_bid = 0usize;

        for contract in contracts {
            if !self.in_scope(contract, options) || !self.passes_universe_filter(contract) {
                continue;
            }

            if let Err(e) = self.check_required_fields(contract, &options.flow) {
                warn!("Skipping contract: {}", e);
                malformed += 1;
                continue;
            }

            if self.config.require_positive_bid
                && contract.bid.is_some_and(|b| b <= Decimal::ZERO)
            {
                no_bid += 1;
                continue;
            }

            if !contract.is_standard && !options.include_nonstandard {
                nonstandard_excluded += 1;
                continue;
            }

            if let ScreenFlow::Puts { target_date } = options.flow {
                if !contract.strike_below_price() {
                    continue;
                }
                if contract.expiration != Some(target_date) {
                    continue;
                }
            }

            eligible.push(contract);
        }

        if no_bid > 0 {
            info!("Filtered out {} options with no bid", no_bid);
        }
        if nonstandard_excluded > 0 {
            info!("Filtered out {} non-standard options", nonstandard_excluded);
        }
        if malformed > 0 {
            warn!("Skipped {} malformed contracts", malformed);
        }
        if eligible.is_empty() {
            match &options.flow {
                ScreenFlow::Puts { target_date } => {
                    info!("No eligible PUT options expiring on {}", target_date)
                }
                ScreenFlow::CoveredCalls { symbol } => {
                    info!("No eligible CALL options for {}", symbol)
                }
            }
        }
        debug!(
            "{} of {} contracts eligible",
            eligible.len(),
            contracts.len()
        );

        eligible
    }

    fn in_scope(&self, contract: &OptionContract, options: &FilterOptions) -> bool {
        if contract.option_type != options.option_type() {
            return false;
        }
        match &options.flow {
            ScreenFlow::CoveredCalls { symbol } => contract.symbol.eq_ignore_ascii_case(symbol),
            ScreenFlow::Puts { .. } => true,
        }
    }

    /// Underlying liquidity and price floors.
    fn passes_universe_filter(&self, contract: &OptionContract) -> bool {
        contract.underlying_volume >= self.config.min_volume
            && contract.underlying_price >= self.config.min_stock_price
    }

    fn check_required_fields(
        &self,
        contract: &OptionContract,
        flow: &ScreenFlow,
    ) -> ScreenResult<()> {
        contract.strike_price()?;
        contract.bid_price()?;
        contract.expiration_date()?;
        if let ScreenFlow::CoveredCalls { .. } = flow {
            contract.greeks()?;
        }
        Ok(())
    }
}
