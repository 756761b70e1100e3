//! Cash-secured put screening.
//!
//! For each eligible put the screener sizes the largest position the funds
//! can secure (strike x 100 collateral per contract), then ranks candidates
//! by the premium that position would collect.

use std::cmp::Ordering;
use std::collections::HashSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::ScreenerConfig;
use crate::data::{OptionContract, CONTRACT_MULTIPLIER};
use crate::error::{ScreenError, ScreenResult};

use super::eligibility::{EligibilityFilter, FilterOptions};
use super::request::ScreeningRequest;

/// A put sized against the available funds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PutCandidate {
    pub contract: OptionContract,
    pub strike: Decimal,
    pub bid: Decimal,
    pub expiration: NaiveDate,
    /// Cash needed to secure one contract.
    pub collateral_per_contract: Decimal,
    /// Whole contracts the funds can secure (always at least 1).
    pub max_contracts: Decimal,
    /// Premium collected across all contracts.
    pub premium_income: Decimal,
    /// Capital deployed if every contract is assigned.
    pub exercise_value: Decimal,
    /// Bid / strike.
    pub premium_yield: Decimal,
    /// Ranking score (premium income).
    pub score: Decimal,
}

impl PutCandidate {
    pub fn symbol(&self) -> &str {
        &self.contract.symbol
    }

    /// Size a put against `funds`.
    ///
    /// Returns `Ok(None)` when the funds cannot secure a single contract.
    pub fn price(contract: &OptionContract, funds: Decimal) -> ScreenResult<Option<Self>> {
        let strike = contract.strike_price()?;
        let bid = contract.bid_price()?;
        let expiration = contract.expiration_date()?;

        let multiplier = Decimal::from(CONTRACT_MULTIPLIER);
        let collateral_per_contract = strike * multiplier;
        let max_contracts = (funds / collateral_per_contract).floor();
        if max_contracts < Decimal::ONE {
            return Ok(None);
        }

        let premium_income = (bid * multiplier)
            .checked_mul(max_contracts)
            .ok_or_else(|| {
                ScreenError::InvalidRequest(format!(
                    "premium for {} overflows at funds {}",
                    contract.label(),
                    funds
                ))
            })?;
        let exercise_value = collateral_per_contract * max_contracts;

        Ok(Some(Self {
            contract: contract.clone(),
            strike,
            bid,
            expiration,
            collateral_per_contract,
            max_contracts,
            premium_income,
            exercise_value,
            premium_yield: bid / strike,
            score: premium_income,
        }))
    }
}

/// Premium income, then yield, descending; symbol ascending breaks ties.
fn compare_candidates(a: &PutCandidate, b: &PutCandidate) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| b.premium_yield.cmp(&a.premium_yield))
        .then_with(|| a.contract.symbol.cmp(&b.contract.symbol))
}

/// Rank eligible puts and keep the top `result_count`.
///
/// Non-positive funds yield an empty list. Malformed contracts are skipped
/// with a warning.
pub fn rank_puts(
    eligible: &[&OptionContract],
    funds: Decimal,
    result_count: usize,
) -> Vec<PutCandidate> {
    rank(eligible, funds, result_count, false)
}

fn rank(
    eligible: &[&OptionContract],
    funds: Decimal,
    result_count: usize,
    best_per_symbol: bool,
) -> Vec<PutCandidate> {
    if funds <= Decimal::ZERO {
        return Vec::new();
    }

    let mut candidates: Vec<PutCandidate> = eligible
        .iter()
        .filter_map(|contract| match PutCandidate::price(contract, funds) {
            Ok(candidate) => candidate,
            Err(e) => {
                warn!("Skipping contract: {}", e);
                None
            }
        })
        .collect();

    candidates.sort_by(compare_candidates);

    if best_per_symbol {
        let mut seen = HashSet::new();
        candidates.retain(|c| seen.insert(c.contract.symbol.clone()));
    }

    candidates.truncate(result_count);
    candidates
}

/// Put screener: eligibility filter plus ranking.
#[derive(Debug, Clone, Default)]
pub struct PutScreener {
    filter: EligibilityFilter,
}

impl PutScreener {
    pub fn new(config: ScreenerConfig) -> Self {
        Self {
            filter: EligibilityFilter::new(config),
        }
    }

    /// Screen `contracts` for the request's target expiration.
    pub fn screen(
        &self,
        contracts: &[OptionContract],
        request: &ScreeningRequest,
    ) -> ScreenResult<Vec<PutCandidate>> {
        request.validate()?;

        let options = FilterOptions::puts(request.target_date, request.include_nonstandard);
        let eligible = self.filter.filter(contracts, &options);
        info!(
            "Screening {} PUT options expiring {} with ${} available",
            eligible.len(),
            request.target_date,
            request.funds
        );

        let candidates = rank(
            &eligible,
            request.funds,
            request.result_count,
            request.best_per_symbol,
        );
        info!("Returning {} PUT candidates", candidates.len());
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::OptionType;

    fn friday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, 4).unwrap()
    }

    fn put(symbol: &str, strike: Decimal, bid: Decimal) -> OptionContract {
        OptionContract {
            symbol: symbol.to_string(),
            option_symbol: String::new(),
            underlying_price: strike + Decimal::from(5),
            option_type: OptionType::Put,
            strike: Some(strike),
            expiration: Some(friday()),
            bid: Some(bid),
            underlying_volume: 3_000_000,
            is_standard: true,
            delta: None,
            theta: None,
        }
    }

    #[test]
    fn test_position_sizing() {
        let contract = put("XYZ", Decimal::from(20), Decimal::new(150, 2));
        let candidate = PutCandidate::price(&contract, Decimal::from(25_000))
            .unwrap()
            .unwrap();

        assert_eq!(candidate.collateral_per_contract, Decimal::from(2_000));
        assert_eq!(candidate.max_contracts, Decimal::from(12));
        assert_eq!(candidate.premium_income, Decimal::from(1_800));
        assert_eq!(candidate.exercise_value, Decimal::from(24_000));
        assert_eq!(candidate.score, candidate.premium_income);
    }

    #[test]
    fn test_unaffordable_contract() {
        let contract = put("XYZ", Decimal::from(50), Decimal::ONE);
        assert_eq!(PutCandidate::price(&contract, Decimal::from(4_999)).unwrap(), None);
        assert!(PutCandidate::price(&contract, Decimal::from(5_000))
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_large_funds_are_not_capped() {
        let contract = put("XYZ", Decimal::from(20), Decimal::ONE);
        let funds = Decimal::from_i128_with_scale(100_000_000_000_000_000_000_000, 0);

        let ranked = rank_puts(&[&contract], funds, 10);
        assert_eq!(ranked.len(), 1);
        assert_eq!(
            ranked[0].max_contracts,
            Decimal::from_i128_with_scale(50_000_000_000_000_000_000, 0)
        );
        assert_eq!(ranked[0].exercise_value, funds);
        assert_eq!(ranked[0].premium_income, funds / Decimal::from(20));
    }

    #[test]
    fn test_premium_overflow_is_reported() {
        let contract = put("XYZ", Decimal::new(1, 3), Decimal::from(1_000));
        let funds = Decimal::from_i128_with_scale(70_000_000_000_000_000_000_000_000, 0);

        let err = PutCandidate::price(&contract, funds).unwrap_err();
        assert!(matches!(err, ScreenError::InvalidRequest(_)));
        assert!(rank_puts(&[&contract], funds, 10).is_empty());
    }

    #[test]
    fn test_yield_breaks_premium_ties() {
        let aaa = put("AAA", Decimal::from(20), Decimal::ONE);
        let bbb = put("BBB", Decimal::from(75), Decimal::new(450, 2));
        let eligible = vec![&aaa, &bbb];

        let ranked = rank_puts(&eligible, Decimal::from(36_000), 10);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].premium_income, Decimal::from(1_800));
        assert_eq!(ranked[1].premium_income, Decimal::from(1_800));
        assert_eq!(ranked[0].symbol(), "BBB");
        assert_eq!(ranked[1].symbol(), "AAA");
    }

    #[test]
    fn test_symbol_breaks_full_ties() {
        let zzz = put("ZZZ", Decimal::from(20), Decimal::ONE);
        let aaa = put("AAA", Decimal::from(20), Decimal::ONE);
        let ranked = rank_puts(&[&zzz, &aaa], Decimal::from(10_000), 10);
        let symbols: Vec<_> = ranked.iter().map(|c| c.symbol()).collect();
        assert_eq!(symbols, vec!["AAA", "ZZZ"]);
    }

    #[test]
    fn test_truncation_and_ordering() {
        let contracts: Vec<_> = (1..=8)
            .map(|i| put(&format!("S{}", i), Decimal::from(10 * i), Decimal::from(i)))
            .collect();
        let eligible: Vec<_> = contracts.iter().collect();

        let ranked = rank_puts(&eligible, Decimal::from(50_000), 3);
        assert_eq!(ranked.len(), 3);
        assert!(ranked
            .windows(2)
            .all(|w| w[0].premium_income >= w[1].premium_income));
    }

    #[test]
    fn test_non_positive_funds() {
        let contract = put("XYZ", Decimal::from(20), Decimal::ONE);
        assert!(rank_puts(&[&contract], Decimal::ZERO, 10).is_empty());
        assert!(rank_puts(&[&contract], Decimal::from(-100), 10).is_empty());
    }

    #[test]
    fn test_duplicates_are_kept() {
        let a = put("DUP", Decimal::from(20), Decimal::ONE);
        let b = a.clone();
        assert_eq!(rank_puts(&[&a, &b], Decimal::from(10_000), 10).len(), 2);
    }

    #[test]
    fn test_best_per_symbol() {
        let contracts = vec![
            put("AAA", Decimal::from(20), Decimal::ONE),
            put("AAA", Decimal::from(15), Decimal::ONE),
            put("BBB", Decimal::from(20), Decimal::new(50, 2)),
        ];
        let screener = PutScreener::new(ScreenerConfig::default());

        let all = screener
            .screen(&contracts, &ScreeningRequest::new(Decimal::from(10_000), friday(), 10))
            .unwrap();
        assert_eq!(all.len(), 3);

        let request = ScreeningRequest::new(Decimal::from(10_000), friday(), 10).best_per_symbol(true);
        let best = screener.screen(&contracts, &request).unwrap();
        assert_eq!(best.len(), 2);
        assert_eq!(best[0].symbol(), "AAA");
        assert_eq!(best[0].strike, Decimal::from(15));
        assert_eq!(best[1].symbol(), "BBB");
    }

    #[test]
    fn test_zero_bid_ranks_last_when_allowed() {
        let contracts = vec![
            put("ZRO", Decimal::from(20), Decimal::ZERO),
            put("ONE", Decimal::from(20), Decimal::ONE),
        ];
        let request = ScreeningRequest::new(Decimal::from(10_000), friday(), 10);

        let strict = PutScreener::new(ScreenerConfig::default())
            .screen(&contracts, &request)
            .unwrap();
        assert_eq!(strict.len(), 1);

        let screener = PutScreener::new(ScreenerConfig {
            require_positive_bid: false,
            ..Default::default()
        });
        let ranked = screener.screen(&contracts, &request).unwrap();
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[1].symbol(), "ZRO");
        assert_eq!(ranked[1].premium_income, Decimal::ZERO);
        assert_eq!(ranked[1].max_contracts, Decimal::from(5));
    }

    #[test]
    fn test_screen_rejects_invalid_request() {
        let screener = PutScreener::new(ScreenerConfig::default());
        let err = screener
            .screen(&[], &ScreeningRequest::new(Decimal::ZERO, friday(), 10))
            .unwrap_err();
        assert!(matches!(err, ScreenError::InvalidRequest(_)));
    }

    #[test]
    fn test_malformed_contract_skipped_in_ranking() {
        let good = put("GOOD", Decimal::from(20), Decimal::ONE);
        let mut bad = put("BAD", Decimal::from(20), Decimal::ONE);
        bad.bid = None;
        let ranked = rank_puts(&[&bad, &good], Decimal::from(10_000), 10);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].symbol(), "GOOD");
    }
}
