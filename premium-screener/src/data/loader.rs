//! Chain loader for option chain parquet files.
//!
//! Materializes option chain rows into [`OptionContract`]s before screening.
//! One row per contract, with the following schema:
//! - symbol, option_type, strike, expiration, bid
//! - underlying_price, underlying_volume
//! - optional: option_symbol, is_standard, delta, theta
//!
//! Expirations may be stored as strings (`YYYY-MM-DD`, optionally followed by
//! a time) or as a date column. Null strikes, bids and expirations are kept
//! as `None` so the engines can reject them explicitly.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use polars::prelude::*;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{info, warn};

use super::types::{is_standard_option_symbol, OptionContract, OptionType};

/// Columns every chain file must provide.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "symbol",
    "option_type",
    "strike",
    "expiration",
    "bid",
    "underlying_price",
    "underlying_volume",
];

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A source of materialized option chain rows.
pub trait ChainSource {
    fn load_contracts(&self) -> Result<Vec<OptionContract>, LoaderError>;

    /// Rows for a single underlying.
    fn load_symbol(&self, symbol: &str) -> Result<Vec<OptionContract>, LoaderError> {
        Ok(self
            .load_contracts()?
            .into_iter()
            .filter(|c| c.symbol.eq_ignore_ascii_case(symbol))
            .collect())
    }
}

/// Parquet chain loader.
pub struct ParquetChainLoader {
    path: String,
    strike_count: Option<usize>,
}

impl ParquetChainLoader {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            strike_count: None,
        }
    }

    /// Keep at most `count` strikes per symbol, expiration and side, nearest
    /// to the underlying price first. Zero disables the cap.
    pub fn with_strike_count(mut self, count: usize) -> Self {
        self.strike_count = (count > 0).then_some(count);
        self
    }

    pub fn load_dataframe(&self) -> Result<DataFrame, LoaderError> {
        if !Path::new(&self.path).exists() {
            return Err(LoaderError::FileNotFound(self.path.clone()));
        }
        let file = File::open(&self.path)?;
        Ok(ParquetReader::new(file).finish()?)
    }
}

impl ChainSource for ParquetChainLoader {
    fn load_contracts(&self) -> Result<Vec<OptionContract>, LoaderError> {
        let df = self.load_dataframe()?;
        let mut contracts = dataframe_to_contracts(&df)?;
        if let Some(count) = self.strike_count {
            contracts = limit_strikes(contracts, count);
        }
        info!("Loaded {} option contracts from {}", contracts.len(), self.path);
        Ok(contracts)
    }
}

fn str_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>, LoaderError> {
    let column = df.column(name)?.cast(&DataType::String)?;
    Ok(column
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

fn f64_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, LoaderError> {
    let column = df.column(name)?.cast(&DataType::Float64)?;
    Ok(column.f64()?.into_iter().collect())
}

fn i64_values(df: &DataFrame, name: &str) -> Result<Vec<Option<i64>>, LoaderError> {
    let column = df.column(name)?.cast(&DataType::Int64)?;
    Ok(column.i64()?.into_iter().collect())
}

fn bool_values(df: &DataFrame, name: &str) -> Result<Vec<Option<bool>>, LoaderError> {
    let column = df.column(name)?.cast(&DataType::Boolean)?;
    Ok(column.bool()?.into_iter().collect())
}

/// Values of an optional column; all nulls when the column is absent.
fn optional<T: Clone>(
    df: &DataFrame,
    name: &str,
    read: fn(&DataFrame, &str) -> Result<Vec<Option<T>>, LoaderError>,
) -> Result<Vec<Option<T>>, LoaderError> {
    if df.column(name).is_ok() {
        read(df, name)
    } else {
        Ok(vec![None; df.height()])
    }
}

fn to_decimal(value: Option<f64>) -> Option<Decimal> {
    value.and_then(Decimal::from_f64)
}

fn parse_expiration(value: &str) -> Option<NaiveDate> {
    let day = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Convert a chain DataFrame into contracts.
///
/// Rows without a symbol, a recognizable option type, an underlying price or
/// an underlying volume cannot be attributed and are dropped with a warning.
pub fn dataframe_to_contracts(df: &DataFrame) -> Result<Vec<OptionContract>, LoaderError> {
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|name| df.column(name).is_err())
        .collect();
    if !missing.is_empty() {
        return Err(LoaderError::InvalidData(format!(
            "missing columns: {}",
            missing.join(", ")
        )));
    }

    let symbols = str_values(df, "symbol")?;
    let option_types = str_values(df, "option_type")?;
    let strikes = f64_values(df, "strike")?;
    let expirations = str_values(df, "expiration")?;
    let bids = f64_values(df, "bid")?;
    let prices = f64_values(df, "underlying_price")?;
    let volumes = i64_values(df, "underlying_volume")?;
    let option_symbols = optional(df, "option_symbol", str_values)?;
    let standard_flags = optional(df, "is_standard", bool_values)?;
    let deltas = optional(df, "delta", f64_values)?;
    let thetas = optional(df, "theta", f64_values)?;

    let mut contracts = Vec::with_capacity(df.height());
    let mut dropped = 0usize;

    for idx in 0..df.height() {
        let Some(symbol) = symbols[idx].clone() else {
            dropped += 1;
            continue;
        };
        let Some(option_type) = option_types[idx].as_deref().and_then(OptionType::from_str) else {
            warn!("Row {}: unknown option type for {}", idx, symbol);
            dropped += 1;
            continue;
        };
        let (Some(underlying_price), Some(underlying_volume)) =
            (to_decimal(prices[idx]), volumes[idx])
        else {
            warn!("Row {}: missing underlying quote for {}", idx, symbol);
            dropped += 1;
            continue;
        };

        let option_symbol = option_symbols[idx].clone().unwrap_or_default();
        let is_standard = standard_flags[idx]
            .unwrap_or_else(|| is_standard_option_symbol(&option_symbol));

        contracts.push(OptionContract {
            symbol,
            option_symbol,
            underlying_price,
            option_type,
            strike: to_decimal(strikes[idx]),
            expiration: expirations[idx].as_deref().and_then(parse_expiration),
            bid: to_decimal(bids[idx]),
            underlying_volume,
            is_standard,
            delta: deltas[idx],
            theta: thetas[idx],
        });
    }

    if dropped > 0 {
        warn!("Dropped {} unattributable chain rows", dropped);
    }

    Ok(contracts)
}

/// Keep the `count` strikes nearest the underlying price for each symbol,
/// expiration and side. Rows without a strike are always kept.
pub fn limit_strikes(contracts: Vec<OptionContract>, count: usize) -> Vec<OptionContract> {
    let mut groups: HashMap<(&str, Option<NaiveDate>, OptionType), Vec<usize>> = HashMap::new();
    for (idx, contract) in contracts.iter().enumerate() {
        if contract.strike.is_some() {
            groups
                .entry((contract.symbol.as_str(), contract.expiration, contract.option_type))
                .or_default()
                .push(idx);
        }
    }

    let mut keep = vec![true; contracts.len()];
    for indices in groups.values_mut() {
        if indices.len() <= count {
            continue;
        }
        indices.sort_by_key(|&idx| {
            let contract = &contracts[idx];
            let strike = contract.strike.unwrap_or_default();
            ((strike - contract.underlying_price).abs(), idx)
        });
        for &idx in &indices[count..] {
            keep[idx] = false;
        }
    }

    contracts
        .into_iter()
        .zip(keep)
        .filter_map(|(contract, kept)| kept.then_some(contract))
        .collect()
}
