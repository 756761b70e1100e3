//! Options screening CLI
//!
//! # Usage
//!
//! ```bash
//! # Rank cash-secured puts expiring next Friday for $25,000
//! analyze-options puts --chain data/chains.parquet --funds 25000
//!
//! # Specific expiration, top 20, including adjusted contracts
//! analyze-options puts --chain data/chains.parquet --funds 25000 -r 20 \
//!     --date 2025-04-18 --include-nonstandard
//!
//! # Covered calls for one stock over the next 90 days
//! analyze-options calls AAPL --chain data/chains.parquet
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::info;

use premium_screener::data::{next_friday, ChainSource, ParquetChainLoader};
use premium_screener::report::{format_call_report, format_put_report};
use premium_screener::screening::{
    parse_date, CoveredCallRequest, CoveredCallSelector, PutScreener, ScreeningRequest,
};
use premium_screener::ScreenerConfig;

#[derive(Parser)]
#[command(name = "analyze-options")]
#[command(about = "Screen cash-secured puts and covered calls from option chain data")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON instead of a table
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank cash-secured puts for the available funds
    Puts {
        /// Path to option chain parquet file
        #[arg(long)]
        chain: String,

        /// Available funds for trading
        #[arg(short, long)]
        funds: Decimal,

        /// Number of top results to display
        #[arg(short, long, default_value_t = 10)]
        results: usize,

        /// Expiration date (YYYY-MM-DD), defaults to next Friday
        #[arg(short, long)]
        date: Option<String>,

        /// Include non-standard options (adjusted for splits/mergers)
        #[arg(long)]
        include_nonstandard: bool,

        /// Show only the best put per symbol
        #[arg(long)]
        best_per_symbol: bool,
    },

    /// Select covered calls for one stock
    Calls {
        /// Stock symbol to analyze
        symbol: String,

        /// Path to option chain parquet file
        #[arg(long)]
        chain: String,

        /// Evaluation date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        as_of: Option<String>,

        /// Include non-standard options (adjusted for splits/mergers)
        #[arg(long)]
        include_nonstandard: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("premium_screener=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ScreenerConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ScreenerConfig::default(),
    };
    let today = Local::now().date_naive();

    match cli.command {
        Commands::Puts {
            chain,
            funds,
            results,
            date,
            include_nonstandard,
            best_per_symbol,
        } => {
            let target_date = match date {
                Some(d) => parse_date(&d)?,
                None => next_friday(today),
            };
            let request = ScreeningRequest::new(funds, target_date, results)
                .include_nonstandard(include_nonstandard)
                .best_per_symbol(best_per_symbol);
            request.validate()?;

            let contracts = ParquetChainLoader::new(&chain)
                .with_strike_count(config.strike_count)
                .load_contracts()
                .with_context(|| format!("Failed to load chain {}", chain))?;
            info!("Using PUT options expiring on: {}", target_date);

            let candidates = PutScreener::new(config).screen(&contracts, &request)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&candidates)?);
            } else {
                println!("{}", format_put_report(funds, target_date, &candidates));
            }
        }
        Commands::Calls {
            symbol,
            chain,
            as_of,
            include_nonstandard,
        } => {
            let as_of = match as_of {
                Some(d) => parse_date(&d)?,
                None => today,
            };
            let request =
                CoveredCallRequest::new(&symbol, as_of).include_nonstandard(include_nonstandard);
            request.validate()?;

            let contracts = ParquetChainLoader::new(&chain)
                .with_strike_count(config.strike_count)
                .load_symbol(&request.symbol)
                .with_context(|| format!("Failed to load chain {}", chain))?;

            let picks = CoveredCallSelector::new(config).select(&contracts, &request)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&picks)?);
            } else {
                println!("{}", format_call_report(&request.symbol, as_of, &picks));
            }
        }
    }

    Ok(())
}
