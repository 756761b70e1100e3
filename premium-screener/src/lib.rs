pub mod config;
pub mod data;
pub mod error;
pub mod report;
pub mod screening;

// Re-export commonly used types
pub use config::{ConfigError, ScreenerConfig};
pub use data::{ChainSource, LoaderError, OptionContract, OptionType, ParquetChainLoader};
pub use error::{ScreenError, ScreenResult};
pub use screening::{
    CallPick, CoveredCallRequest, CoveredCallSelector, PutCandidate, PutScreener,
    ScreeningRequest,
};
