pub mod dates;
pub mod loader;
pub mod types;

pub use dates::{days_to_expiration, next_friday};
pub use loader::{ChainSource, LoaderError, ParquetChainLoader, REQUIRED_COLUMNS};
pub use types::{is_standard_option_symbol, OptionContract, OptionType, CONTRACT_MULTIPLIER};
