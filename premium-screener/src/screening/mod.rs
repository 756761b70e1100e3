//! Options screening engines.
//!
//! Provides:
//! - Eligibility filtering (liquidity, price floor, standard contracts, moneyness)
//! - Cash-secured put screening under a funds budget
//! - Covered call selection per expiration for one underlying

pub mod calls;
pub mod eligibility;
pub mod puts;
pub mod request;

pub use calls::{select_calls, CallPick, CoveredCallSelector};
pub use eligibility::{EligibilityFilter, FilterOptions, ScreenFlow};
pub use puts::{rank_puts, PutCandidate, PutScreener};
pub use request::{parse_date, CoveredCallRequest, ScreeningRequest};
