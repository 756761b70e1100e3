//! Errors raised by the screening engines.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScreenError {
    /// The request cannot be screened (non-positive funds, zero result
    /// count, empty symbol, malformed date).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A contract lacks a field the requested operation needs. Screening
    /// skips the record and continues.
    #[error("Malformed contract {contract}: missing or invalid {field}")]
    MalformedContract {
        contract: String,
        field: &'static str,
    },
}

pub type ScreenResult<T> = Result<T, ScreenError>;
