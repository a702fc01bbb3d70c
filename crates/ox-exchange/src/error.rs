//! Exchanger physics errors.

use thiserror::Error;

/// Result type for exchanger operations.
pub type ExchangeResult<T> = Result<T, ExchangeError>;

/// Errors from the exchanger physics layer.
///
/// Degenerate denominators (zero flow, zero volume) are rejected by
/// scenario validation before any of this code runs; the variants here
/// cover geometry contradictions that only surface once an override is
/// applied, and non-physical intermediate values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExchangeError {
    /// Non-physical values (negative wall thickness, etc.).
    #[error("Non-physical value for {what}")]
    NonPhysical { what: &'static str },

    /// Invalid argument.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}
