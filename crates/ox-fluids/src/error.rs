//! Fluid property errors.

use thiserror::Error;

/// Result type for fluid operations.
pub type FluidResult<T> = Result<T, FluidError>;

/// Errors that can occur in the dissolved-gas property layer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FluidError {
    /// Non-physical values (negative fraction, non-finite pressure, etc.).
    #[error("Non-physical value for {what}")]
    NonPhysical { what: &'static str },

    /// Invalid argument.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Mole fractions do not close to one.
    #[error("Mole fractions sum to {sum}, expected 1 within {tol}")]
    FractionsNotClosed { sum: f64, tol: f64 },
}
