//! Error types for simulation operations.

use thiserror::Error;

/// Errors encountered while composing and running the pipeline.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Scenario error: {0}")]
    Scenario(#[from] ox_scenario::ScenarioError),

    #[error("Exchange error: {0}")]
    Exchange(#[from] ox_exchange::ExchangeError),

    #[error("Backend error: {message}")]
    Backend { message: String },
}

pub type SimResult<T> = Result<T, SimError>;

impl From<ox_fluids::FluidError> for SimError {
    fn from(e: ox_fluids::FluidError) -> Self {
        SimError::Backend {
            message: e.to_string(),
        }
    }
}

impl From<ox_core::OxError> for SimError {
    fn from(e: ox_core::OxError) -> Self {
        SimError::Backend {
            message: e.to_string(),
        }
    }
}
