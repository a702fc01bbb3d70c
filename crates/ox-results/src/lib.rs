//! ox-results: simulation output types and run identity.

pub mod hash;
pub mod store;
pub mod types;

pub use hash::compute_run_id;
pub use store::{RunStore, load_outputs, save_outputs};
pub use types::{
    Co2StageSummary, RunMetadata, RunSummary, SimulationOutputs, TargetOutcome,
};

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Current RFC3339 timestamp for run manifests.
pub fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}
