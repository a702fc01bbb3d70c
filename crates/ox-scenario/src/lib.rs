//! ox-scenario: canonical scenario file format and validation.

pub mod schema;
pub mod validate;

pub use schema::*;
pub use validate::{Violation, validate};

// Physics-layer types embedded in the schema, re-exported so scenario
// consumers do not need a direct ox-exchange dependency.
pub use ox_exchange::{Permeability, PressureMode, StageOrder, TubeGeometry};

pub type ScenarioResult<T> = Result<T, ScenarioError>;

#[derive(thiserror::Error, Debug)]
pub enum ScenarioError {
    #[error("Invalid scenario: {}", validate::join_violations(.violations))]
    Invalid { violations: Vec<Violation> },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_yaml(path: &std::path::Path) -> ScenarioResult<SimulationInputs> {
    let content = std::fs::read_to_string(path)?;
    let inputs: SimulationInputs = serde_yaml::from_str(&content)?;
    validate(&inputs)?;
    Ok(inputs)
}

pub fn save_yaml(path: &std::path::Path, inputs: &SimulationInputs) -> ScenarioResult<()> {
    validate(inputs)?;
    let content = serde_yaml::to_string(inputs)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &std::path::Path) -> ScenarioResult<SimulationInputs> {
    let content = std::fs::read_to_string(path)?;
    let inputs: SimulationInputs = serde_json::from_str(&content)?;
    validate(&inputs)?;
    Ok(inputs)
}

pub fn save_json(path: &std::path::Path, inputs: &SimulationInputs) -> ScenarioResult<()> {
    validate(inputs)?;
    let content = serde_json::to_string_pretty(inputs)?;
    std::fs::write(path, content)?;
    Ok(())
}
