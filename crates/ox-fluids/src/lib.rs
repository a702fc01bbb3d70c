//! ox-fluids: dissolved-gas property layer for oxyflow.
//!
//! Provides:
//! - Chemical species definitions (O2, N2, CO2)
//! - Gas composition handling (validated and normalized mole fractions)
//! - SolubilityModel trait for Henry-law coefficients
//! - Constant-coefficient solubility backend
//! - Equilibrium (saturation) concentration calculator
//!
//! # Architecture
//!
//! This crate defines a stable API (`SolubilityModel` trait) that isolates
//! the solvers from the property backend. The shipped backend uses constant
//! Henry-like coefficients; a temperature-coupled correlation can replace it
//! without touching any solver code.
//!
//! # Example
//!
//! ```
//! use ox_fluids::{ConstantSolubility, Species, equilibrium_concentration_mmol_l};
//!
//! let model = ConstantSolubility::new();
//! let cstar = equilibrium_concentration_mmol_l(&model, Species::O2, 0.21, 101.325, 25.0);
//! assert!(cstar > 0.0);
//! ```

pub mod composition;
pub mod equilibrium;
pub mod error;
pub mod solubility;
pub mod species;

// Re-exports for ergonomics
pub use composition::GasComposition;
pub use equilibrium::{
    do_percent_from_concentration, equilibrium_concentration_mmol_l, partial_pressure_kpa,
    reference_concentrations_mmol_l,
};
pub use error::{FluidError, FluidResult};
pub use solubility::{ConstantSolubility, SolubilityModel};
pub use species::Species;
