//! Transient simulation pipeline for recirculating gas-exchange loops.
//!
//! Provides:
//! - Per-run resolution (pressure mode, transfer coefficients, equilibria)
//! - Single-pass steady outlet (lumped or segmented, supply-limited)
//! - Transport-delay line and well-mixed vessel Euler integration
//! - Time-to-target estimation with sub-step interpolation
//! - Demand-driven perfusion recommendation sweep

pub mod error;
pub mod pipeline;
pub mod simulate;
pub mod sweep;
pub mod vessel;

// Re-exports for public API
pub use error::{SimError, SimResult};
pub use pipeline::{
    ResolvedRun, SteadyOutlet, TransferCoefficients, compute_equilibrium, o2_demand_mmol_min,
    resolve_pressure, steady_outlet, transfer_coefficients,
};
pub use simulate::{SOLVER_VERSION, simulate};
pub use sweep::{FlowSweep, SweepOutcome, SweepPoint, recommend_perfusion};
pub use vessel::{DelayLine, delay_steps, time_to_target, vessel_step};
