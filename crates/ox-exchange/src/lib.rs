//! ox-exchange: mass-transfer physics for gas-permeable tubing.
//!
//! Provides:
//! - Tube-in-shell geometry (volumes, areas, residence times)
//! - Pressure-mode resolution (manual or gas-flow backpressure curves)
//! - Transfer-coefficient resolution (direct kLa or permeability-derived)
//! - Lumped single-pass outlet solver (closed-form exponential approach)
//! - Segmented counter-current depletion solver
//! - Gas-supply limiting
//! - Two-stage CO2 module and bicarbonate pH estimate
//!
//! Everything here is a pure function of its arguments; scenario handling,
//! time stepping, and vessel dynamics live in `ox-sim`.

pub mod carbonate;
pub mod error;
pub mod geometry;
pub mod outlet;
pub mod pressure;
pub mod segmented;
pub mod supply;
pub mod transfer;

// Re-exports for public API
pub use carbonate::{Co2StageOutcome, Co2StageParams, StageOrder, bicarbonate_ph, two_stage_co2_outlet};
pub use error::{ExchangeError, ExchangeResult};
pub use geometry::{TubeGeometry, residence_time_s, tube_volume_ml};
pub use outlet::single_pass_outlet_mmol_l;
pub use pressure::{PressureMode, ResolvedPressure};
pub use segmented::{SegmentedOutcome, SegmentedParams, solve_segmented_outlet};
pub use supply::{SupplyLimited, apply_supply_limit, gas_supply_rate_mmol_min};
pub use transfer::{Permeability, effective_kla_from_permeability};
