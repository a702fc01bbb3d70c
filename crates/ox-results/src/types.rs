//! Result data types.
//!
//! Field names and unit suffixes are the stable export contract: exporters
//! consume these types through serde, so renames are schema changes.

use ox_scenario::SimulationInputs;
use serde::{Deserialize, Serialize};

/// Full result of one simulation run.
///
/// All time-series vectors have identical length
/// `n = floor(t_end/dt) + 1`. Produced once, then only read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulationOutputs {
    pub time_s: Vec<f64>,
    /// Single-pass outlet trace (concentration leaving the exchanger).
    pub c_o2_out_mmol_l: Vec<f64>,
    pub c_n2_out_mmol_l: Vec<f64>,
    /// Well-mixed source-vessel trace.
    pub c_o2_vessel_mmol_l: Vec<f64>,
    pub c_n2_vessel_mmol_l: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub c_co2_vessel_mmol_l: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ph_vessel: Option<Vec<f64>>,
    /// Equilibrium concentrations under the resolved annulus gas.
    pub cstar_o2_mmol_l: f64,
    pub cstar_n2_mmol_l: f64,
    pub summary: RunSummary,
    pub metadata: RunMetadata,
}

impl SimulationOutputs {
    /// Number of time samples.
    pub fn len(&self) -> usize {
        self.time_s.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time_s.is_empty()
    }
}

/// Derived per-run scalars and solver diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunSummary {
    /// Physical model tag (kLa- or permeability-based Henry model).
    pub model: String,
    /// Solver tag (analytical plug flow or segmented gas-liquid).
    pub solver: String,
    pub n_steps: usize,
    pub dt_s: f64,
    pub t_end_s: f64,
    pub tube_volume_ml: f64,
    pub annulus_volume_ml: f64,
    pub residence_time_s: f64,
    pub gas_residence_time_s: f64,
    pub transport_delay_s: f64,
    pub p_total_kpa: f64,
    pub delta_p_mbar: f64,
    pub effective_kla_o2_s_inv: f64,
    pub effective_kla_n2_s_inv: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_kla_co2_s_inv: Option<f64>,
    pub o2_supply_rate_mmol_min: f64,
    pub o2_transfer_limited: bool,
    /// Depleted gas composition leaving the shell (segmented mode only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_out_y_o2: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_out_y_n2: Option<f64>,
    /// Axial profiles from the first single-pass solve (segmented mode).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liq_profile_o2_mmol_l: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_profile_y_o2: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub co2_stages: Option<Co2StageSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<TargetOutcome>,
}

/// CO2 stage values at steady state, in the active stage order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Co2StageSummary {
    pub stage_order: String,
    pub c_co2_in_mmol_l: f64,
    pub c_after_conditioning_mmol_l: f64,
    pub c_after_stripping_mmol_l: f64,
    pub c_co2_outlet_mmol_l: f64,
    pub ph_outlet: f64,
    pub conditioning_limited: bool,
}

/// Whether and when the vessel reached the target DO%.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status")]
pub enum TargetOutcome {
    /// Crossed the target; time interpolated between bracketing samples.
    Reached { t_s: f64 },
    /// Vessel started within tolerance of the target.
    AlreadyAt,
    /// Horizon ended without crossing.
    NotReached,
}

/// Run identity plus the complete input echo.
///
/// Everything an exporter needs to reproduce the run: the full input set,
/// the property-source tag, the solver version, and a content-derived id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunMetadata {
    pub run_id: String,
    pub timestamp: String,
    pub solver_version: String,
    /// Solubility backend tag (e.g. `constant_henry_v1`).
    pub solubility_source: String,
    pub inputs: SimulationInputs,
}
