//! Scenario schema definitions.
//!
//! `SimulationInputs` is the immutable value object handed to the solver:
//! created once per run, validated before any computation, never mutated.
//! Mode switches are closed tagged enums so every combination is handled
//! exhaustively at construction time.

use ox_exchange::{Permeability, PressureMode, StageOrder, TubeGeometry};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulationInputs {
    /// Sweep-gas O2 mole fraction.
    pub y_o2: f64,
    /// Sweep-gas N2 mole fraction.
    pub y_n2: f64,
    pub pressure_mode: PressureMode,
    #[serde(default = "default_p_atm_kpa")]
    pub p_atm_kpa: f64,
    pub temperature_c: f64,
    /// Source vessel liquid volume [L].
    pub volume_l: f64,
    /// Liquid (perfusion) flow [mL/min].
    pub flow_ml_min: f64,
    pub geometry: TubeGeometry,
    /// Sweep-gas flow through the annulus [mL/min].
    pub gas_flow_ml_min: f64,
    pub transfer: TransferSpec,
    pub coupling: GasLiquidCoupling,
    pub c_o2_init_mmol_l: f64,
    pub c_n2_init_mmol_l: f64,
    pub t_end_s: f64,
    pub dt_s: f64,
    /// Total loop hold-up volume to the measurement point [mL]; tube
    /// volume is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_hold_up_volume_ml: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub co2_stage: Option<Co2StageInputs>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demand: Option<CellDemandInputs>,
    /// Target vessel DO% for the time-to-target estimate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_do_percent: Option<f64>,
}

fn default_p_atm_kpa() -> f64 {
    ox_core::units::constants::P_ATM_KPA
}

/// How the effective transfer-rate constants are obtained.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "model")]
pub enum TransferSpec {
    /// Direct volumetric rate constants.
    KLa {
        kla_o2_s_inv: f64,
        kla_n2_s_inv: f64,
    },
    /// Rates derived from membrane permeability and geometry.
    Permeability {
        perm_o2: Permeability,
        perm_n2: Permeability,
        /// Wall OD override for the rate derivation [mm].
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tube_od_override_mm: Option<f64>,
    },
}

impl TransferSpec {
    pub fn label(&self) -> &'static str {
        match self {
            TransferSpec::KLa { .. } => "kla",
            TransferSpec::Permeability { .. } => "permeability",
        }
    }
}

/// Gas-liquid coupling model for the exchanger.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind")]
pub enum GasLiquidCoupling {
    /// One control volume, fixed inlet gas composition.
    Lumped,
    /// N axial sections with counter-current gas depletion.
    Segmented { n_segments: usize },
}

impl GasLiquidCoupling {
    pub fn label(&self) -> &'static str {
        match self {
            GasLiquidCoupling::Lumped => "lumped",
            GasLiquidCoupling::Segmented { .. } => "segmented",
        }
    }
}

/// Optional CO2 conditioning/stripping sub-model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Co2StageInputs {
    #[serde(default = "default_stage_order")]
    pub stage_order: StageOrder,
    /// Conditioning section tube length [cm].
    pub conditioning_tube_length_cm: f64,
    /// CO2 content of the conditioning gas [%].
    pub conditioning_gas_co2_percent: f64,
    pub conditioning_gas_flow_ml_min: f64,
    pub transfer: Co2TransferSpec,
    pub c_co2_init_mmol_l: f64,
    pub hco3_mmol_l: f64,
    pub pka_app: f64,
}

fn default_stage_order() -> StageOrder {
    StageOrder::ConditioningFirst
}

/// Transfer-rate source for the CO2 stages.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "model")]
pub enum Co2TransferSpec {
    KLa { kla_co2_s_inv: f64 },
    Permeability { perm_co2: Permeability },
}

impl Co2TransferSpec {
    pub fn label(&self) -> &'static str {
        match self {
            Co2TransferSpec::KLa { .. } => "kla",
            Co2TransferSpec::Permeability { .. } => "permeability",
        }
    }
}

/// Cellular oxygen-demand parameters for the perfusion recommendation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CellDemandInputs {
    /// Total cell count in the culture system.
    pub total_cells: f64,
    /// Average per-cell O2 uptake [mol/cell/s].
    pub q_o2_cell_mol_s: f64,
    /// Safety factor on the demand (>= 1).
    pub margin_factor: f64,
}
