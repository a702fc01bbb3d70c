//! Gas-supply limiting.
//!
//! The exchanger cannot add more of a species to the liquid than the
//! sweep gas delivers. The cap applies to the species being fed (O2 in
//! the main exchanger, CO2 in the conditioning stage), never to species
//! that merely equilibrate (N2).

use ox_core::units::constants::{R_KPA_L_PER_MOL_K, kelvin_from_celsius};

/// Molar delivery rate [mmol/min] of one species in the sweep gas,
/// assuming ideal gas behavior at the annulus pressure.
pub fn gas_supply_rate_mmol_min(
    gas_flow_ml_min: f64,
    mole_fraction: f64,
    p_total_kpa: f64,
    temperature_c: f64,
) -> f64 {
    let temperature_k = kelvin_from_celsius(temperature_c);
    let gas_concentration_mmol_l =
        (p_total_kpa / (R_KPA_L_PER_MOL_K * temperature_k)) * 1000.0;
    (gas_flow_ml_min / 1000.0) * mole_fraction * gas_concentration_mmol_l
}

/// Outcome of applying the supply cap to a solved outlet concentration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SupplyLimited {
    pub c_out_mmol_l: f64,
    pub limited: bool,
}

/// Cap the outlet concentration so the implied uptake rate does not exceed
/// the gas-phase molar supply. Applied once, after the outlet solver.
pub fn apply_supply_limit(
    c_in_mmol_l: f64,
    c_out_mmol_l: f64,
    liquid_flow_l_min: f64,
    supply_rate_mmol_min: f64,
) -> SupplyLimited {
    let required_rate_mmol_min = ((c_out_mmol_l - c_in_mmol_l) * liquid_flow_l_min).max(0.0);
    if required_rate_mmol_min > supply_rate_mmol_min {
        let max_delta_c = supply_rate_mmol_min / liquid_flow_l_min.max(1e-15);
        SupplyLimited {
            c_out_mmol_l: c_in_mmol_l + max_delta_c,
            limited: true,
        }
    } else {
        SupplyLimited {
            c_out_mmol_l,
            limited: false,
        }
    }
}
