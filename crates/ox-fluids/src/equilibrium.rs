//! Equilibrium (saturation) concentration calculator.
//!
//! Henry-law-type relation: the saturation concentration of a species is
//! its partial pressure times its solubility coefficient.

use crate::solubility::SolubilityModel;
use crate::species::Species;
use ox_core::units::constants::P_ATM_KPA;

/// Mole fraction of O2 in air, used for the DO% reference state.
pub const Y_O2_AIR: f64 = 0.21;
/// Mole fraction of N2 in air, used for the DO% reference state.
pub const Y_N2_AIR: f64 = 0.79;

/// Partial pressure of a species [kPa] from its mole fraction.
#[inline]
pub fn partial_pressure_kpa(mole_fraction: f64, p_total_kpa: f64) -> f64 {
    mole_fraction * p_total_kpa
}

/// Equilibrium concentration C* [mmol/L] of a species under the given gas
/// composition, total pressure, and temperature.
pub fn equilibrium_concentration_mmol_l(
    model: &dyn SolubilityModel,
    species: Species,
    mole_fraction: f64,
    p_total_kpa: f64,
    temperature_c: f64,
) -> f64 {
    let solubility = model.solubility_mmol_l_kpa(species, temperature_c);
    solubility * partial_pressure_kpa(mole_fraction, p_total_kpa)
}

/// Reference O2/N2 concentrations [mmol/L] for air-equilibrated water at
/// one standard atmosphere. DO% = 100% corresponds to the O2 value.
pub fn reference_concentrations_mmol_l(
    model: &dyn SolubilityModel,
    temperature_c: f64,
) -> (f64, f64) {
    let c_o2_ref =
        equilibrium_concentration_mmol_l(model, Species::O2, Y_O2_AIR, P_ATM_KPA, temperature_c);
    let c_n2_ref =
        equilibrium_concentration_mmol_l(model, Species::N2, Y_N2_AIR, P_ATM_KPA, temperature_c);
    (c_o2_ref, c_n2_ref)
}

/// Convert a dissolved-O2 concentration to DO% against the air/1 atm
/// reference.
pub fn do_percent_from_concentration(c_mmol_l: f64, c_ref_mmol_l: f64) -> f64 {
    (c_mmol_l / c_ref_mmol_l.max(1e-15)) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solubility::ConstantSolubility;

    #[test]
    fn air_equilibrium_at_one_atmosphere() {
        let model = ConstantSolubility::new();
        let cstar_o2 =
            equilibrium_concentration_mmol_l(&model, Species::O2, 0.21, 101.325, 25.0);
        let cstar_n2 =
            equilibrium_concentration_mmol_l(&model, Species::N2, 0.79, 101.325, 25.0);

        assert!((cstar_o2 - 0.0128 * 0.21 * 101.325).abs() < 1e-12);
        assert!((cstar_n2 - 0.0061 * 0.79 * 101.325).abs() < 1e-12);
    }

    #[test]
    fn zero_fraction_means_zero_equilibrium() {
        let model = ConstantSolubility::new();
        let cstar = equilibrium_concentration_mmol_l(&model, Species::N2, 0.0, 101.325, 25.0);
        assert_eq!(cstar, 0.0);
    }

    #[test]
    fn reference_state_is_hundred_percent() {
        let model = ConstantSolubility::new();
        let (c_ref, _) = reference_concentrations_mmol_l(&model, 25.0);
        let do_pct = do_percent_from_concentration(c_ref, c_ref);
        assert!((do_pct - 100.0).abs() < 1e-9);
    }

    #[test]
    fn pure_oxygen_well_above_reference() {
        let model = ConstantSolubility::new();
        let (c_ref, _) = reference_concentrations_mmol_l(&model, 37.0);
        let cstar = equilibrium_concentration_mmol_l(&model, Species::O2, 1.0, 101.325, 37.0);
        let do_pct = do_percent_from_concentration(cstar, c_ref);
        // 1/0.21 of the air reference at equal pressure
        assert!((do_pct - 100.0 / 0.21).abs() < 1e-6);
    }
}
