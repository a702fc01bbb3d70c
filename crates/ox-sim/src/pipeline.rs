//! Per-run resolution and the single-pass steady outlet.
//!
//! `ResolvedRun` folds the scenario into the quantities the inner loops
//! actually consume — resolved pressure, effective rate constants,
//! equilibrium concentrations, volumes, residence times, supply rates —
//! so the time stepper and the sweep never re-derive them.

use crate::error::{SimError, SimResult};
use ox_core::numeric::ensure_finite;
use ox_exchange::{
    Co2StageParams, Permeability, ResolvedPressure, SegmentedOutcome, SegmentedParams,
    TubeGeometry, apply_supply_limit, effective_kla_from_permeability,
    gas_supply_rate_mmol_min, residence_time_s, single_pass_outlet_mmol_l,
    solve_segmented_outlet, tube_volume_ml,
};
use ox_fluids::{GasComposition, SolubilityModel, Species, equilibrium_concentration_mmol_l};
use ox_scenario::{Co2TransferSpec, GasLiquidCoupling, SimulationInputs, TransferSpec};

/// Effective first-order rate constants for the run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransferCoefficients {
    pub kla_o2_s_inv: f64,
    pub kla_n2_s_inv: f64,
    /// Present when the CO2 stage is enabled.
    pub kla_co2_s_inv: Option<f64>,
}

/// Resolve total annulus pressure for a scenario.
pub fn resolve_pressure(inputs: &SimulationInputs) -> ResolvedPressure {
    inputs
        .pressure_mode
        .resolve(inputs.gas_flow_ml_min, inputs.p_atm_kpa)
}

/// Equilibrium concentrations (C*) for O2 and N2 under the resolved
/// annulus gas [mmol/L].
pub fn compute_equilibrium(
    inputs: &SimulationInputs,
    solubility: &dyn SolubilityModel,
) -> (f64, f64) {
    let p_total_kpa = resolve_pressure(inputs).p_total_kpa;
    let cstar_o2 = equilibrium_concentration_mmol_l(
        solubility,
        Species::O2,
        inputs.y_o2,
        p_total_kpa,
        inputs.temperature_c,
    );
    let cstar_n2 = equilibrium_concentration_mmol_l(
        solubility,
        Species::N2,
        inputs.y_n2,
        p_total_kpa,
        inputs.temperature_c,
    );
    (cstar_o2, cstar_n2)
}

/// Resolve effective rate constants for every species the run tracks.
pub fn transfer_coefficients(
    inputs: &SimulationInputs,
    solubility: &dyn SolubilityModel,
) -> SimResult<TransferCoefficients> {
    let (kla_o2_s_inv, kla_n2_s_inv) = match &inputs.transfer {
        TransferSpec::KLa {
            kla_o2_s_inv,
            kla_n2_s_inv,
        } => (*kla_o2_s_inv, *kla_n2_s_inv),
        TransferSpec::Permeability {
            perm_o2,
            perm_n2,
            tube_od_override_mm,
        } => {
            let kla_o2 = permeability_kla(
                *perm_o2,
                &inputs.geometry,
                *tube_od_override_mm,
                solubility,
                Species::O2,
                inputs.temperature_c,
            )?;
            let kla_n2 = permeability_kla(
                *perm_n2,
                &inputs.geometry,
                *tube_od_override_mm,
                solubility,
                Species::N2,
                inputs.temperature_c,
            )?;
            (kla_o2, kla_n2)
        }
    };

    let kla_co2_s_inv = match &inputs.co2_stage {
        None => None,
        Some(co2) => Some(match &co2.transfer {
            Co2TransferSpec::KLa { kla_co2_s_inv } => *kla_co2_s_inv,
            Co2TransferSpec::Permeability { perm_co2 } => permeability_kla(
                *perm_co2,
                &inputs.geometry,
                None,
                solubility,
                Species::CO2,
                inputs.temperature_c,
            )?,
        }),
    };

    Ok(TransferCoefficients {
        kla_o2_s_inv,
        kla_n2_s_inv,
        kla_co2_s_inv,
    })
}

fn permeability_kla(
    perm: Permeability,
    geometry: &TubeGeometry,
    od_override_mm: Option<f64>,
    solubility: &dyn SolubilityModel,
    species: Species,
    temperature_c: f64,
) -> SimResult<f64> {
    Ok(effective_kla_from_permeability(
        perm,
        geometry,
        od_override_mm,
        solubility.solubility_mmol_l_kpa(species, temperature_c),
    )?)
}

/// Scenario constants resolved once per run.
pub struct ResolvedRun {
    pub pressure: ResolvedPressure,
    /// Sweep-gas feed composition, re-checked for closure.
    pub gas_inlet: GasComposition,
    pub coefficients: TransferCoefficients,
    pub cstar_o2_mmol_l: f64,
    pub cstar_n2_mmol_l: f64,
    pub tube_volume_ml: f64,
    pub annulus_volume_ml: f64,
    pub residence_time_s: f64,
    pub gas_residence_time_s: f64,
    pub o2_supply_rate_mmol_min: f64,
    pub liquid_flow_l_min: f64,
    /// Resolved CO2 stage parameters when the sub-model is enabled.
    pub co2_params: Option<Co2StageParams>,
    pub model_tag: &'static str,
    pub solver_tag: &'static str,
}

impl ResolvedRun {
    pub fn new(
        inputs: &SimulationInputs,
        solubility: &dyn SolubilityModel,
    ) -> SimResult<ResolvedRun> {
        let pressure = resolve_pressure(inputs);
        let gas_inlet = GasComposition::from_fractions(vec![
            (Species::O2, inputs.y_o2),
            (Species::N2, inputs.y_n2),
        ])?;
        let coefficients = transfer_coefficients(inputs, solubility)?;
        ensure_finite(coefficients.kla_o2_s_inv, "effective kLa O2")?;
        ensure_finite(coefficients.kla_n2_s_inv, "effective kLa N2")?;
        let (cstar_o2_mmol_l, cstar_n2_mmol_l) = compute_equilibrium(inputs, solubility);

        let tube_volume = inputs.geometry.tube_volume_ml();
        let annulus_volume = inputs.geometry.annulus_volume_ml();
        let tau_s = ensure_finite(
            residence_time_s(tube_volume, inputs.flow_ml_min),
            "liquid residence time",
        )?;
        let gas_tau_s = residence_time_s(annulus_volume, inputs.gas_flow_ml_min);

        let o2_supply_rate_mmol_min = gas_supply_rate_mmol_min(
            inputs.gas_flow_ml_min,
            inputs.y_o2,
            pressure.p_total_kpa,
            inputs.temperature_c,
        );
        let liquid_flow_l_min = inputs.flow_ml_min / 1000.0;

        let co2_params = match (&inputs.co2_stage, coefficients.kla_co2_s_inv) {
            (Some(co2), Some(kla_co2)) => {
                let y_co2 = co2.conditioning_gas_co2_percent / 100.0;
                let cstar_conditioning = equilibrium_concentration_mmol_l(
                    solubility,
                    Species::CO2,
                    y_co2,
                    pressure.p_total_kpa,
                    inputs.temperature_c,
                );
                let conditioning_supply = gas_supply_rate_mmol_min(
                    co2.conditioning_gas_flow_ml_min,
                    y_co2,
                    pressure.p_total_kpa,
                    inputs.temperature_c,
                );
                let tau_conditioning_s = residence_time_s(
                    tube_volume_ml(inputs.geometry.tube_id_mm, co2.conditioning_tube_length_cm),
                    inputs.flow_ml_min,
                );
                Some(Co2StageParams {
                    k_eff_co2_s_inv: kla_co2,
                    tau_conditioning_s,
                    tau_stripping_s: tau_s,
                    cstar_conditioning_mmol_l: cstar_conditioning,
                    conditioning_supply_mmol_min: conditioning_supply,
                    liquid_flow_l_min,
                    order: co2.stage_order,
                })
            }
            _ => None,
        };

        let model_tag = match inputs.transfer {
            TransferSpec::KLa { .. } => "single_pass_tubing_kLa_Henry",
            TransferSpec::Permeability { .. } => "single_pass_tubing_permeability_Henry",
        };
        let solver_tag = match inputs.coupling {
            GasLiquidCoupling::Lumped => "analytical_plug_flow",
            GasLiquidCoupling::Segmented { .. } => "segmented_gas_liquid",
        };

        Ok(ResolvedRun {
            pressure,
            gas_inlet,
            coefficients,
            cstar_o2_mmol_l,
            cstar_n2_mmol_l,
            tube_volume_ml: tube_volume,
            annulus_volume_ml: annulus_volume,
            residence_time_s: tau_s,
            gas_residence_time_s: gas_tau_s,
            o2_supply_rate_mmol_min,
            liquid_flow_l_min,
            co2_params,
            model_tag,
            solver_tag,
        })
    }
}

/// Steady single-pass outlet for one inlet state.
#[derive(Debug, Clone)]
pub struct SteadyOutlet {
    pub c_o2_out_mmol_l: f64,
    pub c_n2_out_mmol_l: f64,
    pub o2_transfer_limited: bool,
    /// Populated in segmented mode.
    pub segmented: Option<SegmentedOutcome>,
}

/// Compute the steady single-pass outlet for the given inlet
/// concentrations, honoring the coupling mode and the gas-supply cap.
pub fn steady_outlet(
    inputs: &SimulationInputs,
    run: &ResolvedRun,
    solubility: &dyn SolubilityModel,
    c_o2_in_mmol_l: f64,
    c_n2_in_mmol_l: f64,
) -> SteadyOutlet {
    match inputs.coupling {
        GasLiquidCoupling::Segmented { n_segments } => {
            let params = SegmentedParams {
                solubility,
                y_o2_inlet: run.gas_inlet.mole_fraction(Species::O2),
                y_n2_inlet: run.gas_inlet.mole_fraction(Species::N2),
                gas_flow_ml_min: inputs.gas_flow_ml_min,
                p_total_kpa: run.pressure.p_total_kpa,
                temperature_c: inputs.temperature_c,
                flow_ml_min: inputs.flow_ml_min,
                n_segments,
                kla_o2_s_inv: run.coefficients.kla_o2_s_inv,
                kla_n2_s_inv: run.coefficients.kla_n2_s_inv,
                residence_time_s: run.residence_time_s,
            };
            let outcome = solve_segmented_outlet(&params, c_o2_in_mmol_l, c_n2_in_mmol_l);
            SteadyOutlet {
                c_o2_out_mmol_l: outcome.c_o2_out_mmol_l,
                c_n2_out_mmol_l: outcome.c_n2_out_mmol_l,
                o2_transfer_limited: outcome.o2_transfer_limited,
                segmented: Some(outcome),
            }
        }
        GasLiquidCoupling::Lumped => {
            let c_o2_solved = single_pass_outlet_mmol_l(
                c_o2_in_mmol_l,
                run.cstar_o2_mmol_l,
                run.coefficients.kla_o2_s_inv,
                run.residence_time_s,
            );
            let c_n2_out = single_pass_outlet_mmol_l(
                c_n2_in_mmol_l,
                run.cstar_n2_mmol_l,
                run.coefficients.kla_n2_s_inv,
                run.residence_time_s,
            );
            // Supply cap applies to the fed species only
            let capped = apply_supply_limit(
                c_o2_in_mmol_l,
                c_o2_solved,
                run.liquid_flow_l_min,
                run.o2_supply_rate_mmol_min,
            );
            SteadyOutlet {
                c_o2_out_mmol_l: capped.c_out_mmol_l,
                c_n2_out_mmol_l: c_n2_out,
                o2_transfer_limited: capped.limited,
                segmented: None,
            }
        }
    }
}

/// Validate demand parameters exist and convert to a demand rate
/// [mmol/min]: cells × mol/cell/s × 60 s/min × 1000 mmol/mol × margin.
pub fn o2_demand_mmol_min(inputs: &SimulationInputs) -> SimResult<f64> {
    let demand = inputs.demand.as_ref().ok_or(SimError::InvalidArg {
        what: "cell-demand parameters are required for a perfusion recommendation",
    })?;
    Ok(demand.total_cells * demand.q_o2_cell_mol_s * 60.0 * 1000.0 * demand.margin_factor)
}
