//! Segmented counter-current gas-depletion solver.
//!
//! The tube is split into N equal axial segments. Gas runs counter-current
//! to the liquid: the gas inlet sits at the liquid-outlet boundary
//! (interface index N) and depleted gas leaves at the liquid-inlet end
//! (interface index 0). Each segment sees the local gas composition, so a
//! slow sweep gas is stripped of O2 along the tube and the liquid outlet
//! lands at or below the lumped prediction.
//!
//! Because each segment's gas state depends on transfer happening
//! downstream of it, the axial march is iterated to a fixed point: march
//! the liquid forward against the previous pass's gas interfaces, then
//! rebuild the interfaces backward from the gas inlet, until the
//! interfaces stop moving.

use crate::supply::gas_supply_rate_mmol_min;
use ox_fluids::{GasComposition, SolubilityModel, Species};

const MAX_RELAXATION_PASSES: usize = 50;
const INTERFACE_TOL_MMOL_MIN: f64 = 1e-9;

/// Inputs for one segmented solve.
pub struct SegmentedParams<'a> {
    pub solubility: &'a dyn SolubilityModel,
    /// Gas composition at the gas inlet.
    pub y_o2_inlet: f64,
    pub y_n2_inlet: f64,
    pub gas_flow_ml_min: f64,
    pub p_total_kpa: f64,
    pub temperature_c: f64,
    pub flow_ml_min: f64,
    pub n_segments: usize,
    pub kla_o2_s_inv: f64,
    pub kla_n2_s_inv: f64,
    /// Total liquid residence time over the whole tube [s].
    pub residence_time_s: f64,
}

/// Result of one segmented solve.
#[derive(Debug, Clone)]
pub struct SegmentedOutcome {
    pub c_o2_out_mmol_l: f64,
    pub c_n2_out_mmol_l: f64,
    /// Composition of the depleted gas leaving the shell.
    pub gas_out: GasComposition,
    /// Liquid O2 along the tube, one value per segment boundary (N+1).
    pub liq_profile_o2_mmol_l: Vec<f64>,
    /// Local gas O2 fraction per segment (N).
    pub gas_profile_y_o2: Vec<f64>,
    /// True if any segment hit its local gas-supply cap.
    pub o2_transfer_limited: bool,
}

/// Per-segment accumulator for one axial march. Owned by a single solver
/// invocation and discarded once the outlet is produced.
#[derive(Debug, Clone, Copy)]
struct SegmentState {
    index: usize,
    /// Moles moved gas→liquid in this segment [mmol/min]; negative when
    /// the liquid strips back into the gas.
    transferred_o2_mmol_min: f64,
    transferred_n2_mmol_min: f64,
}

/// Gas-phase molar flows at the segment boundaries, indexed 0..=N with the
/// gas inlet at index N (counter-current).
struct GasInterfaces {
    o2_mmol_min: Vec<f64>,
    n2_mmol_min: Vec<f64>,
}

impl GasInterfaces {
    fn seeded(n_segments: usize, o2_inlet: f64, n2_inlet: f64) -> Self {
        Self {
            o2_mmol_min: vec![o2_inlet; n_segments + 1],
            n2_mmol_min: vec![n2_inlet; n_segments + 1],
        }
    }

    fn max_delta(&self, other: &GasInterfaces) -> f64 {
        let o2 = self
            .o2_mmol_min
            .iter()
            .zip(&other.o2_mmol_min)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max);
        let n2 = self
            .n2_mmol_min
            .iter()
            .zip(&other.n2_mmol_min)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max);
        o2.max(n2)
    }
}

/// Solve the counter-current depletion model for one inlet state.
pub fn solve_segmented_outlet(
    params: &SegmentedParams<'_>,
    c_o2_in_mmol_l: f64,
    c_n2_in_mmol_l: f64,
) -> SegmentedOutcome {
    let n = params.n_segments;
    let total_gas_mmol_min =
        gas_supply_rate_mmol_min(params.gas_flow_ml_min, 1.0, params.p_total_kpa, params.temperature_c);
    let o2_inlet_mmol_min = total_gas_mmol_min * params.y_o2_inlet;
    let n2_inlet_mmol_min = total_gas_mmol_min * params.y_n2_inlet;

    let q_liq_l_min = params.flow_ml_min / 1000.0;
    let dt_seg_s = params.residence_time_s / n as f64;
    let approach_o2 = 1.0 - (-params.kla_o2_s_inv * dt_seg_s).exp();
    let approach_n2 = 1.0 - (-params.kla_n2_s_inv * dt_seg_s).exp();

    let sol_o2 = params
        .solubility
        .solubility_mmol_l_kpa(Species::O2, params.temperature_c);
    let sol_n2 = params
        .solubility
        .solubility_mmol_l_kpa(Species::N2, params.temperature_c);

    let mut interfaces = GasInterfaces::seeded(n, o2_inlet_mmol_min, n2_inlet_mmol_min);
    let mut c_liq_o2 = vec![0.0; n + 1];
    let mut c_liq_n2 = vec![0.0; n + 1];
    let mut limited_hit = false;

    for _pass in 0..MAX_RELAXATION_PASSES {
        c_liq_o2[0] = c_o2_in_mmol_l;
        c_liq_n2[0] = c_n2_in_mmol_l;
        let mut segments: Vec<SegmentState> = Vec::with_capacity(n);

        // Forward liquid march against the previous pass's gas interfaces.
        for seg in 0..n {
            let gas_o2_in = interfaces.o2_mmol_min[seg + 1];
            let gas_n2_in = interfaces.n2_mmol_min[seg + 1];
            let local = GasComposition::from_molar_flows(&[
                (Species::O2, gas_o2_in),
                (Species::N2, gas_n2_in),
            ]);
            let y_o2_local = local.mole_fraction(Species::O2);
            let y_n2_local = local.mole_fraction(Species::N2);

            let cstar_o2 = sol_o2 * y_o2_local * params.p_total_kpa;
            let cstar_n2 = sol_n2 * y_n2_local * params.p_total_kpa;

            let mut dc_o2 = (cstar_o2 - c_liq_o2[seg]) * approach_o2;
            let mut dc_n2 = (cstar_n2 - c_liq_n2[seg]) * approach_n2;
            let mut seg_tr_o2 = dc_o2 * q_liq_l_min;
            let mut seg_tr_n2 = dc_n2 * q_liq_l_min;

            // A segment cannot absorb more than the gas flowing past it.
            if seg_tr_o2 > gas_o2_in {
                limited_hit = true;
                seg_tr_o2 = gas_o2_in;
                dc_o2 = seg_tr_o2 / q_liq_l_min.max(1e-15);
            }
            if seg_tr_n2 > gas_n2_in {
                limited_hit = true;
                seg_tr_n2 = gas_n2_in;
                dc_n2 = seg_tr_n2 / q_liq_l_min.max(1e-15);
            }

            segments.push(SegmentState {
                index: seg,
                transferred_o2_mmol_min: seg_tr_o2,
                transferred_n2_mmol_min: seg_tr_n2,
            });
            c_liq_o2[seg + 1] = c_liq_o2[seg] + dc_o2;
            c_liq_n2[seg + 1] = c_liq_n2[seg] + dc_n2;
        }

        // Backward gas update from the gas inlet, conserving each species'
        // molar flow minus what the liquid took.
        let mut next = GasInterfaces::seeded(n, o2_inlet_mmol_min, n2_inlet_mmol_min);
        for state in segments.iter().rev() {
            let seg = state.index;
            next.o2_mmol_min[seg] =
                (next.o2_mmol_min[seg + 1] - state.transferred_o2_mmol_min).max(0.0);
            next.n2_mmol_min[seg] =
                (next.n2_mmol_min[seg + 1] - state.transferred_n2_mmol_min).max(0.0);
        }

        let delta = next.max_delta(&interfaces);
        interfaces = next;
        if delta < INTERFACE_TOL_MMOL_MIN {
            break;
        }
    }

    let gas_out = GasComposition::from_molar_flows(&[
        (Species::O2, interfaces.o2_mmol_min[0]),
        (Species::N2, interfaces.n2_mmol_min[0]),
    ]);
    let gas_profile_y_o2 = (0..n)
        .map(|seg| {
            GasComposition::from_molar_flows(&[
                (Species::O2, interfaces.o2_mmol_min[seg + 1]),
                (Species::N2, interfaces.n2_mmol_min[seg + 1]),
            ])
            .mole_fraction(Species::O2)
        })
        .collect();

    SegmentedOutcome {
        c_o2_out_mmol_l: c_liq_o2[n],
        c_n2_out_mmol_l: c_liq_n2[n],
        gas_out,
        liq_profile_o2_mmol_l: c_liq_o2,
        gas_profile_y_o2,
        o2_transfer_limited: limited_hit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{residence_time_s, tube_volume_ml};
    use crate::outlet::single_pass_outlet_mmol_l;
    use ox_fluids::ConstantSolubility;

    fn base_params(solubility: &ConstantSolubility) -> SegmentedParams<'_> {
        SegmentedParams {
            solubility,
            y_o2_inlet: 0.21,
            y_n2_inlet: 0.79,
            gas_flow_ml_min: 100.0,
            p_total_kpa: 101.325,
            temperature_c: 25.0,
            flow_ml_min: 10.0,
            n_segments: 40,
            kla_o2_s_inv: 0.01,
            kla_n2_s_inv: 0.008,
            residence_time_s: residence_time_s(tube_volume_ml(3.2, 160.0), 10.0),
        }
    }

    #[test]
    fn ample_gas_matches_lumped_solution() {
        let solubility = ConstantSolubility::new();
        let mut params = base_params(&solubility);
        params.gas_flow_ml_min = 5000.0;

        let outcome = solve_segmented_outlet(&params, 0.0, 0.0);
        let cstar_o2 = 0.0128 * 0.21 * 101.325;
        let lumped =
            single_pass_outlet_mmol_l(0.0, cstar_o2, 0.01, params.residence_time_s);

        assert!(!outcome.o2_transfer_limited);
        assert!(
            (outcome.c_o2_out_mmol_l - lumped).abs() / lumped < 1e-3,
            "segmented {} vs lumped {}",
            outcome.c_o2_out_mmol_l,
            lumped
        );
    }

    #[test]
    fn scarce_gas_depletes_along_the_tube() {
        let solubility = ConstantSolubility::new();
        let mut params = base_params(&solubility);
        params.flow_ml_min = 20.0;
        params.kla_o2_s_inv = 5.0;
        params.kla_n2_s_inv = 0.008;
        params.gas_flow_ml_min = 2.0;
        params.residence_time_s = residence_time_s(tube_volume_ml(3.2, 160.0), 20.0);

        let outcome = solve_segmented_outlet(&params, 0.0, 0.0);
        let cstar_o2 = 0.0128 * 0.21 * 101.325;
        let lumped =
            single_pass_outlet_mmol_l(0.0, cstar_o2, 5.0, params.residence_time_s);

        assert!(outcome.c_o2_out_mmol_l <= lumped + 1e-3);
        // Gas leaving the shell lost O2 relative to the feed
        assert!(outcome.gas_out.mole_fraction(Species::O2) < 0.21);
    }

    #[test]
    fn profiles_have_expected_lengths() {
        let solubility = ConstantSolubility::new();
        let params = base_params(&solubility);
        let outcome = solve_segmented_outlet(&params, 0.0, 0.0);
        assert_eq!(outcome.liq_profile_o2_mmol_l.len(), params.n_segments + 1);
        assert_eq!(outcome.gas_profile_y_o2.len(), params.n_segments);
    }

    #[test]
    fn liquid_profile_monotone_when_absorbing() {
        let solubility = ConstantSolubility::new();
        let params = base_params(&solubility);
        let outcome = solve_segmented_outlet(&params, 0.0, 0.0);
        for pair in outcome.liq_profile_o2_mmol_l.windows(2) {
            assert!(pair[1] >= pair[0] - 1e-12);
        }
    }

    #[test]
    fn deterministic_across_invocations() {
        let solubility = ConstantSolubility::new();
        let params = base_params(&solubility);
        let a = solve_segmented_outlet(&params, 0.0, 0.0);
        let b = solve_segmented_outlet(&params, 0.0, 0.0);
        assert_eq!(a.c_o2_out_mmol_l, b.c_o2_out_mmol_l);
        assert_eq!(a.liq_profile_o2_mmol_l, b.liq_profile_o2_mmol_l);
    }

    #[test]
    fn pure_oxygen_feed_keeps_unit_fraction_everywhere() {
        let solubility = ConstantSolubility::new();
        let mut params = base_params(&solubility);
        params.y_o2_inlet = 1.0;
        params.y_n2_inlet = 0.0;
        let outcome = solve_segmented_outlet(&params, 0.0, 0.0);
        for y in &outcome.gas_profile_y_o2 {
            assert_eq!(*y, 1.0);
        }
    }
}
