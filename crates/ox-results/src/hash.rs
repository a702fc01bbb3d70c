//! Content-based hashing for run IDs.

use ox_scenario::SimulationInputs;
use sha2::{Digest, Sha256};

pub fn compute_run_id(inputs: &SimulationInputs, solver_version: &str) -> String {
    let mut hasher = Sha256::new();

    let inputs_json = serde_json::to_string(inputs).unwrap_or_default();
    hasher.update(inputs_json.as_bytes());
    hasher.update(solver_version.as_bytes());

    let result = hasher.finalize();
    format!("{:x}", result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ox_scenario::{GasLiquidCoupling, PressureMode, TransferSpec, TubeGeometry};

    fn scenario() -> SimulationInputs {
        SimulationInputs {
            y_o2: 0.21,
            y_n2: 0.79,
            pressure_mode: PressureMode::Manual { p_total_kpa: 101.325 },
            p_atm_kpa: 101.325,
            temperature_c: 25.0,
            volume_l: 1.0,
            flow_ml_min: 10.0,
            geometry: TubeGeometry {
                tube_id_mm: 3.2,
                tube_od_mm: 4.76,
                shell_id_mm: 5.0,
                tube_length_cm: 160.0,
            },
            gas_flow_ml_min: 100.0,
            transfer: TransferSpec::KLa {
                kla_o2_s_inv: 0.01,
                kla_n2_s_inv: 0.008,
            },
            coupling: GasLiquidCoupling::Lumped,
            c_o2_init_mmol_l: 0.0,
            c_n2_init_mmol_l: 0.0,
            t_end_s: 1800.0,
            dt_s: 1.0,
            total_hold_up_volume_ml: None,
            co2_stage: None,
            demand: None,
            target_do_percent: None,
        }
    }

    #[test]
    fn hash_stability() {
        let inputs = scenario();
        let a = compute_run_id(&inputs, "v1");
        let b = compute_run_id(&inputs, "v1");
        assert_eq!(a, b);
    }

    #[test]
    fn hash_differs_for_different_inputs() {
        let a = compute_run_id(&scenario(), "v1");
        let mut other = scenario();
        other.flow_ml_min = 11.0;
        let b = compute_run_id(&other, "v1");
        assert_ne!(a, b);
    }

    #[test]
    fn hash_differs_for_solver_versions() {
        let inputs = scenario();
        assert_ne!(
            compute_run_id(&inputs, "v1"),
            compute_run_id(&inputs, "v2")
        );
    }
}
