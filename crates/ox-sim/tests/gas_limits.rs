//! Gas-supply limiting and segmented-vs-lumped ordering.

use ox_fluids::ConstantSolubility;
use ox_scenario::{
    GasLiquidCoupling, PressureMode, SimulationInputs, TransferSpec, TubeGeometry,
};
use ox_sim::simulate;

fn fast_transfer_inputs() -> SimulationInputs {
    SimulationInputs {
        y_o2: 0.21,
        y_n2: 0.79,
        pressure_mode: PressureMode::Manual { p_total_kpa: 101.325 },
        p_atm_kpa: 101.325,
        temperature_c: 25.0,
        volume_l: 1.0,
        flow_ml_min: 20.0,
        geometry: TubeGeometry {
            tube_id_mm: 3.2,
            tube_od_mm: 4.76,
            shell_id_mm: 5.0,
            tube_length_cm: 160.0,
        },
        gas_flow_ml_min: 500.0,
        transfer: TransferSpec::KLa {
            kla_o2_s_inv: 5.0,
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
fn scarce_gas_caps_outlet_below_ample_gas() {
    let solubility = ConstantSolubility::new();

    let high_supply = simulate(&fast_transfer_inputs(), &solubility).unwrap();

    let mut starved = fast_transfer_inputs();
    starved.gas_flow_ml_min = 0.1;
    let low_supply = simulate(&starved, &solubility).unwrap();

    assert!(
        low_supply.c_o2_out_mmol_l.last().unwrap() < high_supply.c_o2_out_mmol_l.last().unwrap()
    );
    assert!(low_supply.summary.o2_transfer_limited);
    assert!(!high_supply.summary.o2_transfer_limited);
}

#[test]
fn limiter_never_touches_nitrogen() {
    let solubility = ConstantSolubility::new();
    let mut starved = fast_transfer_inputs();
    starved.gas_flow_ml_min = 0.1;
    starved.transfer = TransferSpec::KLa {
        kla_o2_s_inv: 5.0,
        kla_n2_s_inv: 5.0,
    };
    let outputs = simulate(&starved, &solubility).unwrap();

    // N2 saturates to its equilibrium despite the starved O2 budget
    let final_n2 = *outputs.c_n2_out_mmol_l.last().unwrap();
    assert!((final_n2 - outputs.cstar_n2_mmol_l).abs() / outputs.cstar_n2_mmol_l < 0.05);
}

#[test]
fn segmented_outlet_never_exceeds_lumped_at_low_gas_flow() {
    let solubility = ConstantSolubility::new();
    let mut base = fast_transfer_inputs();
    base.gas_flow_ml_min = 2.0;

    let lumped = simulate(&base, &solubility).unwrap();

    let mut segmented_inputs = base.clone();
    segmented_inputs.coupling = GasLiquidCoupling::Segmented { n_segments: 80 };
    let segmented = simulate(&segmented_inputs, &solubility).unwrap();

    assert!(
        segmented.c_o2_out_mmol_l.last().unwrap()
            <= &(lumped.c_o2_out_mmol_l.last().unwrap() + 1e-3)
    );
    assert_eq!(segmented.summary.solver, "segmented_gas_liquid");

    // Depleted gas leaves the shell leaner than the feed
    assert!(segmented.summary.gas_out_y_o2.unwrap() < base.y_o2);
    assert_eq!(
        segmented.summary.liq_profile_o2_mmol_l.as_ref().unwrap().len(),
        81
    );
    assert_eq!(segmented.summary.gas_profile_y_o2.as_ref().unwrap().len(), 80);
}

#[test]
fn segmented_matches_lumped_under_ample_gas() {
    let solubility = ConstantSolubility::new();
    let mut base = fast_transfer_inputs();
    base.transfer = TransferSpec::KLa {
        kla_o2_s_inv: 0.01,
        kla_n2_s_inv: 0.008,
    };
    base.gas_flow_ml_min = 5000.0;

    let lumped = simulate(&base, &solubility).unwrap();

    let mut segmented_inputs = base.clone();
    segmented_inputs.coupling = GasLiquidCoupling::Segmented { n_segments: 40 };
    let segmented = simulate(&segmented_inputs, &solubility).unwrap();

    let lumped_final = *lumped.c_o2_out_mmol_l.last().unwrap();
    let segmented_final = *segmented.c_o2_out_mmol_l.last().unwrap();
    assert!(
        (lumped_final - segmented_final).abs() / lumped_final < 1e-3,
        "lumped {lumped_final} vs segmented {segmented_final}"
    );
}
