//! Demand-driven perfusion recommendation.

use ox_fluids::ConstantSolubility;
use ox_scenario::{
    CellDemandInputs, GasLiquidCoupling, PressureMode, SimulationInputs, TransferSpec,
    TubeGeometry,
};
use ox_sim::{FlowSweep, SimError, SweepOutcome, recommend_perfusion};

fn sweep_inputs(q_o2_cell_mol_s: f64) -> SimulationInputs {
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
        demand: Some(CellDemandInputs {
            total_cells: 2.7e9,
            q_o2_cell_mol_s,
            margin_factor: 1.0,
        }),
        target_do_percent: None,
    }
}

#[test]
fn recommends_first_qualifying_flow_in_ascending_order() {
    let solubility = ConstantSolubility::new();
    let inputs = sweep_inputs(6.2e-18);
    let sweep = FlowSweep::new(2.0, 20.0, 10).unwrap();

    let outcome = recommend_perfusion(&inputs, &sweep, &solubility).unwrap();
    match &outcome {
        SweepOutcome::Recommended {
            flow_ml_min,
            o2_demand_mmol_min,
            points,
        } => {
            assert_eq!(*flow_ml_min, 6.0);
            assert_eq!(points.len(), 10);
            // Every point below the pick fails the demand, the pick meets it
            for point in points {
                if point.flow_ml_min < *flow_ml_min {
                    assert!(point.o2_net_added_mmol_min < *o2_demand_mmol_min);
                }
            }
            let picked = points
                .iter()
                .find(|p| p.flow_ml_min == *flow_ml_min)
                .unwrap();
            assert!(picked.o2_net_added_mmol_min >= *o2_demand_mmol_min);
        }
        other => panic!("expected Recommended, got {other:?}"),
    }
}

#[test]
fn points_come_back_in_ascending_flow_order() {
    let solubility = ConstantSolubility::new();
    let inputs = sweep_inputs(6.2e-18);
    let sweep = FlowSweep::new(2.0, 20.0, 10).unwrap();

    let outcome = recommend_perfusion(&inputs, &sweep, &solubility).unwrap();
    for pair in outcome.points().windows(2) {
        assert!(pair[1].flow_ml_min > pair[0].flow_ml_min);
    }
    // Net O2 addition grows with throughput for this scenario
    for pair in outcome.points().windows(2) {
        assert!(pair[1].o2_net_added_mmol_min > pair[0].o2_net_added_mmol_min);
    }
}

#[test]
fn unmeetable_demand_is_reported_not_extrapolated() {
    let solubility = ConstantSolubility::new();
    // Three orders of magnitude past what the exchanger can deliver
    let inputs = sweep_inputs(6.2e-15);
    let sweep = FlowSweep::new(2.0, 20.0, 10).unwrap();

    let outcome = recommend_perfusion(&inputs, &sweep, &solubility).unwrap();
    match outcome {
        SweepOutcome::DemandUnmet {
            o2_demand_mmol_min,
            points,
        } => {
            assert_eq!(points.len(), 10);
            assert!(
                points
                    .iter()
                    .all(|p| p.o2_net_added_mmol_min < o2_demand_mmol_min)
            );
        }
        other => panic!("expected DemandUnmet, got {other:?}"),
    }
}

#[test]
fn sweep_requires_demand_parameters() {
    let solubility = ConstantSolubility::new();
    let mut inputs = sweep_inputs(6.2e-18);
    inputs.demand = None;
    let sweep = FlowSweep::new(2.0, 20.0, 10).unwrap();

    let err = recommend_perfusion(&inputs, &sweep, &solubility).unwrap_err();
    assert!(matches!(err, SimError::InvalidArg { .. }));
}

#[test]
fn sweep_is_deterministic_despite_parallel_evaluation() {
    let solubility = ConstantSolubility::new();
    let inputs = sweep_inputs(6.2e-18);
    let sweep = FlowSweep::new(2.0, 20.0, 25).unwrap();

    let a = recommend_perfusion(&inputs, &sweep, &solubility).unwrap();
    let b = recommend_perfusion(&inputs, &sweep, &solubility).unwrap();
    assert_eq!(a, b);
}
