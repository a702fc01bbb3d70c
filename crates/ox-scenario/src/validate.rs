//! Scenario validation logic.
//!
//! Every violated invariant is collected — no coercion, no clamping, and
//! no short-circuit on the first failure, so a bad scenario file reports
//! everything wrong with it at once.

use crate::schema::{
    Co2StageInputs, Co2TransferSpec, GasLiquidCoupling, SimulationInputs, TransferSpec,
};
use ox_exchange::{Permeability, PressureMode};

/// One violated invariant, identified by the offending field.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub field: String,
    pub reason: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

pub(crate) fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(Violation::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Closure tolerance for the gas mole fractions.
const FRACTION_SUM_TOL: f64 = 1e-9;

/// Validate a scenario; returns every violated invariant.
pub fn validate(inputs: &SimulationInputs) -> Result<(), crate::ScenarioError> {
    let mut violations: Vec<Violation> = Vec::new();
    let mut check = |ok: bool, field: &str, reason: &str| {
        if !ok {
            violations.push(Violation {
                field: field.to_string(),
                reason: reason.to_string(),
            });
        }
    };

    check(
        (0.0..=1.0).contains(&inputs.y_o2),
        "y_o2",
        "must be between 0 and 1",
    );
    check(
        (0.0..=1.0).contains(&inputs.y_n2),
        "y_n2",
        "must be between 0 and 1",
    );
    check(
        ((inputs.y_o2 + inputs.y_n2) - 1.0).abs() <= FRACTION_SUM_TOL,
        "y_o2 + y_n2",
        "must equal 1 within tolerance 1e-9",
    );

    check(inputs.p_atm_kpa > 0.0, "p_atm_kpa", "must be > 0");
    if let PressureMode::Manual { p_total_kpa } = inputs.pressure_mode {
        check(p_total_kpa > 0.0, "pressure_mode.p_total_kpa", "must be > 0");
    }
    check(
        inputs.temperature_c > -273.15,
        "temperature_c",
        "must be above absolute zero",
    );

    check(inputs.volume_l > 0.0, "volume_l", "must be > 0");
    check(inputs.flow_ml_min > 0.0, "flow_ml_min", "must be > 0");
    check(
        inputs.geometry.tube_id_mm > 0.0,
        "geometry.tube_id_mm",
        "must be > 0",
    );
    check(
        inputs.geometry.tube_od_mm > inputs.geometry.tube_id_mm,
        "geometry.tube_od_mm",
        "must be greater than tube_id_mm",
    );
    check(
        inputs.geometry.shell_id_mm > inputs.geometry.tube_od_mm,
        "geometry.shell_id_mm",
        "must be greater than tube_od_mm",
    );
    check(
        inputs.geometry.tube_length_cm > 0.0,
        "geometry.tube_length_cm",
        "must be > 0",
    );
    check(inputs.gas_flow_ml_min > 0.0, "gas_flow_ml_min", "must be > 0");

    if let Some(hold_up) = inputs.total_hold_up_volume_ml {
        check(
            hold_up > 0.0,
            "total_hold_up_volume_ml",
            "must be > 0 when provided",
        );
    }

    check(inputs.t_end_s > 0.0, "t_end_s", "must be > 0");
    check(inputs.dt_s > 0.0, "dt_s", "must be > 0");
    check(inputs.dt_s <= inputs.t_end_s, "dt_s", "must be <= t_end_s");

    check(
        inputs.c_o2_init_mmol_l >= 0.0,
        "c_o2_init_mmol_l",
        "must be >= 0",
    );
    check(
        inputs.c_n2_init_mmol_l >= 0.0,
        "c_n2_init_mmol_l",
        "must be >= 0",
    );

    match &inputs.transfer {
        TransferSpec::KLa {
            kla_o2_s_inv,
            kla_n2_s_inv,
        } => {
            check(*kla_o2_s_inv >= 0.0, "transfer.kla_o2_s_inv", "must be >= 0");
            check(*kla_n2_s_inv >= 0.0, "transfer.kla_n2_s_inv", "must be >= 0");
        }
        TransferSpec::Permeability {
            perm_o2,
            perm_n2,
            tube_od_override_mm,
        } => {
            check_permeability(&mut check, "transfer.perm_o2", perm_o2);
            check_permeability(&mut check, "transfer.perm_n2", perm_n2);
            if let Some(od_override) = tube_od_override_mm {
                check(
                    *od_override > inputs.geometry.tube_id_mm,
                    "transfer.tube_od_override_mm",
                    "must be greater than tube_id_mm in permeability mode",
                );
            }
        }
    }

    if let GasLiquidCoupling::Segmented { n_segments } = inputs.coupling {
        check(
            n_segments >= 2,
            "coupling.n_segments",
            "must be >= 2 in segmented mode",
        );
    }

    if let Some(co2) = &inputs.co2_stage {
        validate_co2_stage(&mut check, co2);
    }

    if let Some(demand) = &inputs.demand {
        check(demand.total_cells >= 0.0, "demand.total_cells", "must be >= 0");
        check(
            demand.q_o2_cell_mol_s >= 0.0,
            "demand.q_o2_cell_mol_s",
            "must be >= 0",
        );
        check(
            demand.margin_factor >= 1.0,
            "demand.margin_factor",
            "must be >= 1",
        );
    }

    if let Some(target) = inputs.target_do_percent {
        check(target >= 0.0, "target_do_percent", "must be >= 0");
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(crate::ScenarioError::Invalid { violations })
    }
}

fn validate_co2_stage(check: &mut impl FnMut(bool, &str, &str), co2: &Co2StageInputs) {
    check(
        (0.0..=100.0).contains(&co2.conditioning_gas_co2_percent),
        "co2_stage.conditioning_gas_co2_percent",
        "must be between 0 and 100",
    );
    check(
        co2.conditioning_gas_flow_ml_min > 0.0,
        "co2_stage.conditioning_gas_flow_ml_min",
        "must be > 0",
    );
    check(
        co2.conditioning_tube_length_cm > 0.0,
        "co2_stage.conditioning_tube_length_cm",
        "must be > 0",
    );
    check(
        co2.c_co2_init_mmol_l >= 0.0,
        "co2_stage.c_co2_init_mmol_l",
        "must be >= 0",
    );
    check(co2.hco3_mmol_l > 0.0, "co2_stage.hco3_mmol_l", "must be > 0");

    match &co2.transfer {
        Co2TransferSpec::KLa { kla_co2_s_inv } => {
            check(
                *kla_co2_s_inv >= 0.0,
                "co2_stage.transfer.kla_co2_s_inv",
                "must be >= 0",
            );
        }
        Co2TransferSpec::Permeability { perm_co2 } => {
            check_permeability(check, "co2_stage.transfer.perm_co2", perm_co2);
        }
    }
}

fn check_permeability(
    check: &mut impl FnMut(bool, &str, &str),
    field: &str,
    perm: &Permeability,
) {
    check(perm.raw_value() >= 0.0, field, "must be >= 0");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScenarioError;
    use crate::schema::*;
    use ox_exchange::{Permeability, PressureMode, StageOrder, TubeGeometry};

    fn baseline() -> SimulationInputs {
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

    fn violations(result: Result<(), ScenarioError>) -> Vec<Violation> {
        match result {
            Err(ScenarioError::Invalid { violations }) => violations,
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn baseline_is_valid() {
        assert!(validate(&baseline()).is_ok());
    }

    #[test]
    fn unclosed_fractions_are_rejected() {
        let mut inputs = baseline();
        inputs.y_o2 = 0.20;
        let found = violations(validate(&inputs));
        assert!(found.iter().any(|v| v.field == "y_o2 + y_n2"));
    }

    #[test]
    fn all_violations_are_reported_at_once() {
        let mut inputs = baseline();
        inputs.flow_ml_min = 0.0;
        inputs.volume_l = -1.0;
        inputs.dt_s = 3600.0; // > t_end_s
        let found = violations(validate(&inputs));
        assert!(found.len() >= 3);
        assert!(found.iter().any(|v| v.field == "flow_ml_min"));
        assert!(found.iter().any(|v| v.field == "volume_l"));
        assert!(found.iter().any(|v| v.field == "dt_s"));
    }

    #[test]
    fn geometry_ordering_enforced() {
        let mut inputs = baseline();
        inputs.geometry.tube_od_mm = 3.0; // below ID
        inputs.geometry.shell_id_mm = 2.0; // below OD
        let found = violations(validate(&inputs));
        assert!(found.iter().any(|v| v.field == "geometry.tube_od_mm"));
        assert!(found.iter().any(|v| v.field == "geometry.shell_id_mm"));
    }

    #[test]
    fn negative_kla_rejected() {
        let mut inputs = baseline();
        inputs.transfer = TransferSpec::KLa {
            kla_o2_s_inv: -0.01,
            kla_n2_s_inv: 0.008,
        };
        let found = violations(validate(&inputs));
        assert!(found.iter().any(|v| v.field == "transfer.kla_o2_s_inv"));
    }

    #[test]
    fn permeability_mode_checks_override_and_signs() {
        let mut inputs = baseline();
        inputs.transfer = TransferSpec::Permeability {
            perm_o2: Permeability::Barrer(-1.0),
            perm_n2: Permeability::Barrer(300.0),
            tube_od_override_mm: Some(2.0),
        };
        let found = violations(validate(&inputs));
        assert!(found.iter().any(|v| v.field == "transfer.perm_o2"));
        assert!(
            found
                .iter()
                .any(|v| v.field == "transfer.tube_od_override_mm")
        );
    }

    #[test]
    fn segmented_needs_at_least_two_sections() {
        let mut inputs = baseline();
        inputs.coupling = GasLiquidCoupling::Segmented { n_segments: 1 };
        let found = violations(validate(&inputs));
        assert!(found.iter().any(|v| v.field == "coupling.n_segments"));
    }

    #[test]
    fn manual_pressure_must_be_positive() {
        let mut inputs = baseline();
        inputs.pressure_mode = PressureMode::Manual { p_total_kpa: 0.0 };
        let found = violations(validate(&inputs));
        assert!(
            found
                .iter()
                .any(|v| v.field == "pressure_mode.p_total_kpa")
        );
    }

    #[test]
    fn co2_stage_fields_validated_when_enabled() {
        let mut inputs = baseline();
        inputs.co2_stage = Some(Co2StageInputs {
            stage_order: StageOrder::ConditioningFirst,
            conditioning_tube_length_cm: 0.0,
            conditioning_gas_co2_percent: 120.0,
            conditioning_gas_flow_ml_min: 20.0,
            transfer: Co2TransferSpec::KLa {
                kla_co2_s_inv: 0.05,
            },
            c_co2_init_mmol_l: 1.2,
            hco3_mmol_l: 0.0,
            pka_app: 6.1,
        });
        let found = violations(validate(&inputs));
        assert!(
            found
                .iter()
                .any(|v| v.field == "co2_stage.conditioning_tube_length_cm")
        );
        assert!(
            found
                .iter()
                .any(|v| v.field == "co2_stage.conditioning_gas_co2_percent")
        );
        assert!(found.iter().any(|v| v.field == "co2_stage.hco3_mmol_l"));
    }

    #[test]
    fn demand_margin_below_one_rejected() {
        let mut inputs = baseline();
        inputs.demand = Some(CellDemandInputs {
            total_cells: 2.7e9,
            q_o2_cell_mol_s: 5.0e-17,
            margin_factor: 0.5,
        });
        let found = violations(validate(&inputs));
        assert!(found.iter().any(|v| v.field == "demand.margin_factor"));
    }

    #[test]
    fn hold_up_volume_must_be_positive_when_given() {
        let mut inputs = baseline();
        inputs.total_hold_up_volume_ml = Some(0.0);
        let found = violations(validate(&inputs));
        assert!(
            found
                .iter()
                .any(|v| v.field == "total_hold_up_volume_ml")
        );
    }
}
