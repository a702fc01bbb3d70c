//! Demand-driven perfusion recommendation sweep.
//!
//! Evaluates the full outlet pipeline across an ascending grid of liquid
//! flow setpoints and picks the first one whose net O2 addition meets the
//! cellular demand. Points are independent, so they are evaluated in
//! parallel; the selection scan runs over the grid in ascending-flow order
//! regardless.

use crate::error::{SimError, SimResult};
use crate::pipeline::{ResolvedRun, o2_demand_mmol_min, steady_outlet};
use ox_fluids::{SolubilityModel, do_percent_from_concentration, reference_concentrations_mmol_l};
use ox_scenario::{SimulationInputs, validate};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Ascending linear grid of flow setpoints [mL/min].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowSweep {
    pub flow_min_ml_min: f64,
    pub flow_max_ml_min: f64,
    pub n_points: usize,
}

impl FlowSweep {
    pub fn new(flow_min_ml_min: f64, flow_max_ml_min: f64, n_points: usize) -> SimResult<Self> {
        if !(flow_min_ml_min > 0.0) {
            return Err(SimError::InvalidArg {
                what: "flow_min_ml_min must be > 0",
            });
        }
        if flow_min_ml_min >= flow_max_ml_min {
            return Err(SimError::InvalidArg {
                what: "flow_min_ml_min must be smaller than flow_max_ml_min",
            });
        }
        if n_points < 2 {
            return Err(SimError::InvalidArg {
                what: "sweep must have at least 2 points",
            });
        }
        Ok(Self {
            flow_min_ml_min,
            flow_max_ml_min,
            n_points,
        })
    }

    /// Generate the grid, ascending, with an exact endpoint.
    pub fn generate_points(&self) -> Vec<f64> {
        let mut points = Vec::with_capacity(self.n_points);
        let delta =
            (self.flow_max_ml_min - self.flow_min_ml_min) / (self.n_points - 1) as f64;
        for i in 0..self.n_points {
            points.push(self.flow_min_ml_min + i as f64 * delta);
        }
        points[self.n_points - 1] = self.flow_max_ml_min;
        points
    }
}

/// One evaluated sweep point.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SweepPoint {
    pub flow_ml_min: f64,
    pub p_total_kpa: f64,
    pub delta_p_mbar: f64,
    pub c_o2_out_mmol_l: f64,
    pub do_o2_out_percent: f64,
    /// Net O2 carried away from the exchanger [mmol/min].
    pub o2_net_added_mmol_min: f64,
}

/// Result of the recommendation scan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status")]
pub enum SweepOutcome {
    /// First grid point, in ascending flow order, meeting the demand.
    Recommended {
        flow_ml_min: f64,
        o2_demand_mmol_min: f64,
        points: Vec<SweepPoint>,
    },
    /// No tested setpoint meets the demand; never extrapolated.
    DemandUnmet {
        o2_demand_mmol_min: f64,
        points: Vec<SweepPoint>,
    },
}

impl SweepOutcome {
    pub fn points(&self) -> &[SweepPoint] {
        match self {
            SweepOutcome::Recommended { points, .. } | SweepOutcome::DemandUnmet { points, .. } => {
                points
            }
        }
    }
}

/// Evaluate the sweep and recommend the lowest qualifying flow.
pub fn recommend_perfusion(
    inputs: &SimulationInputs,
    sweep: &FlowSweep,
    solubility: &dyn SolubilityModel,
) -> SimResult<SweepOutcome> {
    validate(inputs)?;
    let demand_mmol_min = o2_demand_mmol_min(inputs)?;
    let (c_ref_o2, _) = reference_concentrations_mmol_l(solubility, inputs.temperature_c);

    let flows = sweep.generate_points();
    tracing::debug!(
        n_points = flows.len(),
        demand_mmol_min,
        "evaluating perfusion sweep"
    );

    // Points are embarrassingly parallel; par_iter keeps the collected
    // order identical to the ascending input grid.
    let points: Vec<SweepPoint> = flows
        .par_iter()
        .map(|&flow_ml_min| -> SimResult<SweepPoint> {
            let mut point_inputs = inputs.clone();
            point_inputs.flow_ml_min = flow_ml_min;

            let run = ResolvedRun::new(&point_inputs, solubility)?;
            let outlet = steady_outlet(
                &point_inputs,
                &run,
                solubility,
                point_inputs.c_o2_init_mmol_l,
                point_inputs.c_n2_init_mmol_l,
            );

            let flow_l_min = flow_ml_min / 1000.0;
            let o2_net_added_mmol_min =
                (outlet.c_o2_out_mmol_l - point_inputs.c_o2_init_mmol_l) * flow_l_min;

            Ok(SweepPoint {
                flow_ml_min,
                p_total_kpa: run.pressure.p_total_kpa,
                delta_p_mbar: run.pressure.delta_p_mbar,
                c_o2_out_mmol_l: outlet.c_o2_out_mmol_l,
                do_o2_out_percent: do_percent_from_concentration(
                    outlet.c_o2_out_mmol_l,
                    c_ref_o2,
                ),
                o2_net_added_mmol_min,
            })
        })
        .collect::<SimResult<Vec<_>>>()?;

    // Ascending scan: first qualifying point wins
    let recommended = points
        .iter()
        .find(|p| p.o2_net_added_mmol_min >= demand_mmol_min);

    Ok(match recommended {
        Some(point) => SweepOutcome::Recommended {
            flow_ml_min: point.flow_ml_min,
            o2_demand_mmol_min: demand_mmol_min,
            points,
        },
        None => SweepOutcome::DemandUnmet {
            o2_demand_mmol_min: demand_mmol_min,
            points,
        },
    })
}
