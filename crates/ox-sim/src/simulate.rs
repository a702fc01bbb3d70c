//! The composed pipeline: recirculating transient simulation.
//!
//! Each step solves the single-pass steady outlet from the current vessel
//! state, routes it through the loop's transport delay, and advances the
//! perfect-mixing vessel ODE one Euler step. The run is a pure function of
//! its inputs: repeated invocations produce element-wise identical arrays.

use crate::error::SimResult;
use crate::pipeline::{ResolvedRun, steady_outlet};
use crate::vessel::{DelayLine, delay_steps, time_to_target, vessel_step};
use ox_exchange::{bicarbonate_ph, residence_time_s, two_stage_co2_outlet};
use ox_fluids::{SolubilityModel, Species, reference_concentrations_mmol_l};
use ox_results::{
    Co2StageSummary, RunMetadata, RunSummary, SimulationOutputs, compute_run_id, now_rfc3339,
};
use ox_scenario::{SimulationInputs, StageOrder, validate};

/// Version tag hashed into run ids and echoed in metadata.
pub const SOLVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run the full pipeline for one scenario.
pub fn simulate(
    inputs: &SimulationInputs,
    solubility: &dyn SolubilityModel,
) -> SimResult<SimulationOutputs> {
    validate(inputs)?;
    let run = ResolvedRun::new(inputs, solubility)?;

    let n_steps = (inputs.t_end_s / inputs.dt_s).floor() as usize + 1;
    tracing::debug!(
        solver = run.solver_tag,
        model = run.model_tag,
        n_steps,
        "starting transient run"
    );

    let transport_volume_ml = inputs
        .total_hold_up_volume_ml
        .unwrap_or(run.tube_volume_ml);
    let transport_delay_s = residence_time_s(transport_volume_ml, inputs.flow_ml_min);
    let d_steps = delay_steps(transport_delay_s, inputs.dt_s);

    let mut time_s = Vec::with_capacity(n_steps);
    let mut c_o2_out = Vec::with_capacity(n_steps);
    let mut c_n2_out = Vec::with_capacity(n_steps);
    let mut c_o2_vessel_trace = Vec::with_capacity(n_steps);
    let mut c_n2_vessel_trace = Vec::with_capacity(n_steps);

    let co2_enabled = run.co2_params.is_some();
    let mut c_co2_vessel_trace = co2_enabled.then(|| Vec::with_capacity(n_steps));
    let mut ph_trace = co2_enabled.then(|| Vec::with_capacity(n_steps));

    let mut c_o2_vessel = inputs.c_o2_init_mmol_l;
    let mut c_n2_vessel = inputs.c_n2_init_mmol_l;
    let mut c_co2_vessel = inputs
        .co2_stage
        .as_ref()
        .map(|co2| co2.c_co2_init_mmol_l)
        .unwrap_or(0.0);

    let mut delay_o2 = DelayLine::new(d_steps, c_o2_vessel);
    let mut delay_n2 = DelayLine::new(d_steps, c_n2_vessel);
    let mut delay_co2 = DelayLine::new(d_steps, c_co2_vessel);

    // First single-pass solve from the initial state supplies the
    // summary diagnostics (limit flag, segmented profiles).
    let first_pass = steady_outlet(
        inputs,
        &run,
        solubility,
        inputs.c_o2_init_mmol_l,
        inputs.c_n2_init_mmol_l,
    );
    if first_pass.o2_transfer_limited {
        tracing::debug!(
            supply_mmol_min = run.o2_supply_rate_mmol_min,
            "O2 transfer is gas-supply limited"
        );
    }
    let co2_summary = run.co2_params.as_ref().zip(inputs.co2_stage.as_ref()).map(
        |(params, co2)| -> SimResult<Co2StageSummary> {
            let outcome = two_stage_co2_outlet(params, co2.c_co2_init_mmol_l);
            Ok(Co2StageSummary {
                stage_order: match co2.stage_order {
                    StageOrder::ConditioningFirst => "conditioning_first".to_string(),
                    StageOrder::StrippingFirst => "stripping_first".to_string(),
                },
                c_co2_in_mmol_l: co2.c_co2_init_mmol_l,
                c_after_conditioning_mmol_l: outcome.c_after_conditioning_mmol_l,
                c_after_stripping_mmol_l: outcome.c_after_stripping_mmol_l,
                c_co2_outlet_mmol_l: outcome.c_outlet_mmol_l,
                ph_outlet: bicarbonate_ph(co2.hco3_mmol_l, outcome.c_outlet_mmol_l, co2.pka_app)?,
                conditioning_limited: outcome.conditioning_limited,
            })
        },
    );
    let co2_summary = co2_summary.transpose()?;

    // Sample 0
    time_s.push(0.0);
    c_o2_out.push(inputs.c_o2_init_mmol_l);
    c_n2_out.push(inputs.c_n2_init_mmol_l);
    c_o2_vessel_trace.push(c_o2_vessel);
    c_n2_vessel_trace.push(c_n2_vessel);
    if let (Some(co2_trace), Some(ph), Some(co2)) = (
        c_co2_vessel_trace.as_mut(),
        ph_trace.as_mut(),
        inputs.co2_stage.as_ref(),
    ) {
        co2_trace.push(c_co2_vessel);
        ph.push(bicarbonate_ph(co2.hco3_mmol_l, c_co2_vessel, co2.pka_app)?);
    }

    for step in 1..n_steps {
        let t_s = step as f64 * inputs.dt_s;

        let outlet = steady_outlet(inputs, &run, solubility, c_o2_vessel, c_n2_vessel);

        let delayed_o2 = delay_o2.advance(outlet.c_o2_out_mmol_l);
        let delayed_n2 = delay_n2.advance(outlet.c_n2_out_mmol_l);
        c_o2_vessel = vessel_step(
            c_o2_vessel,
            delayed_o2,
            run.liquid_flow_l_min,
            inputs.volume_l,
            inputs.dt_s,
        );
        c_n2_vessel = vessel_step(
            c_n2_vessel,
            delayed_n2,
            run.liquid_flow_l_min,
            inputs.volume_l,
            inputs.dt_s,
        );

        if let (Some(params), Some(co2)) = (run.co2_params.as_ref(), inputs.co2_stage.as_ref()) {
            let co2_outcome = two_stage_co2_outlet(params, c_co2_vessel);
            let delayed_co2 = delay_co2.advance(co2_outcome.c_outlet_mmol_l);
            c_co2_vessel = vessel_step(
                c_co2_vessel,
                delayed_co2,
                run.liquid_flow_l_min,
                inputs.volume_l,
                inputs.dt_s,
            );
            if let (Some(co2_trace), Some(ph)) = (c_co2_vessel_trace.as_mut(), ph_trace.as_mut())
            {
                co2_trace.push(c_co2_vessel);
                ph.push(bicarbonate_ph(co2.hco3_mmol_l, c_co2_vessel, co2.pka_app)?);
            }
        }

        time_s.push(t_s);
        // Treated fluid only shows at the outlet once the tube has
        // flushed through
        if t_s < run.residence_time_s {
            c_o2_out.push(inputs.c_o2_init_mmol_l);
            c_n2_out.push(inputs.c_n2_init_mmol_l);
        } else {
            c_o2_out.push(outlet.c_o2_out_mmol_l);
            c_n2_out.push(outlet.c_n2_out_mmol_l);
        }
        c_o2_vessel_trace.push(c_o2_vessel);
        c_n2_vessel_trace.push(c_n2_vessel);
    }

    let target = inputs.target_do_percent.map(|target_do| {
        let (c_ref_o2, _) = reference_concentrations_mmol_l(solubility, inputs.temperature_c);
        let target_c = (target_do / 100.0) * c_ref_o2;
        time_to_target(&time_s, &c_o2_vessel_trace, target_c)
    });

    let summary = RunSummary {
        model: run.model_tag.to_string(),
        solver: run.solver_tag.to_string(),
        n_steps,
        dt_s: inputs.dt_s,
        t_end_s: inputs.t_end_s,
        tube_volume_ml: run.tube_volume_ml,
        annulus_volume_ml: run.annulus_volume_ml,
        residence_time_s: run.residence_time_s,
        gas_residence_time_s: run.gas_residence_time_s,
        transport_delay_s,
        p_total_kpa: run.pressure.p_total_kpa,
        delta_p_mbar: run.pressure.delta_p_mbar,
        effective_kla_o2_s_inv: run.coefficients.kla_o2_s_inv,
        effective_kla_n2_s_inv: run.coefficients.kla_n2_s_inv,
        effective_kla_co2_s_inv: run.coefficients.kla_co2_s_inv,
        o2_supply_rate_mmol_min: run.o2_supply_rate_mmol_min,
        o2_transfer_limited: first_pass.o2_transfer_limited,
        gas_out_y_o2: first_pass
            .segmented
            .as_ref()
            .map(|seg| seg.gas_out.mole_fraction(Species::O2)),
        gas_out_y_n2: first_pass
            .segmented
            .as_ref()
            .map(|seg| seg.gas_out.mole_fraction(Species::N2)),
        liq_profile_o2_mmol_l: first_pass
            .segmented
            .as_ref()
            .map(|seg| seg.liq_profile_o2_mmol_l.clone()),
        gas_profile_y_o2: first_pass
            .segmented
            .as_ref()
            .map(|seg| seg.gas_profile_y_o2.clone()),
        co2_stages: co2_summary,
        target,
    };

    let metadata = RunMetadata {
        run_id: compute_run_id(inputs, SOLVER_VERSION),
        timestamp: now_rfc3339(),
        solver_version: SOLVER_VERSION.to_string(),
        solubility_source: solubility.name().to_string(),
        inputs: inputs.clone(),
    };

    Ok(SimulationOutputs {
        time_s,
        c_o2_out_mmol_l: c_o2_out,
        c_n2_out_mmol_l: c_n2_out,
        c_o2_vessel_mmol_l: c_o2_vessel_trace,
        c_n2_vessel_mmol_l: c_n2_vessel_trace,
        c_co2_vessel_mmol_l: c_co2_vessel_trace,
        ph_vessel: ph_trace,
        cstar_o2_mmol_l: run.cstar_o2_mmol_l,
        cstar_n2_mmol_l: run.cstar_n2_mmol_l,
        summary,
        metadata,
    })
}
