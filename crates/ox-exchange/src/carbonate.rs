//! Two-stage CO2 handling and the bicarbonate pH estimate.
//!
//! The loop carries two physical sections that move CO2:
//! - the conditioning section, flushed with a CO2-rich gas, loads the
//!   liquid toward its CO2 equilibrium;
//! - the stripping section (the O2 exchanger), whose sweep gas carries no
//!   CO2, pulls dissolved CO2 back out (C* = 0).
//!
//! Both use the single-pass exponential approach with a shared effective
//! CO2 rate constant; plumbing order is selectable and the stages always
//! feed each other in the active order.

use crate::error::{ExchangeError, ExchangeResult};
use crate::outlet::single_pass_outlet_mmol_l;
use crate::supply::apply_supply_limit;

/// Which physical section the recirculating liquid meets first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StageOrder {
    /// Conditioning section upstream of the stripping section (default
    /// plumbing).
    ConditioningFirst,
    /// Reversed plumbing: stripping section sees the loop inlet.
    StrippingFirst,
}

/// Stage parameters resolved once per run.
#[derive(Debug, Clone, Copy)]
pub struct Co2StageParams {
    pub k_eff_co2_s_inv: f64,
    /// Residence time in the conditioning section [s].
    pub tau_conditioning_s: f64,
    /// Residence time in the stripping (O2) section [s].
    pub tau_stripping_s: f64,
    /// CO2 equilibrium concentration under the conditioning gas [mmol/L].
    pub cstar_conditioning_mmol_l: f64,
    /// CO2 molar delivery of the conditioning gas [mmol/min].
    pub conditioning_supply_mmol_min: f64,
    pub liquid_flow_l_min: f64,
    pub order: StageOrder,
}

/// Dissolved CO2 at each physical section plus the loop outlet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Co2StageOutcome {
    /// CO2 leaving the conditioning section [mmol/L].
    pub c_after_conditioning_mmol_l: f64,
    /// CO2 leaving the stripping section [mmol/L].
    pub c_after_stripping_mmol_l: f64,
    /// CO2 returned to the loop [mmol/L] (last section in active order).
    pub c_outlet_mmol_l: f64,
    /// True if the conditioning gas ran out of CO2 to give.
    pub conditioning_limited: bool,
}

/// Run both CO2 stages in the active order for one inlet state.
pub fn two_stage_co2_outlet(params: &Co2StageParams, c_in_mmol_l: f64) -> Co2StageOutcome {
    match params.order {
        StageOrder::ConditioningFirst => {
            let (after_conditioning, limited) = conditioning_stage(params, c_in_mmol_l);
            let after_stripping = stripping_stage(params, after_conditioning);
            Co2StageOutcome {
                c_after_conditioning_mmol_l: after_conditioning,
                c_after_stripping_mmol_l: after_stripping,
                c_outlet_mmol_l: after_stripping,
                conditioning_limited: limited,
            }
        }
        StageOrder::StrippingFirst => {
            let after_stripping = stripping_stage(params, c_in_mmol_l);
            let (after_conditioning, limited) = conditioning_stage(params, after_stripping);
            Co2StageOutcome {
                c_after_conditioning_mmol_l: after_conditioning,
                c_after_stripping_mmol_l: after_stripping,
                c_outlet_mmol_l: after_conditioning,
                conditioning_limited: limited,
            }
        }
    }
}

fn conditioning_stage(params: &Co2StageParams, c_in_mmol_l: f64) -> (f64, bool) {
    let solved = single_pass_outlet_mmol_l(
        c_in_mmol_l,
        params.cstar_conditioning_mmol_l,
        params.k_eff_co2_s_inv,
        params.tau_conditioning_s,
    );
    let capped = apply_supply_limit(
        c_in_mmol_l,
        solved,
        params.liquid_flow_l_min,
        params.conditioning_supply_mmol_min,
    );
    (capped.c_out_mmol_l, capped.limited)
}

fn stripping_stage(params: &Co2StageParams, c_in_mmol_l: f64) -> f64 {
    // Sweep gas in the O2 section carries no CO2
    single_pass_outlet_mmol_l(c_in_mmol_l, 0.0, params.k_eff_co2_s_inv, params.tau_stripping_s)
}

/// Henderson-Hasselbalch pH from the bicarbonate buffer pair.
///
/// `pH = pKa_app + log10([HCO3⁻]/[CO2])`, with dissolved CO2 floored at
/// 1e-12 mmol/L so a fully stripped liquid yields a large finite pH.
pub fn bicarbonate_ph(
    hco3_mmol_l: f64,
    c_co2_mmol_l: f64,
    pka_app: f64,
) -> ExchangeResult<f64> {
    if hco3_mmol_l <= 0.0 {
        return Err(ExchangeError::InvalidArg {
            what: "hco3_mmol_l must be > 0 for bicarbonate pH",
        });
    }
    let c_co2 = c_co2_mmol_l.max(1e-12);
    Ok(pka_app + (hco3_mmol_l / c_co2).log10())
}
