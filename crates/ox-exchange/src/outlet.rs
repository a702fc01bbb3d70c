//! Lumped single-pass outlet solver.
//!
//! One control volume, closed-form exponential approach toward the
//! equilibrium concentration over the tube residence time.

/// Outlet concentration [mmol/L] after a single pass.
///
/// `C_out = C* + (C_in − C*) · exp(−k_eff · τ)`
///
/// Exact pass-through at k_eff = 0; saturates to C* as k_eff·τ grows; the
/// result always lies between C_in and C*.
pub fn single_pass_outlet_mmol_l(
    c_in_mmol_l: f64,
    cstar_mmol_l: f64,
    k_eff_s_inv: f64,
    residence_time_s: f64,
) -> f64 {
    cstar_mmol_l + (c_in_mmol_l - cstar_mmol_l) * (-k_eff_s_inv * residence_time_s).exp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn zero_rate_is_exact_pass_through() {
        let out = single_pass_outlet_mmol_l(0.7, 0.27, 0.0, 120.0);
        assert_eq!(out, 0.7);
    }

    #[test]
    fn large_rate_saturates_to_equilibrium() {
        let out = single_pass_outlet_mmol_l(0.0, 0.27, 50.0, 120.0);
        assert!((out - 0.27).abs() < 1e-12);
    }

    #[test]
    fn absorbing_pass_bounded_by_inlet_and_equilibrium() {
        let out = single_pass_outlet_mmol_l(0.0, 0.27, 0.01, 77.0);
        assert!(out > 0.0);
        assert!(out < 0.27);
    }

    #[test]
    fn stripping_pass_bounded_the_other_way() {
        let out = single_pass_outlet_mmol_l(0.9, 0.27, 0.01, 77.0);
        assert!(out < 0.9);
        assert!(out > 0.27);
    }

    #[test]
    fn longer_residence_moves_closer_to_equilibrium() {
        let short = single_pass_outlet_mmol_l(0.0, 0.27, 0.01, 30.0);
        let long = single_pass_outlet_mmol_l(0.0, 0.27, 0.01, 300.0);
        assert!(long > short);
        assert!(long < 0.27);
    }

    proptest! {
        #[test]
        fn outlet_always_between_inlet_and_equilibrium(
            c_in in 0.0_f64..5.0,
            cstar in 0.0_f64..5.0,
            k in 0.0_f64..10.0,
            tau in 0.0_f64..1e4,
        ) {
            let out = single_pass_outlet_mmol_l(c_in, cstar, k, tau);
            let lo = c_in.min(cstar) - 1e-12;
            let hi = c_in.max(cstar) + 1e-12;
            prop_assert!(out >= lo && out <= hi, "out = {out}, range [{lo}, {hi}]");
        }

        #[test]
        fn monotone_in_rate_constant(
            cstar in 0.1_f64..5.0,
            k_lo in 0.0_f64..1.0,
            dk in 1e-6_f64..1.0,
        ) {
            let tau = 100.0;
            let lo = single_pass_outlet_mmol_l(0.0, cstar, k_lo, tau);
            let hi = single_pass_outlet_mmol_l(0.0, cstar, k_lo + dk, tau);
            prop_assert!(hi >= lo);
        }
    }
}
