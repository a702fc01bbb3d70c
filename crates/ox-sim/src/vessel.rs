//! Transport delay and the well-mixed source vessel.
//!
//! The loop returns exchanger outlet fluid to the vessel after the hold-up
//! volume has flushed through; the vessel itself is treated as perfectly
//! mixed and integrated with explicit first-order (Euler) steps at the
//! run's fixed dt. No adaptive step control.

use ox_results::TargetOutcome;

/// Fixed-length delay line carrying the outlet history back to the vessel.
///
/// Seeded with the initial concentration so the vessel sees its own state
/// until the loop hold-up has turned over once.
#[derive(Debug, Clone)]
pub struct DelayLine {
    buf: std::collections::VecDeque<f64>,
}

impl DelayLine {
    /// A line of `delay_steps` steps, pre-filled with `initial`.
    pub fn new(delay_steps: usize, initial: f64) -> Self {
        Self {
            buf: std::collections::VecDeque::from(vec![initial; delay_steps + 1]),
        }
    }

    /// Push the newest outlet value and pop the value that has finished
    /// traversing the hold-up.
    pub fn advance(&mut self, newest: f64) -> f64 {
        let delayed = self.buf.pop_front().expect("delay line is never empty");
        self.buf.push_back(newest);
        delayed
    }
}

/// Number of whole steps in the transport delay.
pub fn delay_steps(transport_delay_s: f64, dt_s: f64) -> usize {
    (transport_delay_s / dt_s.max(1e-12)).round().max(0.0) as usize
}

/// One explicit Euler step of the perfect-mixing vessel ODE:
/// `dC/dt = (Q/V) × (C_return − C)`.
///
/// Flow is per minute, dt in seconds; the rate is converted accordingly.
pub fn vessel_step(
    c_vessel_mmol_l: f64,
    c_return_mmol_l: f64,
    liquid_flow_l_min: f64,
    vessel_volume_l: f64,
    dt_s: f64,
) -> f64 {
    let dc_dt_per_min = (liquid_flow_l_min / vessel_volume_l) * (c_return_mmol_l - c_vessel_mmol_l);
    c_vessel_mmol_l + dc_dt_per_min * (dt_s / 60.0)
}

/// Find when a trace first crosses `target`, interpolating linearly
/// between the bracketing samples for sub-step precision.
pub fn time_to_target(time_s: &[f64], trace: &[f64], target: f64) -> TargetOutcome {
    debug_assert_eq!(time_s.len(), trace.len());
    if trace.is_empty() {
        return TargetOutcome::NotReached;
    }

    let c0 = trace[0];
    if (c0 - target).abs() <= 1e-9 {
        return TargetOutcome::AlreadyAt;
    }
    let reaching_up = target > c0;

    for i in 1..trace.len() {
        let crossed = if reaching_up {
            trace[i] >= target
        } else {
            trace[i] <= target
        };
        if crossed {
            let (c_prev, c_here) = (trace[i - 1], trace[i]);
            let span = c_here - c_prev;
            // A flat bracketing segment can only happen if the previous
            // sample already sat on the target
            let frac = if span.abs() < 1e-300 {
                0.0
            } else {
                ((target - c_prev) / span).clamp(0.0, 1.0)
            };
            let t_s = time_s[i - 1] + frac * (time_s[i] - time_s[i - 1]);
            return TargetOutcome::Reached { t_s };
        }
    }

    TargetOutcome::NotReached
}
