//! Internal Rate of Return (IRR) calculation
//!
//! Used to turn the projected cash-flow series (initial outlay, yearly cash
//! flows, sale proceeds) into a single annualized return.

use log::debug;
use serde::{Deserialize, Serialize};

/// Lower edge of the search bracket (-99%)
pub const IRR_LOWER_BOUND: f64 = -0.99;

/// Upper edge of the search bracket (1000%)
pub const IRR_UPPER_BOUND: f64 = 10.0;

/// Iteration cap for each solving method
pub const IRR_MAX_ITERATIONS: u32 = 1000;

/// Relative NPV tolerance, scaled by the size of the initial flow
const NPV_TOLERANCE: f64 = 1e-6;

/// Result of an IRR solve
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IrrOutcome {
    /// Rate (decimal, e.g. 0.08 for 8%) at which NPV is zero
    Solved(f64),
    /// No rate in the search bracket zeroes NPV (no sign change, or NPV
    /// keeps one sign across the bracket)
    Undefined,
    /// The iteration cap was hit before NPV met tolerance
    NotConverged,
}

impl IrrOutcome {
    pub fn rate(&self) -> Option<f64> {
        match self {
            IrrOutcome::Solved(rate) => Some(*rate),
            IrrOutcome::Undefined | IrrOutcome::NotConverged => None,
        }
    }

    pub fn status(&self) -> IrrStatus {
        match self {
            IrrOutcome::Solved(_) => IrrStatus::Solved,
            IrrOutcome::Undefined => IrrStatus::Undefined,
            IrrOutcome::NotConverged => IrrStatus::NotConverged,
        }
    }
}

/// Serializable tag for how the IRR solve ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IrrStatus {
    Solved,
    Undefined,
    NotConverged,
}

/// Solve for the per-period IRR of `cashflows` (index = period).
///
/// Newton-Raphson first; bisection over [-99%, 1000%] when Newton stalls,
/// leaves the bracket, or lands on a point that does not meet tolerance.
pub fn solve_irr(cashflows: &[f64]) -> IrrOutcome {
    if let Some(outcome) = degenerate_outcome(cashflows) {
        return outcome;
    }

    let tolerance = npv_tolerance(cashflows);
    let mut rate = 0.10; // Initial guess: 10%

    for _ in 0..IRR_MAX_ITERATIONS {
        let (npv, dnpv) = npv_and_derivative(cashflows, rate);

        if npv.abs() < tolerance {
            return IrrOutcome::Solved(rate);
        }

        if dnpv.abs() < 1e-20 {
            // Flat NPV curve, Newton cannot make progress
            break;
        }

        let new_rate = (rate - npv / dnpv).clamp(IRR_LOWER_BOUND, IRR_UPPER_BOUND);
        if (new_rate - rate).abs() < 1e-14 {
            break;
        }
        rate = new_rate;
    }

    debug!("Newton-Raphson did not settle, falling back to bisection");
    solve_irr_bisection(cashflows)
}

/// Derivative-free IRR solve by bisection over [-99%, 1000%]
pub fn solve_irr_bisection(cashflows: &[f64]) -> IrrOutcome {
    if let Some(outcome) = degenerate_outcome(cashflows) {
        return outcome;
    }

    let tolerance = npv_tolerance(cashflows);
    let mut low = IRR_LOWER_BOUND;
    let mut high = IRR_UPPER_BOUND;
    let mut npv_low = npv_at_rate(cashflows, low);
    let npv_high = npv_at_rate(cashflows, high);

    if npv_low.abs() < tolerance {
        return IrrOutcome::Solved(low);
    }
    if npv_high.abs() < tolerance {
        return IrrOutcome::Solved(high);
    }

    // Check that we have a root in this interval
    if npv_low.signum() == npv_high.signum() {
        return IrrOutcome::Undefined;
    }

    for _ in 0..IRR_MAX_ITERATIONS {
        let mid = (low + high) / 2.0;
        let npv_mid = npv_at_rate(cashflows, mid);

        if npv_mid.abs() < tolerance {
            return IrrOutcome::Solved(mid);
        }

        if (high - low) / 2.0 < f64::EPSILON {
            // Bracket has collapsed without NPV reaching tolerance
            break;
        }

        if npv_mid.signum() == npv_low.signum() {
            low = mid;
            npv_low = npv_mid;
        } else {
            high = mid;
        }
    }

    IrrOutcome::NotConverged
}

/// Net present value of `cashflows` at a per-period `rate`
pub fn npv_at_rate(cashflows: &[f64], rate: f64) -> f64 {
    cashflows
        .iter()
        .enumerate()
        .map(|(t, &cf)| cf / (1.0 + rate).powi(t as i32))
        .sum()
}

/// Calculate NPV and its derivative with respect to rate
fn npv_and_derivative(cashflows: &[f64], rate: f64) -> (f64, f64) {
    let mut npv = 0.0;
    let mut dnpv = 0.0;

    for (t, &cf) in cashflows.iter().enumerate() {
        let discount = (1.0 + rate).powi(t as i32);
        npv += cf / discount;
        if t > 0 {
            dnpv -= (t as f64) * cf / (discount * (1.0 + rate));
        }
    }

    (npv, dnpv)
}

/// Series that cannot have an IRR: too short, or no sign change
fn degenerate_outcome(cashflows: &[f64]) -> Option<IrrOutcome> {
    if cashflows.len() < 2 {
        return Some(IrrOutcome::Undefined);
    }

    let has_positive = cashflows.iter().any(|&cf| cf > 0.0);
    let has_negative = cashflows.iter().any(|&cf| cf < 0.0);
    if !has_positive || !has_negative {
        return Some(IrrOutcome::Undefined);
    }

    None
}

fn npv_tolerance(cashflows: &[f64]) -> f64 {
    NPV_TOLERANCE * cashflows[0].abs().max(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_simple_irr() {
        // Invest 1000, get 1100 back a year later
        let irr = solve_irr(&[-1000.0, 1100.0]).rate().unwrap();
        assert_abs_diff_eq!(irr, 0.10, epsilon = 1e-8);
    }

    #[test]
    fn test_matches_bisection_reference() {
        let cashflows = [-50_000.0, 4_000.0, 4_200.0, 4_400.0, 4_600.0, 64_000.0];
        let newton = solve_irr(&cashflows).rate().unwrap();
        let bisection = solve_irr_bisection(&cashflows).rate().unwrap();

        assert!(newton > 0.0 && newton.is_finite());
        assert_abs_diff_eq!(newton, bisection, epsilon = 1e-5);
        assert!(npv_at_rate(&cashflows, newton).abs() < 1e-6 * 50_000.0);
    }

    #[test]
    fn test_level_annuity() {
        // 10,000 loan repaid by 12 payments of 900: roughly 1.2% per period
        let mut cashflows = vec![10_000.0];
        cashflows.extend(vec![-900.0; 12]);

        let irr = solve_irr(&cashflows).rate().unwrap();
        assert!(npv_at_rate(&cashflows, irr).abs() < 1e-2);
        assert!(irr > 0.01 && irr < 0.015);
    }

    #[test]
    fn test_negative_irr() {
        // Get back less than invested
        let irr = solve_irr(&[-1000.0, 200.0, 200.0, 200.0]).rate().unwrap();
        assert!(irr < 0.0);
        assert!(irr > IRR_LOWER_BOUND);
    }

    #[test]
    fn test_no_sign_change_is_undefined() {
        assert_eq!(solve_irr(&[1000.0, 100.0, 100.0]), IrrOutcome::Undefined);
        assert_eq!(solve_irr(&[-1000.0, -100.0, -100.0]), IrrOutcome::Undefined);
        assert_eq!(solve_irr(&[0.0, 0.0]), IrrOutcome::Undefined);
        assert_eq!(solve_irr(&[-1000.0]), IrrOutcome::Undefined);
        assert_eq!(solve_irr(&[]), IrrOutcome::Undefined);
    }

    #[test]
    fn test_root_outside_bracket_is_undefined() {
        // Needs more than 1000% to break even: NPV stays positive at +1000%
        let outcome = solve_irr_bisection(&[-1.0, 100.0]);
        assert_eq!(outcome, IrrOutcome::Undefined);
        assert_eq!(outcome.rate(), None);
        assert_eq!(outcome.status(), IrrStatus::Undefined);
    }

    #[test]
    fn test_iteration_cap_is_not_converged() {
        // Huge offsetting middle flows: NPV swings past tolerance at every
        // representable rate near the root
        let outcome = solve_irr(&[-1.0, 1e17, -1e17, 1.0]);
        assert_eq!(outcome, IrrOutcome::NotConverged);
        assert_eq!(outcome.rate(), None);
        assert_eq!(outcome.status(), IrrStatus::NotConverged);
    }

    #[test]
    fn test_zero_initial_outlay_with_positive_flows() {
        assert_eq!(solve_irr(&[0.0, 500.0, 500.0]), IrrOutcome::Undefined);
    }
}
