//! One-dimensional step-length search along a descent direction.
//!
//! Two modes, selected by [`LineSearchParams::m2`]: the Armijo-Wolfe search
//! brackets a step satisfying both sufficient decrease and the strong
//! curvature condition, extrapolating by `1/tau` and then interpolating with
//! a safeguarded quadratic model; plain backtracking shrinks the step with a
//! safeguarded quadratic model of the values until Armijo holds.
//!
//! The search never decides termination on its own: a collapsed step
//! (`a <= min_a`), an exhausted evaluation budget or a value below `m_inf`
//! are all reported back through the result for the owning algorithm to map
//! onto a terminal status.

use crate::linalg::{axpy_into, dot};
use crate::objective::Objective;
use crate::options::LineSearchParams;

/// Accepted (or last attempted) step and the state evaluated there.
pub struct LineSearchResult {
    /// Step length along `d`. At or below `min_a` this signals failure.
    pub a: f64,
    /// `x + a * d`.
    pub x: Vec<f64>,
    /// Objective value at the returned point.
    pub fx: f64,
    /// Gradient at the returned point.
    pub g: Vec<f64>,
    /// Objective evaluations consumed by this search.
    pub evals: usize,
}

/// Current point and the 1-D restriction of the objective along `d`.
pub struct LineSearchInput<'a> {
    pub x: &'a [f64],
    pub d: &'a [f64],
    /// `f(x)`, carried over from the caller to avoid a re-evaluation.
    pub fx: f64,
    /// Directional derivative `phi'(0) = g^T d`; must be negative.
    pub dphi0: f64,
}

/// Search for a step along `input.d`, charging evaluations to the shared
/// counter `f_eval` so the caller can enforce its global budget.
pub fn search<F: Objective + ?Sized>(
    f: &F,
    p: &LineSearchParams,
    input: LineSearchInput<'_>,
    f_eval: &mut usize,
) -> LineSearchResult {
    if input.dphi0 >= 0.0 {
        // not a descent direction; report a collapsed step so the caller
        // terminates with a numerical error
        return LineSearchResult {
            a: 0.0,
            x: input.x.to_vec(),
            fx: input.fx,
            g: vec![0.0; input.x.len()],
            evals: 0,
        };
    }

    if p.armijo_wolfe() {
        armijo_wolfe(f, p, input, f_eval)
    } else {
        backtracking(f, p, input, f_eval)
    }
}

fn armijo_wolfe<F: Objective + ?Sized>(
    f: &F,
    p: &LineSearchParams,
    input: LineSearchInput<'_>,
    f_eval: &mut usize,
) -> LineSearchResult {
    let (x, d, phi0, dphi0) = (input.x, input.d, input.fx, input.dphi0);
    let start = *f_eval;
    let mut xt = vec![0.0; x.len()];
    let mut gt = vec![0.0; x.len()];

    let armijo = |a: f64, phi_a: f64| phi_a <= phi0 + p.m1 * a * dphi0;
    let wolfe = |dphi_a: f64| dphi_a.abs() <= -p.m2 * dphi0;

    let mut a = p.a_start;
    let mut a_lo = 0.0;
    let mut dphi_lo = dphi0;
    let mut phi_a;
    let mut dphi_a;

    // extrapolation: grow the step while the slope stays negative
    loop {
        axpy_into(&mut xt, x, a, d);
        phi_a = f.value(&xt);
        f.gradient(&xt, &mut gt);
        *f_eval += 1;
        dphi_a = dot(&gt, d);

        if armijo(a, phi_a) && wolfe(dphi_a) {
            return LineSearchResult { a, x: xt, fx: phi_a, g: gt, evals: *f_eval - start };
        }
        if dphi_a >= 0.0 {
            break; // bracketed: phi' changes sign in [a_lo, a]
        }
        let next = a / p.tau;
        if *f_eval > p.max_f_eval || !next.is_finite() {
            return LineSearchResult { a, x: xt, fx: phi_a, g: gt, evals: *f_eval - start };
        }
        a_lo = a;
        dphi_lo = dphi_a;
        a = next;
    }

    // interpolation: quadratic model of phi via the secant of phi',
    // safeguarded into [a_lo*(1+sfgrd), a_hi*(1-sfgrd)]
    let mut a_hi = a;
    let mut dphi_hi = dphi_a;
    while *f_eval <= p.max_f_eval && a_hi - a_lo > p.min_a && dphi_hi > 1e-12 {
        let mut at = (a_lo * dphi_hi - a_hi * dphi_lo) / (dphi_hi - dphi_lo);
        at = at.max(a_lo * (1.0 + p.sfgrd)).min(a_hi * (1.0 - p.sfgrd));
        if !at.is_finite() {
            break;
        }
        a = at;

        axpy_into(&mut xt, x, a, d);
        phi_a = f.value(&xt);
        f.gradient(&xt, &mut gt);
        *f_eval += 1;
        dphi_a = dot(&gt, d);

        if armijo(a, phi_a) && wolfe(dphi_a) {
            break;
        }
        if dphi_a < 0.0 {
            a_lo = a;
            dphi_lo = dphi_a;
        } else {
            a_hi = a;
            dphi_hi = dphi_a;
        }
    }

    LineSearchResult { a, x: xt, fx: phi_a, g: gt, evals: *f_eval - start }
}

fn backtracking<F: Objective + ?Sized>(
    f: &F,
    p: &LineSearchParams,
    input: LineSearchInput<'_>,
    f_eval: &mut usize,
) -> LineSearchResult {
    let (x, d, phi0, dphi0) = (input.x, input.d, input.fx, input.dphi0);
    let start = *f_eval;
    let mut xt = vec![0.0; x.len()];
    let mut gt = vec![0.0; x.len()];

    let mut a = p.a_start;
    let mut phi_a;
    loop {
        axpy_into(&mut xt, x, a, d);
        phi_a = f.value(&xt);
        *f_eval += 1;

        if phi_a <= phi0 + p.m1 * a * dphi0 {
            break;
        }
        if *f_eval > p.max_f_eval || a <= p.min_a {
            break; // caller maps the collapsed step or blown budget
        }

        // quadratic model of phi through (phi0, dphi0, phi_a), safeguarded
        // into [a*tau^2, a*tau]; the denominator is positive whenever the
        // Armijo test just failed
        let denom = 2.0 * (phi_a - phi0 - dphi0 * a);
        a = if denom > 0.0 {
            (-dphi0 * a * a / denom).clamp(a * p.tau * p.tau, a * p.tau)
        } else {
            a * p.tau
        };
    }

    f.gradient(&xt, &mut gt);
    LineSearchResult { a, x: xt, fx: phi_a, g: gt, evals: *f_eval - start }
}
