use std::fmt;

/// Terminal state of a minimization run.
///
/// Callers must inspect the status before trusting the returned point:
/// only [`Status::Optimal`] certifies the gradient-norm test was met.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Status {
    /// The gradient norm at the returned point meets the requested accuracy.
    Optimal,
    /// The objective was detected to be unbounded below, either through the
    /// `m_inf` value threshold or through a non-positive-curvature direction
    /// on a quadratic.
    Unbounded,
    /// The iteration or evaluation budget ran out; the returned point is the
    /// best found so far, not necessarily optimal.
    Stopped,
    /// The line search collapsed below `min_a`: the direction was not a
    /// descent direction, or the objective is not differentiable there.
    Error,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Status::Optimal => "optimal",
            Status::Unbounded => "unbounded",
            Status::Stopped => "stopped",
            Status::Error => "error",
        };
        f.write_str(s)
    }
}

/// Outcome of a [`minimize`](crate::steepest::SteepestDescent::minimize) run.
#[derive(Clone, Debug)]
pub struct Minimum {
    /// Final iterate.
    pub x: Vec<f64>,
    /// Objective value at `x`.
    pub fx: f64,
    pub status: Status,
    /// Outer iterations (updates, for the stochastic family).
    pub iterations: usize,
    /// Objective evaluations consumed, line searches included.
    pub f_evals: usize,
}

/// Invalid hyperparameter or shape, reported at construction and never
/// during iteration.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    OutOfRange {
        name: &'static str,
        value: f64,
        expected: &'static str,
    },
    DimensionMismatch {
        expected: usize,
        found: usize,
    },
    HessianShape {
        dim: usize,
        len: usize,
    },
    HessianAsymmetric {
        row: usize,
        col: usize,
    },
    MissingHessian,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::OutOfRange { name, value, expected } => {
                write!(f, "{name} = {value} out of range (expected {expected})")
            }
            ConfigError::DimensionMismatch { expected, found } => {
                write!(f, "starting point has length {found}, objective has dimension {expected}")
            }
            ConfigError::HessianShape { dim, len } => {
                write!(f, "hessian has {len} entries, expected {dim}x{dim}")
            }
            ConfigError::HessianAsymmetric { row, col } => {
                write!(f, "hessian is not symmetric at ({row}, {col})")
            }
            ConfigError::MissingHessian => {
                write!(f, "objective does not expose a constant hessian")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

pub(crate) fn check_range(
    name: &'static str,
    value: f64,
    ok: bool,
    expected: &'static str,
) -> Result<(), ConfigError> {
    if ok {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { name, value, expected })
    }
}

/// Gradient-norm stopping rule shared by every algorithm.
///
/// A negative `eps` switches to the relative criterion
/// `||g|| <= -eps * ||g0||`, scaled by the first gradient seen.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, Debug)]
pub struct StopRule {
    pub eps: f64,
    pub max_iter: usize,
}

impl Default for StopRule {
    fn default() -> Self {
        Self { eps: 1e-6, max_iter: 1000 }
    }
}

impl StopRule {
    /// Threshold the gradient norm is compared against, given the norm of
    /// the first gradient.
    pub(crate) fn threshold(&self, ng0: f64) -> f64 {
        if self.eps < 0.0 {
            -self.eps * ng0
        } else {
            self.eps
        }
    }
}

/// Constants of the Armijo-Wolfe / backtracking line search.
///
/// `m2` outside `(0, 1)` selects plain backtracking; otherwise the search
/// enforces the strong Wolfe curvature condition on top of Armijo
/// sufficient decrease.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, Debug)]
pub struct LineSearchParams {
    /// Sufficient-decrease constant, in (0, 1).
    pub m1: f64,
    /// Curvature constant; outside (0, 1) means backtracking.
    pub m2: f64,
    /// First trial step, > 0.
    pub a_start: f64,
    /// Step scaling factor, in (0, 1). Extrapolation divides by it,
    /// backtracking multiplies by it.
    pub tau: f64,
    /// Safeguard factor keeping interpolated steps away from the bracket
    /// endpoints, in (0, 1).
    pub sfgrd: f64,
    /// Values at or below this are taken as proof of unboundedness.
    pub m_inf: f64,
    /// Steps at or below this signal a numerical failure.
    pub min_a: f64,
    /// Global objective-evaluation budget, shared with the outer loop.
    pub max_f_eval: usize,
}

impl Default for LineSearchParams {
    fn default() -> Self {
        Self {
            m1: 0.01,
            m2: 0.9,
            a_start: 1.0,
            tau: 0.9,
            sfgrd: 0.01,
            m_inf: f64::NEG_INFINITY,
            min_a: 1e-16,
            max_f_eval: 1000,
        }
    }
}

impl LineSearchParams {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        check_range("m1", self.m1, self.m1 > 0.0 && self.m1 < 1.0, "(0, 1)")?;
        check_range("a_start", self.a_start, self.a_start > 0.0, "> 0")?;
        check_range("tau", self.tau, self.tau > 0.0 && self.tau < 1.0, "(0, 1)")?;
        check_range("sfgrd", self.sfgrd, self.sfgrd > 0.0 && self.sfgrd < 1.0, "(0, 1)")?;
        check_range("min_a", self.min_a, self.min_a >= 0.0, ">= 0")?;
        Ok(())
    }

    pub(crate) fn armijo_wolfe(&self) -> bool {
        self.m2 > 0.0 && self.m2 < 1.0
    }
}

/// How the previous step is folded into the next one in the stochastic
/// family.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Momentum {
    #[default]
    None,
    /// Add `momentum * step_{t-1}` to the update.
    Standard,
    /// Shift the point by `momentum * step_{t-1}` first, then compute the
    /// gradient at the shifted point.
    Nesterov,
}

/// Which beta formula couples the previous search direction into the next
/// nonlinear-CG direction.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum BetaFormula {
    /// Polak-Ribiere clamped into `[-beta_FR, beta_FR]`.
    #[default]
    HybridFrPr,
    FletcherReeves,
    /// Clipped at zero.
    PolakRibiere,
    HestenesStiefel,
    DaiYuan,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_rule_threshold_sign_convention() {
        let absolute = StopRule { eps: 1e-6, max_iter: 100 };
        assert_eq!(absolute.threshold(10.0), 1e-6);

        let relative = StopRule { eps: -1e-4, max_iter: 100 };
        assert_eq!(relative.threshold(10.0), 1e-3);
    }

    #[test]
    fn m2_outside_unit_interval_means_backtracking() {
        let mut p = LineSearchParams::default();
        assert!(p.armijo_wolfe());
        p.m2 = 0.0;
        assert!(!p.armijo_wolfe());
        p.m2 = 1.5;
        assert!(!p.armijo_wolfe());
    }

    #[test]
    fn line_search_params_validated() {
        let mut p = LineSearchParams { m1: 1.0, ..Default::default() };
        assert!(matches!(p.validate(), Err(ConfigError::OutOfRange { name: "m1", .. })));
        p.m1 = 0.01;
        p.tau = 1.0;
        assert!(matches!(p.validate(), Err(ConfigError::OutOfRange { name: "tau", .. })));
    }

    #[test]
    fn status_displays_as_lowercase() {
        assert_eq!(Status::Optimal.to_string(), "optimal");
        assert_eq!(Status::Error.to_string(), "error");
    }
}
