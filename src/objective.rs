//! The capability every algorithm minimizes against.

/// A differentiable scalar objective of a real vector.
///
/// Implementations must be deterministic given `x` and free of side
/// effects; the optimizers share a single `&self` across the whole run and
/// may re-evaluate any point.
pub trait Objective {
    /// Problem dimensionality `n`.
    fn dim(&self) -> usize;

    /// `f(x)`. `x` has length [`dim`](Objective::dim).
    fn value(&self, x: &[f64]) -> f64;

    /// Gradient of `f` at `x`, written into `g_out` (length `n`).
    fn gradient(&self, x: &[f64], g_out: &mut [f64]);

    /// Constant Hessian in row-major order, for quadratic objectives only.
    fn hessian(&self) -> Option<&[f64]> {
        None
    }

    /// Known minimizer and minimum, used only for diagnostics and tests,
    /// never for control flow.
    fn optimum(&self) -> Option<(&[f64], f64)> {
        None
    }

    /// Default starting point when the caller does not supply one.
    fn start(&self) -> Vec<f64> {
        vec![0.0; self.dim()]
    }
}

/// An objective that can be evaluated on an explicit subset of its training
/// samples, for the mini-batch stochastic family.
///
/// `batch` carries the sample indices of the current mini-batch, so
/// evaluation stays deterministic: no hidden iteration state lives on the
/// objective.
pub trait BatchObjective {
    fn dim(&self) -> usize;

    /// Total number of samples an epoch partitions.
    fn sample_count(&self) -> usize;

    fn batch_value(&self, x: &[f64], batch: &[usize]) -> f64;

    fn batch_gradient(&self, x: &[f64], g_out: &mut [f64], batch: &[usize]);

    fn start(&self) -> Vec<f64> {
        vec![0.0; self.dim()]
    }
}

/// Every deterministic objective is a one-sample batch objective, so the
/// stochastic optimizers run full-batch on it by construction.
impl<F: Objective + ?Sized> BatchObjective for F {
    fn dim(&self) -> usize {
        Objective::dim(self)
    }

    fn sample_count(&self) -> usize {
        1
    }

    fn batch_value(&self, x: &[f64], _batch: &[usize]) -> f64 {
        self.value(x)
    }

    fn batch_gradient(&self, x: &[f64], g_out: &mut [f64], _batch: &[usize]) {
        self.gradient(x, g_out);
    }

    fn start(&self) -> Vec<f64> {
        Objective::start(self)
    }
}

/// Resolve the starting point for a run: caller-supplied (dimension
/// checked) or the objective's default.
pub(crate) fn resolve_start(
    dim: usize,
    x0: Option<Vec<f64>>,
    fallback: impl FnOnce() -> Vec<f64>,
) -> Result<Vec<f64>, crate::options::ConfigError> {
    match x0 {
        Some(x) if x.len() == dim => Ok(x),
        Some(x) => Err(crate::options::ConfigError::DimensionMismatch {
            expected: dim,
            found: x.len(),
        }),
        None => Ok(fallback()),
    }
}
