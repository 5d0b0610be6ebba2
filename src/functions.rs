//! Benchmark objectives with known minimizers.

use crate::linalg::{self, matvec};
use crate::objective::Objective;
use crate::options::{check_range, ConfigError};

/// `f(x) = 1/2 x^T Q x - q^T x` with `Q` symmetric.
///
/// The minimizer `Q^{-1} q` is computed once at construction (when `Q` is
/// nonsingular) and reported through [`Objective::optimum`] for
/// diagnostics.
#[derive(Clone, Debug)]
pub struct Quadratic {
    hessian: Vec<f64>,
    q: Vec<f64>,
    x_star: Option<Vec<f64>>,
    f_star: f64,
}

impl Quadratic {
    pub fn new(hessian: Vec<f64>, q: Vec<f64>) -> Result<Self, ConfigError> {
        let n = q.len();
        if hessian.len() != n * n {
            return Err(ConfigError::HessianShape { dim: n, len: hessian.len() });
        }
        for i in 0..n {
            for j in (i + 1)..n {
                if (hessian[i * n + j] - hessian[j * n + i]).abs() > 1e-12 {
                    return Err(ConfigError::HessianAsymmetric { row: i, col: j });
                }
            }
        }

        let x_star = linalg::solve(&hessian, &q);
        let mut out = Self { hessian, q, x_star: None, f_star: f64::NEG_INFINITY };
        if let Some(x) = x_star {
            out.f_star = out.value(&x);
            out.x_star = Some(x);
        }
        Ok(out)
    }

    /// Diagonal quadratic, `Q = diag(d)`, `q = 0`.
    pub fn diagonal(d: &[f64]) -> Self {
        let n = d.len();
        let mut hessian = vec![0.0; n * n];
        for (i, &di) in d.iter().enumerate() {
            hessian[i * n + i] = di;
        }
        // diagonal matrices are always symmetric and well shaped
        Self::new(hessian, vec![0.0; n]).unwrap_or_else(|_| unreachable!())
    }
}

impl Objective for Quadratic {
    fn dim(&self) -> usize {
        self.q.len()
    }

    fn value(&self, x: &[f64]) -> f64 {
        let mut hx = vec![0.0; x.len()];
        matvec(&mut hx, &self.hessian, x);
        0.5 * linalg::dot(x, &hx) - linalg::dot(&self.q, x)
    }

    fn gradient(&self, x: &[f64], g_out: &mut [f64]) {
        matvec(g_out, &self.hessian, x);
        for (g, &qi) in g_out.iter_mut().zip(self.q.iter()) {
            *g -= qi;
        }
    }

    fn hessian(&self) -> Option<&[f64]> {
        Some(&self.hessian)
    }

    fn optimum(&self) -> Option<(&[f64], f64)> {
        self.x_star.as_deref().map(|x| (x, self.f_star))
    }
}

/// Generalized Rosenbrock function, `sum_i 100 (x_{i+1} - x_i^2)^2 + (1 - x_i)^2`,
/// with minimizer `(1, ..., 1)` and minimum 0. The standard nonconvex
/// benchmark: a curved narrow valley that punishes short-sighted steps.
#[derive(Clone, Debug)]
pub struct Rosenbrock {
    n: usize,
    x_star: Vec<f64>,
}

impl Rosenbrock {
    pub fn new(n: usize) -> Result<Self, ConfigError> {
        check_range("n", n as f64, n >= 2, ">= 2")?;
        Ok(Self { n, x_star: vec![1.0; n] })
    }
}

impl Objective for Rosenbrock {
    fn dim(&self) -> usize {
        self.n
    }

    fn value(&self, x: &[f64]) -> f64 {
        let mut acc = 0.0;
        for i in 0..self.n - 1 {
            let t = x[i + 1] - x[i] * x[i];
            let u = 1.0 - x[i];
            acc += 100.0 * t * t + u * u;
        }
        acc
    }

    fn gradient(&self, x: &[f64], g_out: &mut [f64]) {
        g_out.fill(0.0);
        for i in 0..self.n - 1 {
            let t = x[i + 1] - x[i] * x[i];
            g_out[i] += -400.0 * x[i] * t - 2.0 * (1.0 - x[i]);
            g_out[i + 1] += 200.0 * t;
        }
    }

    fn optimum(&self) -> Option<(&[f64], f64)> {
        Some((&self.x_star, 0.0))
    }
}
