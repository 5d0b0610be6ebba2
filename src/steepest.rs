//! Steepest descent, exact and line-search variants.

use crate::linalg::{dot, matvec, norm};
use crate::line_search::{self, LineSearchInput};
use crate::monitor::Monitor;
use crate::objective::{resolve_start, Objective};
use crate::options::{ConfigError, LineSearchParams, Minimum, Status, StopRule};

/// Curvatures at or below this are treated as zero or negative, proving the
/// quadratic unbounded along the current direction.
const MIN_CURVATURE: f64 = 1e-12;

/// Steepest descent with the exact closed-form step for quadratics,
/// `a = d^T d / d^T Q d`.
///
/// Requires an objective exposing a constant Hessian; anything else is
/// rejected at construction.
pub struct QuadraticSteepestDescent<'a, F: Objective + ?Sized> {
    f: &'a F,
    x: Vec<f64>,
    stop: StopRule,
    monitor: Monitor,
}

impl<'a, F: Objective + ?Sized> QuadraticSteepestDescent<'a, F> {
    pub fn new(f: &'a F, x0: Option<Vec<f64>>, stop: StopRule) -> Result<Self, ConfigError> {
        let n = f.dim();
        let hessian = f.hessian().ok_or(ConfigError::MissingHessian)?;
        if hessian.len() != n * n {
            return Err(ConfigError::HessianShape { dim: n, len: hessian.len() });
        }
        let x = resolve_start(n, x0, || f.start())?;
        Ok(Self { f, x, stop, monitor: Monitor::new() })
    }

    pub fn with_monitor(mut self, monitor: Monitor) -> Self {
        self.monitor = monitor;
        self
    }

    pub fn minimize(mut self) -> Minimum {
        let n = self.x.len();
        let Some(hessian) = self.f.hessian() else {
            // ruled out at construction
            return Minimum {
                x: self.x,
                fx: f64::NAN,
                status: Status::Error,
                iterations: 0,
                f_evals: 0,
            };
        };

        let mut g = vec![0.0; n];
        let mut hd = vec![0.0; n];
        let mut iter = 0usize;
        let mut f_eval = 0usize;
        let mut threshold = None;
        let status;
        let mut fx;

        loop {
            fx = self.f.value(&self.x);
            self.f.gradient(&self.x, &mut g);
            f_eval += 1;
            let ng = norm(&g);
            let threshold = *threshold.get_or_insert_with(|| self.stop.threshold(ng));

            self.monitor.record(iter, fx, ng);

            if ng <= threshold {
                status = Status::Optimal;
                break;
            }
            if iter >= self.stop.max_iter {
                status = Status::Stopped;
                break;
            }

            // d = -g; the sign cancels in both d^T Q d and d^T d, so work on g
            matvec(&mut hd, hessian, &g);
            let den = dot(&g, &hd);
            if den <= MIN_CURVATURE {
                // zero curvature means f is linear along d with a nonzero
                // slope; negative curvature is unbounded outright
                status = Status::Unbounded;
                break;
            }
            let a = dot(&g, &g) / den;

            if n == 2 {
                let prev = self.x.clone();
                for (xi, &gi) in self.x.iter_mut().zip(g.iter()) {
                    *xi -= a * gi;
                }
                self.monitor.moved(&prev, &self.x);
            } else {
                for (xi, &gi) in self.x.iter_mut().zip(g.iter()) {
                    *xi -= a * gi;
                }
            }
            iter += 1;
        }

        Minimum { x: self.x, fx, status, iterations: iter, f_evals: f_eval }
    }
}

/// Classical steepest descent, `d = -g`, with an Armijo-Wolfe (or
/// backtracking) line search choosing the step.
pub struct SteepestDescent<'a, F: Objective + ?Sized> {
    f: &'a F,
    x: Vec<f64>,
    stop: StopRule,
    ls: LineSearchParams,
    monitor: Monitor,
}

impl<'a, F: Objective + ?Sized> SteepestDescent<'a, F> {
    pub fn new(
        f: &'a F,
        x0: Option<Vec<f64>>,
        stop: StopRule,
        ls: LineSearchParams,
    ) -> Result<Self, ConfigError> {
        ls.validate()?;
        let x = resolve_start(f.dim(), x0, || f.start())?;
        Ok(Self { f, x, stop, ls, monitor: Monitor::new() })
    }

    pub fn with_monitor(mut self, monitor: Monitor) -> Self {
        self.monitor = monitor;
        self
    }

    pub fn minimize(mut self) -> Minimum {
        let n = self.x.len();
        let mut g = vec![0.0; n];
        let mut d = vec![0.0; n];

        let mut fx = self.f.value(&self.x);
        self.f.gradient(&self.x, &mut g);
        let mut f_eval = 1usize;
        let mut ng = norm(&g);
        let threshold = self.stop.threshold(ng);

        let mut iter = 0usize;
        let status;

        loop {
            self.monitor.record(iter, fx, ng);

            if ng <= threshold {
                status = Status::Optimal;
                break;
            }
            if iter >= self.stop.max_iter || f_eval > self.ls.max_f_eval {
                status = Status::Stopped;
                break;
            }

            for (di, &gi) in d.iter_mut().zip(g.iter()) {
                *di = -gi;
            }
            let dphi0 = -ng * ng;

            let result = line_search::search(
                self.f,
                &self.ls,
                LineSearchInput { x: &self.x, d: &d, fx, dphi0 },
                &mut f_eval,
            );

            if result.a <= self.ls.min_a {
                status = Status::Error;
                break;
            }
            if result.fx <= self.ls.m_inf {
                status = Status::Unbounded;
                break;
            }

            if n == 2 {
                self.monitor.moved(&self.x, &result.x);
            }
            self.x = result.x;
            g = result.g;
            fx = result.fx;
            ng = norm(&g);
            iter += 1;
        }

        Minimum { x: self.x, fx, status, iterations: iter, f_evals: f_eval }
    }
}
