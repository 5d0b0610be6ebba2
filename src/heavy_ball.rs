//! Heavy-ball gradient: a deflected gradient direction built from the last
//! actual displacement.

use crate::linalg::{dot, norm};
use crate::line_search::{self, LineSearchInput};
use crate::monitor::Monitor;
use crate::objective::{resolve_start, Objective};
use crate::options::{ConfigError, LineSearchParams, Minimum, Status, StopRule};

/// `d = -g + beta_i * (x_i - x_{i-1})`.
///
/// A positive configured `beta` is used as a fixed momentum term; a
/// negative one scales with the gradient, `beta_i = |beta| * ||g|| /
/// ||x_i - x_{i-1}||`, so values near 1 keep a comparable impact as the run
/// progresses. `beta = 0` degenerates to plain steepest descent.
pub struct HeavyBallGradient<'a, F: Objective + ?Sized> {
    f: &'a F,
    x: Vec<f64>,
    beta: f64,
    stop: StopRule,
    ls: LineSearchParams,
    monitor: Monitor,
}

impl<'a, F: Objective + ?Sized> HeavyBallGradient<'a, F> {
    pub fn new(
        f: &'a F,
        x0: Option<Vec<f64>>,
        beta: f64,
        stop: StopRule,
        ls: LineSearchParams,
    ) -> Result<Self, ConfigError> {
        ls.validate()?;
        if !beta.is_finite() {
            return Err(ConfigError::OutOfRange { name: "beta", value: beta, expected: "finite" });
        }
        let x = resolve_start(f.dim(), x0, || f.start())?;
        Ok(Self { f, x, beta, stop, ls, monitor: Monitor::new() })
    }

    pub fn with_monitor(mut self, monitor: Monitor) -> Self {
        self.monitor = monitor;
        self
    }

    pub fn minimize(mut self) -> Minimum {
        let n = self.x.len();
        let mut g = vec![0.0; n];
        let mut d = vec![0.0; n];
        let mut past_d = vec![0.0; n];

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

            let npd = norm(&past_d);
            let beta_i = if iter == 0 || npd == 0.0 {
                0.0
            } else if self.beta > 0.0 {
                self.beta
            } else {
                -self.beta * ng / npd
            };
            for i in 0..n {
                d[i] = -g[i] + beta_i * past_d[i];
            }

            let dphi0 = dot(&g, &d);
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

            for i in 0..n {
                past_d[i] = result.x[i] - self.x[i];
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
