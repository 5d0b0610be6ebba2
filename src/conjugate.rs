//! Nonlinear conjugate gradient with a choice of beta formulas.

use crate::linalg::{dot, norm};
use crate::line_search::{self, LineSearchInput};
use crate::monitor::Monitor;
use crate::objective::{resolve_start, Objective};
use crate::options::{BetaFormula, ConfigError, LineSearchParams, Minimum, Status, StopRule};

pub struct NonlinearConjugateGradient<'a, F: Objective + ?Sized> {
    f: &'a F,
    x: Vec<f64>,
    formula: BetaFormula,
    /// When > 0, restart with `beta = 0` every `n * r_start` iterations.
    r_start: usize,
    stop: StopRule,
    ls: LineSearchParams,
    monitor: Monitor,
}

impl<'a, F: Objective + ?Sized> NonlinearConjugateGradient<'a, F> {
    pub fn new(
        f: &'a F,
        x0: Option<Vec<f64>>,
        formula: BetaFormula,
        r_start: usize,
        stop: StopRule,
        ls: LineSearchParams,
    ) -> Result<Self, ConfigError> {
        ls.validate()?;
        let x = resolve_start(f.dim(), x0, || f.start())?;
        Ok(Self { f, x, formula, r_start, stop, ls, monitor: Monitor::new() })
    }

    pub fn with_monitor(mut self, monitor: Monitor) -> Self {
        self.monitor = monitor;
        self
    }

    fn beta(&self, g: &[f64], past_g: &[f64], past_d: &[f64], ng: f64) -> f64 {
        let png2 = dot(past_g, past_g);
        if png2 == 0.0 {
            return 0.0;
        }
        let fr = ng * ng / png2;

        // y = g - past_g, used by every formula except Fletcher-Reeves
        let gy = dot(g, g) - dot(g, past_g);
        match self.formula {
            BetaFormula::FletcherReeves => fr,
            BetaFormula::PolakRibiere => (gy / png2).max(0.0),
            BetaFormula::HybridFrPr => (gy / png2).clamp(-fr, fr),
            BetaFormula::HestenesStiefel => {
                let yd = dot(g, past_d) - dot(past_g, past_d);
                if yd.abs() <= f64::EPSILON {
                    0.0
                } else {
                    gy / yd
                }
            }
            BetaFormula::DaiYuan => {
                let yd = dot(g, past_d) - dot(past_g, past_d);
                if yd.abs() <= f64::EPSILON {
                    0.0
                } else {
                    ng * ng / yd
                }
            }
        }
    }

    pub fn minimize(mut self) -> Minimum {
        let n = self.x.len();
        let mut g = vec![0.0; n];
        let mut past_g = vec![0.0; n];
        let mut past_d = vec![0.0; n];
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

            let beta = if iter == 0 {
                0.0
            } else if self.r_start > 0 && iter % (n * self.r_start) == 0 {
                0.0 // periodic restart
            } else {
                self.beta(&g, &past_g, &past_d, ng)
            };

            for i in 0..n {
                d[i] = -g[i] + beta * past_d[i];
            }

            past_g.copy_from_slice(&g);
            past_d.copy_from_slice(&d);

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
