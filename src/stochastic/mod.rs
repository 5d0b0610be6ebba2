//! Mini-batch stochastic optimizers.
//!
//! Every member of the family shares one epoch/mini-batch loop, the
//! [`Driver`], and differs only in its [`UpdateRule`]: the rule turns the
//! mini-batch gradient into a raw step, the driver owns shuffling, momentum,
//! stopping and bookkeeping. Momentum is applied uniformly across rules, so
//! e.g. Nesterov-Adam comes for free.

use crate::linalg::norm;
use crate::monitor::Monitor;
use crate::objective::{resolve_start, BatchObjective};
use crate::options::{check_range, ConfigError, Minimum, Momentum, Status};

mod adadelta;
mod adagrad;
mod adam;
mod adamax;
mod amsgrad;
mod rprop;
mod sgd;

pub use adadelta::{AdaDelta, AdadeltaParams};
pub use adagrad::AdaGrad;
pub use adam::{Adam, AdamParams};
pub use adamax::AdaMax;
pub use amsgrad::AmsGrad;
pub use rprop::{Rprop, RpropParams};
pub use sgd::Sgd;

/// Hyperparameters shared by the whole stochastic family.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, Debug)]
pub struct StochasticParams {
    /// Base learning rate. Ignored by Rprop, which sizes steps on its own.
    pub step_size: f64,
    /// Samples per mini-batch; `None` runs full-batch.
    pub batch_size: Option<usize>,
    /// Passes over the sample set.
    pub epochs: usize,
    /// Gradient-norm tolerance; negative switches to the relative criterion
    /// scaled by the first mini-batch gradient seen.
    pub eps: f64,
    pub momentum: Momentum,
    /// Weight on the previous step, in [0, 1). Unused when `momentum` is
    /// [`Momentum::None`].
    pub momentum_coeff: f64,
    /// Reshuffle the sample order at the start of every epoch.
    pub shuffle: bool,
    /// Seed for the shuffling RNG, so runs are reproducible.
    pub seed: u64,
}

impl Default for StochasticParams {
    fn default() -> Self {
        Self {
            step_size: 0.01,
            batch_size: None,
            epochs: 1000,
            eps: 1e-6,
            momentum: Momentum::None,
            momentum_coeff: 0.9,
            shuffle: true,
            seed: 0,
        }
    }
}

impl StochasticParams {
    fn validate(&self) -> Result<(), ConfigError> {
        check_range("step_size", self.step_size, self.step_size > 0.0, "> 0")?;
        check_range("epochs", self.epochs as f64, self.epochs > 0, "> 0")?;
        check_range(
            "momentum_coeff",
            self.momentum_coeff,
            self.momentum_coeff >= 0.0 && self.momentum_coeff < 1.0,
            "[0, 1)",
        )?;
        if let Some(b) = self.batch_size {
            check_range("batch_size", b as f64, b > 0, "> 0")?;
        }
        Ok(())
    }
}

/// Fisher-Yates, driven by the seeded driver RNG.
pub(crate) fn shuffle(rng: &mut fastrand::Rng, xs: &mut [usize]) {
    for i in (1..xs.len()).rev() {
        let j = rng.usize(..=i);
        xs.swap(i, j);
    }
}

/// Per-update state transition of one family member.
///
/// `step` writes the raw step (the quantity subtracted from `x`, learning
/// rate included) for the mini-batch gradient `g` at update count `t`
/// (1-based, for bias correction). Momentum is layered on top by the driver.
pub(crate) trait UpdateRule {
    fn step(&mut self, t: usize, g: &[f64], out: &mut [f64]);
}

/// The epoch/mini-batch loop shared by the stochastic family.
pub(crate) struct Driver<'a, F: BatchObjective + ?Sized> {
    f: &'a F,
    x: Vec<f64>,
    params: StochasticParams,
    monitor: Monitor,
}

impl<'a, F: BatchObjective + ?Sized> Driver<'a, F> {
    pub(crate) fn new(
        f: &'a F,
        x0: Option<Vec<f64>>,
        params: StochasticParams,
    ) -> Result<Self, ConfigError> {
        params.validate()?;
        let x = resolve_start(f.dim(), x0, || f.start())?;
        Ok(Self { f, x, params, monitor: Monitor::new() })
    }

    pub(crate) fn step_size(&self) -> f64 {
        self.params.step_size
    }

    pub(crate) fn set_monitor(&mut self, monitor: Monitor) {
        self.monitor = monitor;
    }

    pub(crate) fn minimize(mut self, rule: &mut dyn UpdateRule) -> Minimum {
        let n = self.x.len();
        let samples = self.f.sample_count();
        let batch = self.params.batch_size.unwrap_or(samples).min(samples).max(1);
        let coeff = self.params.momentum_coeff;

        let mut order: Vec<usize> = (0..samples).collect();
        let mut rng = fastrand::Rng::with_seed(self.params.seed);

        let mut g = vec![0.0; n];
        let mut raw = vec![0.0; n];
        let mut prev_step = vec![0.0; n];
        let mut look = vec![0.0; n];

        let mut threshold = None;
        let mut iter = 0usize;
        let mut f_evals = 0usize;
        let mut status = Status::Stopped;

        'epochs: for _ in 0..self.params.epochs {
            if self.params.shuffle {
                shuffle(&mut rng, &mut order);
            }
            for chunk in order.chunks(batch) {
                let fx = self.f.batch_value(&self.x, chunk);
                self.f.batch_gradient(&self.x, &mut g, chunk);
                f_evals += 1;
                let ng = norm(&g);
                let threshold = *threshold.get_or_insert_with(|| {
                    if self.params.eps < 0.0 {
                        -self.params.eps * ng
                    } else {
                        self.params.eps
                    }
                });

                self.monitor.record(iter, fx, ng);
                if ng <= threshold {
                    status = Status::Optimal;
                    break 'epochs;
                }

                let prev_x = (n == 2).then(|| self.x.clone());
                let t = iter + 1;
                match self.params.momentum {
                    Momentum::None => {
                        rule.step(t, &g, &mut raw);
                        for i in 0..n {
                            self.x[i] -= raw[i];
                        }
                        prev_step.copy_from_slice(&raw);
                    }
                    Momentum::Standard => {
                        rule.step(t, &g, &mut raw);
                        for i in 0..n {
                            let s = coeff * prev_step[i] + raw[i];
                            self.x[i] -= s;
                            prev_step[i] = s;
                        }
                    }
                    Momentum::Nesterov => {
                        // look ahead along the previous step, then take the
                        // rule's step from the gradient at the shifted point
                        for i in 0..n {
                            look[i] = self.x[i] - coeff * prev_step[i];
                        }
                        self.f.batch_gradient(&look, &mut g, chunk);
                        rule.step(t, &g, &mut raw);
                        for i in 0..n {
                            self.x[i] = look[i] - raw[i];
                            prev_step[i] = coeff * prev_step[i] + raw[i];
                        }
                    }
                }
                if let Some(prev) = prev_x {
                    self.monitor.moved(&prev, &self.x);
                }
                iter += 1;
            }
        }

        // report the full-batch value at the final point, whatever the batch
        // schedule was
        let full: Vec<usize> = (0..samples).collect();
        let fx = self.f.batch_value(&self.x, &full);
        f_evals += 1;

        Minimum { x: self.x, fx, status, iterations: iter, f_evals }
    }
}
