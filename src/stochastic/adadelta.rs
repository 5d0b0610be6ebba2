use crate::monitor::Monitor;
use crate::objective::BatchObjective;
use crate::options::{check_range, ConfigError, Minimum};
use crate::stochastic::{Driver, StochasticParams, UpdateRule};

/// Decay and smoothing constants of [`AdaDelta`].
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, Debug)]
pub struct AdadeltaParams {
    /// Exponential decay of both running averages, in [0, 1).
    pub rho: f64,
    /// Additive smoothing inside the square roots, > 0.
    pub offset: f64,
}

impl Default for AdadeltaParams {
    fn default() -> Self {
        Self { rho: 0.95, offset: 1e-6 }
    }
}

impl AdadeltaParams {
    fn validate(&self) -> Result<(), ConfigError> {
        check_range("rho", self.rho, self.rho >= 0.0 && self.rho < 1.0, "[0, 1)")?;
        check_range("offset", self.offset, self.offset > 0.0, "> 0")?;
        Ok(())
    }
}

/// AdaDelta: rescales the gradient by the ratio of the running RMS of past
/// steps to the running RMS of past gradients, so the step has the same
/// units as the parameter.
pub struct AdaDelta<'a, F: BatchObjective + ?Sized> {
    driver: Driver<'a, F>,
    rule: AdadeltaRule,
}

impl<'a, F: BatchObjective + ?Sized> AdaDelta<'a, F> {
    pub fn new(
        f: &'a F,
        x0: Option<Vec<f64>>,
        params: StochasticParams,
        extra: AdadeltaParams,
    ) -> Result<Self, ConfigError> {
        extra.validate()?;
        let driver = Driver::new(f, x0, params)?;
        let rule = AdadeltaRule {
            step_size: driver.step_size(),
            rho: extra.rho,
            offset: extra.offset,
            avg_sq_grad: vec![0.0; f.dim()],
            avg_sq_step: vec![0.0; f.dim()],
        };
        Ok(Self { driver, rule })
    }

    pub fn with_monitor(mut self, monitor: Monitor) -> Self {
        self.driver.set_monitor(monitor);
        self
    }

    pub fn minimize(self) -> Minimum {
        let Self { driver, mut rule } = self;
        driver.minimize(&mut rule)
    }
}

struct AdadeltaRule {
    step_size: f64,
    rho: f64,
    offset: f64,
    avg_sq_grad: Vec<f64>,
    avg_sq_step: Vec<f64>,
}

impl UpdateRule for AdadeltaRule {
    fn step(&mut self, _t: usize, g: &[f64], out: &mut [f64]) {
        for i in 0..g.len() {
            self.avg_sq_grad[i] = self.rho * self.avg_sq_grad[i] + (1.0 - self.rho) * g[i] * g[i];
            let delta = ((self.avg_sq_step[i] + self.offset)
                / (self.avg_sq_grad[i] + self.offset))
                .sqrt()
                * g[i];
            self.avg_sq_step[i] = self.rho * self.avg_sq_step[i] + (1.0 - self.rho) * delta * delta;
            out[i] = self.step_size * delta;
        }
    }
}
