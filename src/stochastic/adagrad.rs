use crate::monitor::Monitor;
use crate::objective::BatchObjective;
use crate::options::{check_range, ConfigError, Minimum};
use crate::stochastic::{Driver, StochasticParams, UpdateRule};

/// AdaGrad: per-coordinate step `step_size * g / sqrt(G + offset)` where `G`
/// accumulates the squared gradients seen so far. Coordinates with a history
/// of large gradients get proportionally smaller steps.
pub struct AdaGrad<'a, F: BatchObjective + ?Sized> {
    driver: Driver<'a, F>,
    rule: AdagradRule,
}

impl<'a, F: BatchObjective + ?Sized> AdaGrad<'a, F> {
    pub fn new(
        f: &'a F,
        x0: Option<Vec<f64>>,
        params: StochasticParams,
        offset: f64,
    ) -> Result<Self, ConfigError> {
        check_range("offset", offset, offset > 0.0, "> 0")?;
        let driver = Driver::new(f, x0, params)?;
        let rule = AdagradRule {
            step_size: driver.step_size(),
            offset,
            accum: vec![0.0; f.dim()],
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

struct AdagradRule {
    step_size: f64,
    offset: f64,
    accum: Vec<f64>,
}

impl UpdateRule for AdagradRule {
    fn step(&mut self, _t: usize, g: &[f64], out: &mut [f64]) {
        for i in 0..g.len() {
            self.accum[i] += g[i] * g[i];
            out[i] = self.step_size * g[i] / (self.accum[i] + self.offset).sqrt();
        }
    }
}
