use crate::monitor::Monitor;
use crate::objective::BatchObjective;
use crate::options::{ConfigError, Minimum};
use crate::stochastic::{Driver, StochasticParams, UpdateRule};

/// Plain stochastic gradient descent: `step = step_size * g`.
pub struct Sgd<'a, F: BatchObjective + ?Sized> {
    driver: Driver<'a, F>,
    rule: SgdRule,
}

impl<'a, F: BatchObjective + ?Sized> Sgd<'a, F> {
    pub fn new(
        f: &'a F,
        x0: Option<Vec<f64>>,
        params: StochasticParams,
    ) -> Result<Self, ConfigError> {
        let driver = Driver::new(f, x0, params)?;
        let rule = SgdRule { step_size: driver.step_size() };
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

struct SgdRule {
    step_size: f64,
}

impl UpdateRule for SgdRule {
    fn step(&mut self, _t: usize, g: &[f64], out: &mut [f64]) {
        for (o, &gi) in out.iter_mut().zip(g) {
            *o = self.step_size * gi;
        }
    }
}
