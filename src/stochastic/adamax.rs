use crate::monitor::Monitor;
use crate::objective::BatchObjective;
use crate::options::{ConfigError, Minimum};
use crate::stochastic::adam::AdamParams;
use crate::stochastic::{Driver, StochasticParams, UpdateRule};

/// AdaMax: the infinity-norm variant of Adam. The second moment is replaced
/// by a running max of `beta2`-decayed gradient magnitudes, which needs no
/// bias correction.
pub struct AdaMax<'a, F: BatchObjective + ?Sized> {
    driver: Driver<'a, F>,
    rule: AdamaxRule,
}

impl<'a, F: BatchObjective + ?Sized> AdaMax<'a, F> {
    pub fn new(
        f: &'a F,
        x0: Option<Vec<f64>>,
        params: StochasticParams,
        extra: AdamParams,
    ) -> Result<Self, ConfigError> {
        extra.validate()?;
        let driver = Driver::new(f, x0, params)?;
        let rule = AdamaxRule {
            step_size: driver.step_size(),
            p: extra,
            m: vec![0.0; f.dim()],
            u: vec![0.0; f.dim()],
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

struct AdamaxRule {
    step_size: f64,
    p: AdamParams,
    m: Vec<f64>,
    u: Vec<f64>,
}

impl UpdateRule for AdamaxRule {
    fn step(&mut self, t: usize, g: &[f64], out: &mut [f64]) {
        let bc1 = 1.0 - self.p.beta1.powi(t as i32);
        for i in 0..g.len() {
            self.m[i] = self.p.beta1 * self.m[i] + (1.0 - self.p.beta1) * g[i];
            self.u[i] = (self.p.beta2 * self.u[i]).max(g[i].abs());
            out[i] = self.step_size * (self.m[i] / bc1) / (self.u[i] + self.p.offset);
        }
    }
}
