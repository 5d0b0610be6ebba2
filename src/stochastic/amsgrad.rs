use crate::monitor::Monitor;
use crate::objective::BatchObjective;
use crate::options::{ConfigError, Minimum};
use crate::stochastic::adam::AdamParams;
use crate::stochastic::{Driver, StochasticParams, UpdateRule};

/// AMSGrad: Adam with a non-increasing effective step. The denominator uses
/// the running max of the second-moment estimate, without bias correction,
/// so a single large gradient keeps damping all later steps.
pub struct AmsGrad<'a, F: BatchObjective + ?Sized> {
    driver: Driver<'a, F>,
    rule: AmsgradRule,
}

impl<'a, F: BatchObjective + ?Sized> AmsGrad<'a, F> {
    pub fn new(
        f: &'a F,
        x0: Option<Vec<f64>>,
        params: StochasticParams,
        extra: AdamParams,
    ) -> Result<Self, ConfigError> {
        extra.validate()?;
        let driver = Driver::new(f, x0, params)?;
        let n = f.dim();
        let rule = AmsgradRule {
            step_size: driver.step_size(),
            p: extra,
            m: vec![0.0; n],
            v: vec![0.0; n],
            v_max: vec![0.0; n],
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

struct AmsgradRule {
    step_size: f64,
    p: AdamParams,
    m: Vec<f64>,
    v: Vec<f64>,
    v_max: Vec<f64>,
}

impl UpdateRule for AmsgradRule {
    fn step(&mut self, t: usize, g: &[f64], out: &mut [f64]) {
        let bc1 = 1.0 - self.p.beta1.powi(t as i32);
        for i in 0..g.len() {
            self.m[i] = self.p.beta1 * self.m[i] + (1.0 - self.p.beta1) * g[i];
            self.v[i] = self.p.beta2 * self.v[i] + (1.0 - self.p.beta2) * g[i] * g[i];
            self.v_max[i] = self.v_max[i].max(self.v[i]);
            out[i] = self.step_size * (self.m[i] / bc1) / (self.v_max[i].sqrt() + self.p.offset);
        }
    }
}
