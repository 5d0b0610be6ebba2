use crate::monitor::Monitor;
use crate::objective::BatchObjective;
use crate::options::{check_range, ConfigError, Minimum};
use crate::stochastic::{Driver, StochasticParams, UpdateRule};

/// Moment-decay constants shared by [`Adam`], [`AdaMax`](crate::AdaMax) and
/// [`AmsGrad`](crate::AmsGrad).
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, Debug)]
pub struct AdamParams {
    /// Decay of the first-moment estimate, in [0, 1).
    pub beta1: f64,
    /// Decay of the second-moment estimate, in [0, 1).
    pub beta2: f64,
    /// Additive smoothing in the denominator, > 0.
    pub offset: f64,
}

impl Default for AdamParams {
    fn default() -> Self {
        Self { beta1: 0.9, beta2: 0.999, offset: 1e-8 }
    }
}

impl AdamParams {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        check_range("beta1", self.beta1, self.beta1 >= 0.0 && self.beta1 < 1.0, "[0, 1)")?;
        check_range("beta2", self.beta2, self.beta2 >= 0.0 && self.beta2 < 1.0, "[0, 1)")?;
        check_range("offset", self.offset, self.offset > 0.0, "> 0")?;
        Ok(())
    }
}

/// Adam: exponential moving averages of the gradient and its square, both
/// bias-corrected, with the step `step_size * m_hat / (sqrt(v_hat) + offset)`.
pub struct Adam<'a, F: BatchObjective + ?Sized> {
    driver: Driver<'a, F>,
    rule: AdamRule,
}

impl<'a, F: BatchObjective + ?Sized> Adam<'a, F> {
    pub fn new(
        f: &'a F,
        x0: Option<Vec<f64>>,
        params: StochasticParams,
        extra: AdamParams,
    ) -> Result<Self, ConfigError> {
        extra.validate()?;
        let driver = Driver::new(f, x0, params)?;
        let rule = AdamRule::new(f.dim(), driver.step_size(), extra);
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

pub(crate) struct AdamRule {
    step_size: f64,
    p: AdamParams,
    m: Vec<f64>,
    v: Vec<f64>,
}

impl AdamRule {
    pub(crate) fn new(dim: usize, step_size: f64, p: AdamParams) -> Self {
        Self { step_size, p, m: vec![0.0; dim], v: vec![0.0; dim] }
    }
}

impl UpdateRule for AdamRule {
    fn step(&mut self, t: usize, g: &[f64], out: &mut [f64]) {
        let bc1 = 1.0 - self.p.beta1.powi(t as i32);
        let bc2 = 1.0 - self.p.beta2.powi(t as i32);
        for i in 0..g.len() {
            self.m[i] = self.p.beta1 * self.m[i] + (1.0 - self.p.beta1) * g[i];
            self.v[i] = self.p.beta2 * self.v[i] + (1.0 - self.p.beta2) * g[i] * g[i];
            let m_hat = self.m[i] / bc1;
            let v_hat = self.v[i] / bc2;
            out[i] = self.step_size * m_hat / (v_hat.sqrt() + self.p.offset);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn first_step_is_bias_corrected_to_the_sign_of_g() {
        // at t = 1 the corrections cancel the (1 - beta) factors exactly, so
        // the step is step_size * g / (|g| + offset)
        let mut rule = AdamRule::new(1, 0.1, AdamParams::default());
        let mut out = vec![0.0];
        rule.step(1, &[5.0], &mut out);
        assert_relative_eq!(out[0], 0.1 * 5.0 / (5.0 + 1e-8), max_relative = 1e-12);
    }

    #[test]
    fn betas_outside_unit_interval_rejected() {
        let p = AdamParams { beta1: 1.0, ..Default::default() };
        assert!(matches!(p.validate(), Err(ConfigError::OutOfRange { name: "beta1", .. })));
        let p = AdamParams { beta2: -0.1, ..Default::default() };
        assert!(matches!(p.validate(), Err(ConfigError::OutOfRange { name: "beta2", .. })));
    }
}
