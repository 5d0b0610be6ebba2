use crate::monitor::Monitor;
use crate::objective::BatchObjective;
use crate::options::{check_range, ConfigError, Minimum};
use crate::stochastic::{Driver, StochasticParams, UpdateRule};

/// Step-size schedule of [`Rprop`].
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, Debug)]
pub struct RpropParams {
    /// Lower clamp on the per-coordinate step, > 0.
    pub min_step: f64,
    /// Multiplier applied when the partial derivative changes sign, in (0, 1).
    pub step_shrink: f64,
    /// Multiplier applied when the sign is kept, > 1.
    pub step_grow: f64,
    /// Upper clamp on the per-coordinate step, >= `min_step`.
    pub max_step: f64,
}

impl Default for RpropParams {
    fn default() -> Self {
        Self { min_step: 1e-6, step_shrink: 0.5, step_grow: 1.2, max_step: 1.0 }
    }
}

impl RpropParams {
    fn validate(&self) -> Result<(), ConfigError> {
        check_range("min_step", self.min_step, self.min_step > 0.0, "> 0")?;
        check_range(
            "max_step",
            self.max_step,
            self.max_step >= self.min_step,
            ">= min_step",
        )?;
        check_range(
            "step_shrink",
            self.step_shrink,
            self.step_shrink > 0.0 && self.step_shrink < 1.0,
            "(0, 1)",
        )?;
        check_range("step_grow", self.step_grow, self.step_grow > 1.0, "> 1")?;
        Ok(())
    }
}

/// Resilient propagation: only the sign of each partial derivative is used.
/// Each coordinate keeps its own step, grown while the sign holds and shrunk
/// when it flips, clamped into `[min_step, max_step]`.
///
/// `StochasticParams::step_size` is ignored; the schedule above replaces it.
pub struct Rprop<'a, F: BatchObjective + ?Sized> {
    driver: Driver<'a, F>,
    rule: RpropRule,
}

impl<'a, F: BatchObjective + ?Sized> Rprop<'a, F> {
    pub fn new(
        f: &'a F,
        x0: Option<Vec<f64>>,
        params: StochasticParams,
        extra: RpropParams,
    ) -> Result<Self, ConfigError> {
        extra.validate()?;
        let driver = Driver::new(f, x0, params)?;
        let rule = RpropRule::new(f.dim(), extra);
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

/// Zero maps to zero, unlike `f64::signum`.
fn sign(v: f64) -> f64 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

struct RpropRule {
    p: RpropParams,
    delta: Vec<f64>,
    prev_g: Vec<f64>,
}

impl RpropRule {
    fn new(dim: usize, p: RpropParams) -> Self {
        Self { p, delta: vec![0.0; dim], prev_g: vec![0.0; dim] }
    }
}

impl UpdateRule for RpropRule {
    fn step(&mut self, _t: usize, g: &[f64], out: &mut [f64]) {
        for i in 0..g.len() {
            let prod = self.prev_g[i] * g[i];
            if prod > 0.0 {
                self.delta[i] *= self.p.step_grow;
            } else if prod < 0.0 {
                self.delta[i] *= self.p.step_shrink;
            }
            // the clamp also lifts the zero-initialized steps to min_step on
            // the first update
            self.delta[i] = self.delta[i].clamp(self.p.min_step, self.p.max_step);
            out[i] = sign(g[i]) * self.delta[i];
            self.prev_g[i] = g[i];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn steps_grow_while_the_sign_holds_and_shrink_on_a_flip() {
        let p = RpropParams { min_step: 1e-3, ..Default::default() };
        let mut rule = RpropRule::new(1, p);
        let mut out = vec![0.0];

        rule.step(1, &[1.0], &mut out);
        assert_relative_eq!(out[0], 1e-3);

        // grow well clear of min_step so the shrink below is observable
        for t in 2..=5 {
            rule.step(t, &[0.5], &mut out);
        }
        let grown = 1e-3 * 1.2f64.powi(4);
        assert_relative_eq!(out[0], grown, max_relative = 1e-12);

        rule.step(6, &[-0.5], &mut out);
        assert_relative_eq!(out[0], -grown * 0.5, max_relative = 1e-12);

        // a second flip would shrink below the floor; the clamp lifts it back
        rule.step(7, &[0.5], &mut out);
        assert_relative_eq!(out[0], 1e-3);
    }

    #[test]
    fn steps_stay_clamped() {
        let p = RpropParams { min_step: 0.1, max_step: 0.2, ..Default::default() };
        let mut rule = RpropRule::new(1, p);
        let mut out = vec![0.0];
        for t in 1..20 {
            rule.step(t, &[1.0], &mut out);
        }
        assert_relative_eq!(out[0], 0.2);
        for t in 20..40 {
            rule.step(t, &[if t % 2 == 0 { 1.0 } else { -1.0 }], &mut out);
        }
        assert_relative_eq!(out[0].abs(), 0.1);
    }

    #[test]
    fn zero_gradient_takes_no_step() {
        let mut rule = RpropRule::new(1, RpropParams::default());
        let mut out = vec![1.0];
        rule.step(1, &[0.0], &mut out);
        assert_eq!(out[0], 0.0);
    }

    #[test]
    fn schedule_bounds_validated() {
        let p = RpropParams { min_step: 0.5, max_step: 0.1, ..Default::default() };
        assert!(matches!(p.validate(), Err(ConfigError::OutOfRange { name: "max_step", .. })));
        let p = RpropParams { step_grow: 1.0, ..Default::default() };
        assert!(matches!(p.validate(), Err(ConfigError::OutOfRange { name: "step_grow", .. })));
    }
}
