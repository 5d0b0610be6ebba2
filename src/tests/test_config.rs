use crate::functions::{Quadratic, Rosenbrock};
use crate::options::{ConfigError, LineSearchParams, StopRule};
use crate::steepest::{QuadraticSteepestDescent, SteepestDescent};
use crate::stochastic::{Adam, AdamParams, Sgd, StochasticParams};

use super::common::quad1;

#[test]
fn hessian_free_objectives_cannot_use_the_exact_step() {
    let f = Rosenbrock::new(2).unwrap();
    let err = QuadraticSteepestDescent::new(&f, None, StopRule::default()).err().unwrap();
    assert_eq!(err, ConfigError::MissingHessian);
}

#[test]
fn starting_point_dimension_is_checked() {
    let f = quad1();
    let err = SteepestDescent::new(
        &f,
        Some(vec![1.0]),
        StopRule::default(),
        LineSearchParams::default(),
    )
    .err()
    .unwrap();
    assert_eq!(err, ConfigError::DimensionMismatch { expected: 2, found: 1 });
}

#[test]
fn line_search_constants_are_checked_at_construction() {
    let f = quad1();
    let ls = LineSearchParams { sfgrd: 1.0, ..Default::default() };
    let err = SteepestDescent::new(&f, None, StopRule::default(), ls).err().unwrap();
    assert!(matches!(err, ConfigError::OutOfRange { name: "sfgrd", .. }));
}

#[test]
fn stochastic_hyperparameters_are_checked() {
    let f = quad1();

    let params = StochasticParams { step_size: -1.0, ..Default::default() };
    let err = Sgd::new(&f, None, params).err().unwrap();
    assert!(matches!(err, ConfigError::OutOfRange { name: "step_size", .. }));

    let params = StochasticParams { batch_size: Some(0), ..Default::default() };
    let err = Sgd::new(&f, None, params).err().unwrap();
    assert!(matches!(err, ConfigError::OutOfRange { name: "batch_size", .. }));

    let extra = AdamParams { offset: 0.0, ..Default::default() };
    let err = Adam::new(&f, None, StochasticParams::default(), extra).err().unwrap();
    assert!(matches!(err, ConfigError::OutOfRange { name: "offset", .. }));
}

#[test]
fn config_errors_render_a_readable_message() {
    let err = Quadratic::new(vec![1.0, 2.0, 3.0], vec![0.0, 0.0]).unwrap_err();
    assert_eq!(err.to_string(), "hessian has 3 entries, expected 2x2");

    let err = ConfigError::OutOfRange { name: "m1", value: 2.0, expected: "(0, 1)" };
    assert_eq!(err.to_string(), "m1 = 2 out of range (expected (0, 1))");
}
