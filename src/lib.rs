//! First-order unconstrained minimization.
//!
//! Everything minimizes an [`Objective`] (or, for the stochastic family, a
//! [`BatchObjective`]) and returns a [`Minimum`] carrying the final point
//! and a terminal [`Status`]. Configuration mistakes are rejected at
//! construction with a [`ConfigError`]; numerical trouble during a run is
//! reported through the status, never by panicking.
//!
//! ```
//! use descent::{Quadratic, QuadraticSteepestDescent, Status, StopRule};
//!
//! let f = Quadratic::new(vec![6.0, -2.0, -2.0, 6.0], vec![10.0, 5.0])?;
//! let run = QuadraticSteepestDescent::new(&f, Some(vec![0.0, 0.0]), StopRule::default())?;
//! let m = run.minimize();
//! assert_eq!(m.status, Status::Optimal);
//! # Ok::<(), descent::ConfigError>(())
//! ```

mod conjugate;
mod functions;
mod heavy_ball;
mod linalg;
mod line_search;
mod monitor;
mod objective;
mod options;
mod steepest;
mod stochastic;

pub use conjugate::NonlinearConjugateGradient;
pub use functions::{Quadratic, Rosenbrock};
pub use heavy_ball::HeavyBallGradient;
pub use monitor::Monitor;
pub use objective::{BatchObjective, Objective};
pub use options::{
    BetaFormula, ConfigError, LineSearchParams, Minimum, Momentum, Status, StopRule,
};
pub use steepest::{QuadraticSteepestDescent, SteepestDescent};
pub use stochastic::{
    AdaDelta, AdaGrad, AdaMax, Adam, AdadeltaParams, AdamParams, AmsGrad, Rprop, RpropParams,
    Sgd, StochasticParams,
};

#[cfg(test)]
mod tests;
