//! Side-effect-only diagnostic hooks.
//!
//! Hooks are observers: whether they are installed or not must never change
//! the iterates an algorithm produces.

type IterHook = Box<dyn FnMut(usize, f64, f64)>;
type MoveHook = Box<dyn FnMut(&[f64], &[f64])>;

/// Optional per-iteration callbacks attached to a run.
#[derive(Default)]
pub struct Monitor {
    on_iteration: Option<IterHook>,
    on_move: Option<MoveHook>,
}

impl Monitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Invoked once per iteration (per update, for the stochastic family)
    /// with `(iteration, f(x), ||g(x)||)`.
    pub fn on_iteration(mut self, hook: impl FnMut(usize, f64, f64) + 'static) -> Self {
        self.on_iteration = Some(Box::new(hook));
        self
    }

    /// Invoked with `(previous_point, new_point)` after every accepted move
    /// of a 2-dimensional objective, e.g. to collect a trajectory for
    /// contour plotting.
    pub fn on_move(mut self, hook: impl FnMut(&[f64], &[f64]) + 'static) -> Self {
        self.on_move = Some(Box::new(hook));
        self
    }

    pub(crate) fn record(&mut self, iter: usize, fx: f64, grad_norm: f64) {
        if let Some(hook) = self.on_iteration.as_mut() {
            hook(iter, fx, grad_norm);
        }
    }

    /// Callers gate this on `dim == 2`.
    pub(crate) fn moved(&mut self, from: &[f64], to: &[f64]) {
        if let Some(hook) = self.on_move.as_mut() {
            hook(from, to);
        }
    }
}

#[cfg(feature = "progress")]
mod progress {
    use std::io::IsTerminal;

    use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

    use super::Monitor;

    impl Monitor {
        /// A monitor driving an indicatif progress bar over `total`
        /// iterations, hidden when stderr is not a terminal.
        pub fn progress_bar(total: u64) -> Self {
            let bar = if std::io::stderr().is_terminal() {
                let pb = ProgressBar::new(total);
                pb.set_draw_target(ProgressDrawTarget::stderr_with_hz(10));
                if let Ok(style) =
                    ProgressStyle::with_template("{prefix} {wide_bar} {pos:>7}/{len:7} {msg}")
                {
                    pb.set_style(style);
                }
                pb.set_prefix("minimizing");
                pb
            } else {
                ProgressBar::hidden()
            };

            Monitor::new().on_iteration(move |iter, fx, ng| {
                bar.set_position(iter as u64);
                bar.set_message(format!(
                    "f(x) = {} ||g|| = {ng:1.4e}",
                    console::style(format!("{fx:1.8e}")).bold()
                ));
            })
        }
    }
}
