use std::cell::RefCell;
use std::rc::Rc;

use crate::functions::Quadratic;
use crate::monitor::Monitor;
use crate::objective::Objective;
use crate::options::{LineSearchParams, Status, StopRule};
use crate::steepest::{QuadraticSteepestDescent, SteepestDescent};

use super::common::{assert_vec_close, quad1, quad2};

#[test]
fn exact_step_solves_the_identity_quadratic_in_one_iteration() {
    // Q = I: the exact step length is 1 and lands on the minimizer directly
    let f = Quadratic::diagonal(&[1.0, 1.0]);
    let run = QuadraticSteepestDescent::new(&f, Some(vec![-1.0, 1.0]), StopRule::default())
        .unwrap();
    let m = run.minimize();

    assert_eq!(m.status, Status::Optimal);
    assert_eq!(m.iterations, 1);
    assert_vec_close(&m.x, &[0.0, 0.0], 1e-12);
}

#[test]
fn exact_variant_converges_on_a_coupled_quadratic() {
    let f = quad1();
    let run = QuadraticSteepestDescent::new(&f, None, StopRule::default()).unwrap();
    let m = run.minimize();

    assert_eq!(m.status, Status::Optimal);
    let (x_star, f_star) = f.optimum().unwrap();
    assert_vec_close(&m.x, x_star, 1e-5);
    assert!((m.fx - f_star).abs() < 1e-8);
}

#[test]
fn exact_variant_detects_negative_curvature() {
    let f = Quadratic::new(vec![1.0, 0.0, 0.0, -1.0], vec![0.0, 0.0]).unwrap();
    let run = QuadraticSteepestDescent::new(&f, Some(vec![0.0, 1.0]), StopRule::default())
        .unwrap();
    let m = run.minimize();
    assert_eq!(m.status, Status::Unbounded);
}

#[test]
fn exact_variant_stops_at_the_iteration_cap() {
    let f = quad1();
    let stop = StopRule { eps: 1e-14, max_iter: 2 };
    let m = QuadraticSteepestDescent::new(&f, None, stop).unwrap().minimize();
    assert_eq!(m.status, Status::Stopped);
    assert_eq!(m.iterations, 2);
}

#[test]
fn line_search_variant_converges_on_both_quadratics() {
    for f in [quad1(), quad2()] {
        let run =
            SteepestDescent::new(&f, None, StopRule::default(), LineSearchParams::default())
                .unwrap();
        let m = run.minimize();

        assert_eq!(m.status, Status::Optimal, "status = {}", m.status);
        let (x_star, _) = f.optimum().unwrap();
        assert_vec_close(&m.x, x_star, 1e-5);
    }
}

#[test]
fn line_search_variant_detects_an_unbounded_objective() {
    // linear piece dominates: 1e-8 x1^2 - x2 has no finite minimum along -g
    let f = Quadratic::new(vec![1e-8, 0.0, 0.0, 0.0], vec![0.0, 1.0]).unwrap();
    let ls = LineSearchParams { m_inf: -1e6, ..Default::default() };
    let m = SteepestDescent::new(&f, None, StopRule::default(), ls).unwrap().minimize();
    assert_eq!(m.status, Status::Unbounded);
}

#[test]
fn relative_tolerance_scales_with_the_first_gradient() {
    let f = quad1();
    // ||g0|| from the origin is ||q|| ~ 11.18; -1e-2 asks for a hundredfold
    // reduction only
    let stop = StopRule { eps: -1e-2, max_iter: 1000 };
    let m = QuadraticSteepestDescent::new(&f, None, stop).unwrap().minimize();
    assert_eq!(m.status, Status::Optimal);
    let loose = m.iterations;

    let tight = QuadraticSteepestDescent::new(&f, None, StopRule::default())
        .unwrap()
        .minimize()
        .iterations;
    assert!(loose < tight);
}

#[test]
fn monitor_sees_every_iteration_and_move() {
    let iters = Rc::new(RefCell::new(0usize));
    let moves = Rc::new(RefCell::new(Vec::new()));
    let (i, mv) = (Rc::clone(&iters), Rc::clone(&moves));
    let monitor = Monitor::new()
        .on_iteration(move |_, _, _| *i.borrow_mut() += 1)
        .on_move(move |_, to| mv.borrow_mut().push(to.to_vec()));

    let f = quad1();
    let m = QuadraticSteepestDescent::new(&f, None, StopRule::default())
        .unwrap()
        .with_monitor(monitor)
        .minimize();

    // one record per loop entry, including the terminal one
    assert_eq!(*iters.borrow(), m.iterations + 1);
    assert_eq!(moves.borrow().len(), m.iterations);
    assert_vec_close(moves.borrow().last().unwrap(), &m.x, 0.0);
}
