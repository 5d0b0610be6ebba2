use crate::functions::Quadratic;

/// `Q = [[6, -2], [-2, 6]]`, `q = (10, 5)`, minimizer `(2.1875, 1.5625)`.
pub(crate) fn quad1() -> Quadratic {
    Quadratic::new(vec![6.0, -2.0, -2.0, 6.0], vec![10.0, 5.0]).unwrap()
}

/// `Q = [[5, -3], [-3, 5]]`, `q = (10, 5)`, minimizer `(4.0625, 3.4375)`.
pub(crate) fn quad2() -> Quadratic {
    Quadratic::new(vec![5.0, -3.0, -3.0, 5.0], vec![10.0, 5.0]).unwrap()
}

/// Diagonal SPD 5x5 with five distinct eigenvalues, minimizer at the origin.
pub(crate) fn spd5() -> Quadratic {
    Quadratic::diagonal(&[2.0, 3.0, 5.0, 8.0, 13.0])
}

pub(crate) fn assert_vec_close(x: &[f64], y: &[f64], tol: f64) {
    assert_eq!(x.len(), y.len());
    for (i, (a, b)) in x.iter().zip(y).enumerate() {
        assert!(
            (a - b).abs() <= tol,
            "coordinate {i}: |{a} - {b}| > {tol}"
        );
    }
}
