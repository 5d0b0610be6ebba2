pub(crate) fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .copied()
        .zip(b.iter().copied())
        .map(|(x, y)| x * y)
        .sum()
}

pub(crate) fn norm(v: &[f64]) -> f64 {
    dot(v, v).sqrt()
}

pub(crate) fn axpy_into(out: &mut [f64], x: &[f64], alpha: f64, s: &[f64]) {
    for ((o, &xi), &si) in out.iter_mut().zip(x.iter()).zip(s.iter()) {
        *o = xi + alpha * si;
    }
}

pub(crate) fn matvec(out: &mut [f64], a: &[f64], x: &[f64]) {
    let n = x.len();
    debug_assert_eq!(a.len(), n * n);
    debug_assert_eq!(out.len(), n);

    for i in 0..n {
        let row = &a[i * n..(i + 1) * n];
        out[i] = row
            .iter()
            .copied()
            .zip(x.iter().copied())
            .map(|(aa, xx)| aa * xx)
            .sum();
    }
}

/// Gaussian elimination with partial pivoting on a row-major square matrix.
/// Only used to recover the known minimizer of quadratic benchmarks, so
/// singular systems simply yield `None`.
pub(crate) fn solve(a: &[f64], b: &[f64]) -> Option<Vec<f64>> {
    let n = b.len();
    debug_assert_eq!(a.len(), n * n);

    let mut m = a.to_vec();
    let mut x = b.to_vec();

    for col in 0..n {
        let pivot = (col..n).max_by(|&i, &j| {
            m[i * n + col]
                .abs()
                .total_cmp(&m[j * n + col].abs())
        })?;
        if m[pivot * n + col].abs() <= f64::EPSILON * (n as f64) {
            return None;
        }
        if pivot != col {
            for k in 0..n {
                m.swap(col * n + k, pivot * n + k);
            }
            x.swap(col, pivot);
        }

        for row in (col + 1)..n {
            let factor = m[row * n + col] / m[col * n + col];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                m[row * n + k] -= factor * m[col * n + k];
            }
            x[row] -= factor * x[col];
        }
    }

    for col in (0..n).rev() {
        let mut acc = x[col];
        for k in (col + 1)..n {
            acc -= m[col * n + k] * x[k];
        }
        x[col] = acc / m[col * n + col];
        if !x[col].is_finite() {
            return None;
        }
    }

    Some(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solve_recovers_known_solution() {
        // [[6,-2],[-2,6]] x = [10,5] has x = (2.1875, 1.5625)
        let a = [6.0, -2.0, -2.0, 6.0];
        let b = [10.0, 5.0];
        let x = solve(&a, &b).unwrap();
        assert!((x[0] - 2.1875).abs() < 1e-12);
        assert!((x[1] - 1.5625).abs() < 1e-12);
    }

    #[test]
    fn solve_rejects_singular() {
        let a = [1.0, 2.0, 2.0, 4.0];
        assert!(solve(&a, &[1.0, 1.0]).is_none());
    }

    #[test]
    fn norm_is_euclidean() {
        assert_eq!(norm(&[3.0, 4.0]), 5.0);
    }
}
