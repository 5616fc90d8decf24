//! Gauss-Legendre rules for the interval `[-1, 1]`.

use crate::{Error, Rule};
use std::f64::consts::PI;

/// Maximum number of Newton iterations used to locate a single root.
const MAX_NEWTON_ITERATIONS: usize = 100;

/// Values of the Legendre polynomials `P_n(x)` and `P_{n - 1}(x)`, obtained by the three-term
/// recurrence `m P_m(x) = (2m - 1) x P_{m - 1}(x) - (m - 1) P_{m - 2}(x)`.
#[derive(Debug, Clone, Copy)]
struct Legendre {
    n: usize,
    x: f64,
    current: f64,
    previous: f64,
}

impl Legendre {
    fn at(n: usize, x: f64) -> Self {
        let mut current = 1.0;
        let mut previous = 0.0;
        for m in 1..=n {
            let m = m as f64;
            let next = ((2.0 * m - 1.0) * x * current - (m - 1.0) * previous) / m;
            previous = current;
            current = next;
        }
        Self {
            n,
            x,
            current,
            previous,
        }
    }

    fn value(&self) -> f64 {
        self.current
    }

    /// `P_n'(x) = n (x P_n(x) - P_{n - 1}(x)) / (x^2 - 1)`, valid only in the open interval.
    fn derivative(&self) -> f64 {
        let n = self.n as f64;
        n * (self.x * self.current - self.previous) / (self.x * self.x - 1.0)
    }
}

/// Gauss-Legendre rule with `num_points` points on `[-1, 1]`.
///
/// A rule with `n` points integrates polynomials of degree up to `2n - 1` exactly. Points are
/// returned in ascending order.
///
/// # Panics
///
/// Panics if zero points are requested.
pub fn gauss(num_points: usize) -> Rule<1> {
    try_gauss(num_points).expect("Internal error: Newton iteration for Gauss points did not converge")
}

/// Same as [`gauss`], but returns an error if root finding fails to converge.
///
/// # Panics
///
/// Panics if zero points are requested.
pub fn try_gauss(num_points: usize) -> Result<Rule<1>, Error> {
    let n = num_points;
    assert!(n > 0, "number of points must be positive");

    // Roots are symmetric about the origin, so we only search for the non-positive half
    let half = (n + 1) / 2;
    let mut lower = Vec::with_capacity(half);
    for i in 0..half {
        // Chebyshev-like initial guess, ordered from -1 towards 0
        let mut x = -(PI * (i as f64 + 0.75) / (n as f64 + 0.5)).cos();
        let mut converged = false;
        for _ in 0..MAX_NEWTON_ITERATIONS {
            let legendre = Legendre::at(n, x);
            let dx = -legendre.value() / legendre.derivative();
            x += dx;
            if dx.abs() <= 1e-15 {
                converged = true;
                break;
            }
        }
        if !converged {
            return Err(Error::NoRuleAvailable);
        }
        let dp = Legendre::at(n, x).derivative();
        lower.push((x, 2.0 / ((1.0 - x * x) * dp * dp)));
    }

    let mut points = Vec::with_capacity(n);
    let mut weights = Vec::with_capacity(n);
    for &(x, w) in &lower {
        points.push([x]);
        weights.push(w);
    }
    // With an odd number of points the middle root is shared by both halves
    let mirrored = n - half;
    for &(x, w) in lower[..mirrored].iter().rev() {
        points.push([-x]);
        weights.push(w);
    }

    debug_assert_eq!(points.len(), n);
    Ok((weights, points))
}
