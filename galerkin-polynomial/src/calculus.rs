//! Vector calculus on triples of polynomials.
use crate::Polynomial;

/// A vector-valued polynomial, one component per spatial dimension.
pub type PolynomialVector = [Polynomial; 3];

/// The curl `∇ × v` of a polynomial vector field.
pub fn curl(v: &PolynomialVector) -> PolynomialVector {
    [
        v[2].derivative(1) - v[1].derivative(2),
        v[0].derivative(2) - v[2].derivative(0),
        v[1].derivative(0) - v[0].derivative(1),
    ]
}

/// The divergence `∇ · v` of a polynomial vector field.
pub fn divergence(v: &PolynomialVector) -> Polynomial {
    v[0].derivative(0) + v[1].derivative(1) + v[2].derivative(2)
}

pub fn evaluate_vector(v: &PolynomialVector, x: f64, y: f64, z: f64) -> [f64; 3] {
    [v[0].evaluate(x, y, z), v[1].evaluate(x, y, z), v[2].evaluate(x, y, z)]
}

/// Multiplies each component of `v` by the scalar polynomial `p`.
pub fn scale_vector(v: &PolynomialVector, p: &Polynomial) -> PolynomialVector {
    [&v[0] * p, &v[1] * p, &v[2] * p]
}

pub fn add_vectors(a: &PolynomialVector, b: &PolynomialVector) -> PolynomialVector {
    [&a[0] + &b[0], &a[1] + &b[1], &a[2] + &b[2]]
}

pub fn subtract_vectors(a: &PolynomialVector, b: &PolynomialVector) -> PolynomialVector {
    [&a[0] - &b[0], &a[1] - &b[1], &a[2] - &b[2]]
}

/// Applies `P(Q, R, S)` composition to every component of `v`.
pub fn compose_vector(v: &PolynomialVector, q: &Polynomial, r: &Polynomial, s: &Polynomial) -> PolynomialVector {
    [v[0].compose3(q, r, s), v[1].compose3(q, r, s), v[2].compose3(q, r, s)]
}

pub fn zero_vector() -> PolynomialVector {
    [Polynomial::zero(), Polynomial::zero(), Polynomial::zero()]
}
