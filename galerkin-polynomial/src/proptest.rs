//! Strategies for property-based testing with `proptest`.
//!
//! Coefficients are small integers so that arithmetic on generated polynomials stays exact.
use crate::{Monomial, Polynomial, PolynomialVector};
use ::proptest::array::uniform3;
use ::proptest::collection::vec;
use ::proptest::prelude::*;

pub fn monomial(max_power: u32) -> impl Strategy<Value = Monomial> {
    let coefficient = (-8i32..=8).prop_map(f64::from);
    (coefficient, uniform3(0..=max_power)).prop_map(|(c, powers)| Monomial::new(c, powers))
}

pub fn polynomial(max_terms: usize, max_power: u32) -> impl Strategy<Value = Polynomial> {
    vec(monomial(max_power), 1..=max_terms).prop_map(Polynomial::from_monomials)
}

pub fn polynomial_vector(max_terms: usize, max_power: u32) -> impl Strategy<Value = PolynomialVector> {
    uniform3(polynomial(max_terms, max_power))
}

/// Points in the cube `[-2, 2]^3`.
pub fn point() -> impl Strategy<Value = [f64; 3]> {
    uniform3(-2.0..=2.0f64)
}

/// Points with small integer coordinates in `[-3, 3]^3`.
///
/// Evaluating generated polynomials at such points involves no rounding.
pub fn lattice_point() -> impl Strategy<Value = [f64; 3]> {
    uniform3((-3i32..=3).prop_map(f64::from))
}
