//! Exact polynomial algebra in the three spatial variables `x`, `y` and `z`.
//!
//! The main purpose of this crate is to support basis construction in `galerkin`. It has no
//! dependency on the rest of the workspace, and may be used on its own.
//!
//! Polynomials are stored as canonical monomial lists: monomials are sorted by total degree
//! and then lexicographically by their exponents, like exponents are merged, and exact zeros are
//! dropped. The zero polynomial is represented by a single monomial with a zero coefficient,
//! which makes it distinct from the *empty* polynomial produced by [`Polynomial::empty`].

use std::fmt;
use std::fmt::{Display, Formatter};

pub mod calculus;
mod polynomial;

#[cfg(feature = "proptest-support")]
pub mod proptest;

pub use calculus::{curl, divergence, evaluate_vector, PolynomialVector};
pub use polynomial::*;

/// Library-wide error type.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// A polynomial was raised to a negative power.
    NegativePower(i32),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativePower(n) => {
                write!(f, "Cannot raise a polynomial to the negative power {}", n)
            }
        }
    }
}

impl std::error::Error for Error {}
