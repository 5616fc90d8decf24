//! Quadrature rules for the `galerkin` reference elements.
//!
//! All reference domains are built from the interval `[-1, 1]`:
//!
//! - the segment is `[-1, 1]`,
//! - the quadrilateral and hexahedron are `[-1, 1]^2` and `[-1, 1]^3`,
//! - the triangle has vertices `(-1, -1)`, `(1, -1)`, `(-1, 1)`,
//! - the tetrahedron has vertices `(-1, -1, -1)`, `(1, -1, -1)`, `(-1, 1, -1)`, `(-1, -1, 1)`.
//!
//! Rules for the quadrilateral and hexahedron are tensor products of Gauss rules. Rules for
//! simplices are obtained by collapsing the corresponding tensor product rule onto the simplex.

use std::fmt;
use std::fmt::{Display, Formatter};

pub mod simplex;
pub mod tensor;
pub mod univariate;

/// Library-wide error type.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// Indicates that a rule satisfying the given requirements is not available.
    NoRuleAvailable,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoRuleAvailable => {
                write!(f, "There is no quadrature rule satisfying the requirements available")
            }
        }
    }
}

impl std::error::Error for Error {}

/// A D-dimensional point.
pub type Point<const D: usize> = [f64; D];

/// A D-dimensional rule, given as weights and points.
pub type Rule<const D: usize> = (Vec<f64>, Vec<Point<D>>);

/// Approximates the integral of `f` with the given rule.
pub fn integrate<const D: usize>(rule: &Rule<D>, f: impl Fn(&Point<D>) -> f64) -> f64 {
    let (weights, points) = rule;
    weights.iter().zip(points).map(|(w, x)| w * f(x)).sum()
}

/// Number of points per dimension needed for a Gauss rule to integrate polynomials of
/// degree `strength` exactly along each dimension.
pub fn gauss_points_for_strength(strength: usize) -> usize {
    strength / 2 + 1
}
