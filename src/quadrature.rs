//! Quadrature rules on reference elements, expressed in three-dimensional reference points.
use crate::element::ReferenceElement;
use galerkin_quadrature::simplex::{tetrahedron_collapsed_gauss, triangle_collapsed_gauss};
use galerkin_quadrature::tensor::{hexahedron_gauss, quadrilateral_gauss};
use galerkin_quadrature::univariate::gauss;
use galerkin_quadrature::{gauss_points_for_strength, Rule};
use nalgebra::Point3;

#[derive(Debug, Clone, PartialEq)]
pub struct QuadratureRule {
    weights: Vec<f64>,
    points: Vec<Point3<f64>>,
}

fn pad<const D: usize>((weights, points): Rule<D>) -> QuadratureRule {
    let points = points
        .into_iter()
        .map(|p| {
            let mut padded = Point3::origin();
            padded.coords.as_mut_slice()[..D].copy_from_slice(&p);
            padded
        })
        .collect();
    QuadratureRule { weights, points }
}

impl QuadratureRule {
    /// A rule that integrates polynomials of total degree `strength` exactly on the given
    /// reference element.
    pub fn for_element(reference: ReferenceElement, strength: usize) -> Self {
        // The collapsed simplex rules need one extra degree per collapsed direction
        let tensor_points = gauss_points_for_strength(strength);
        let simplex_points = gauss_points_for_strength(strength + 2);
        match reference {
            ReferenceElement::Point => Self {
                weights: vec![1.0],
                points: vec![Point3::origin()],
            },
            ReferenceElement::Line => pad(gauss(tensor_points)),
            ReferenceElement::Quadrilateral => pad(quadrilateral_gauss(tensor_points)),
            ReferenceElement::Hexahedron => pad(hexahedron_gauss(tensor_points)),
            ReferenceElement::Triangle => pad(triangle_collapsed_gauss(simplex_points)),
            ReferenceElement::Tetrahedron => pad(tetrahedron_collapsed_gauss(simplex_points)),
        }
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn points(&self) -> &[Point3<f64>] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, &Point3<f64>)> {
        self.weights.iter().copied().zip(&self.points)
    }

    /// Approximates the integral of `f` over the reference element.
    pub fn integrate(&self, f: impl Fn(&Point3<f64>) -> f64) -> f64 {
        self.iter().map(|(w, xi)| w * f(xi)).sum()
    }
}
