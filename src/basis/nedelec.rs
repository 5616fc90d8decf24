//! Lowest-order Nedelec (Whitney edge) functions.
//!
//! Functions are first built in native coordinates, where every reference domain is scaled to
//! `[0, 1]^d`, and then composed with the affine map onto the `[-1, 1]`-based reference
//! domain. The vector components are not rescaled, so each function has unit tangential
//! component along its edge, measured per unit of the edge parameter `ξ ∈ [-1, 1]` and directed
//! along the local edge.
use super::{native_to_reference, BasisFunction, FunctionRole};
use crate::element::{EntityKind, ReferenceElement};
use galerkin_polynomial::calculus::{scale_vector, subtract_vectors};
use galerkin_polynomial::{Polynomial, PolynomialVector};

/// Barycentric coordinates of the native simplex with vertices `0` and the unit vectors.
fn native_barycentric(dim: usize) -> Vec<Polynomial> {
    let coordinates: Vec<_> = (0..dim).map(Polynomial::variable).collect();
    let lambda0 = coordinates
        .iter()
        .fold(Polynomial::one(), |acc, x| &acc - x);
    let mut lambda = vec![lambda0];
    lambda.extend(coordinates);
    lambda
}

/// Whitney edge function `λa ∇λb - λb ∇λa`.
fn whitney(lambda: &[Polynomial], a: usize, b: usize) -> PolynomialVector {
    subtract_vectors(
        &scale_vector(&lambda[b].gradient(), &lambda[a]),
        &scale_vector(&lambda[a].gradient(), &lambda[b]),
    )
}

/// One-dimensional factor of the tensor-product vertex functions: `x` if the vertex sits at
/// `x = 1`, otherwise `1 - x`.
fn vertex_factor(native_coordinate: f64, dim: usize) -> Polynomial {
    let x = Polynomial::variable(dim);
    if native_coordinate > 0.5 {
        x
    } else {
        &Polynomial::one() - &x
    }
}

/// Edge functions on the quadrilateral, `0.5 (λa + λb) ∇(μb - μa)`, where `λ` are the bilinear
/// vertex functions and `μ` the additive lifting functions.
fn quadrilateral_edge_functions() -> Vec<PolynomialVector> {
    let reference = ReferenceElement::Quadrilateral;
    let native: Vec<[f64; 2]> = reference
        .vertices()
        .iter()
        .map(|v| [0.5 * (v[0] + 1.0), 0.5 * (v[1] + 1.0)])
        .collect();
    let lagrange: Vec<Polynomial> = native
        .iter()
        .map(|c| &vertex_factor(c[0], 0) * &vertex_factor(c[1], 1))
        .collect();
    let lifting: Vec<Polynomial> = native
        .iter()
        .map(|c| &vertex_factor(c[0], 0) + &vertex_factor(c[1], 1))
        .collect();

    reference
        .edges()
        .iter()
        .map(|&[a, b]| {
            let weight = &(&lagrange[a] + &lagrange[b]) * 0.5;
            scale_vector(&(&lifting[b] - &lifting[a]).gradient(), &weight)
        })
        .collect()
}

/// Nedelec edge functions in reference coordinates, or `None` if the element is not supported.
pub(super) fn nedelec_functions(reference: ReferenceElement) -> Option<(Vec<FunctionRole>, Vec<BasisFunction>)> {
    let native_functions: Vec<PolynomialVector> = match reference {
        ReferenceElement::Line | ReferenceElement::Triangle | ReferenceElement::Tetrahedron => {
            let lambda = native_barycentric(reference.dim());
            reference
                .edges()
                .iter()
                .map(|&[a, b]| whitney(&lambda, a, b))
                .collect()
        }
        ReferenceElement::Quadrilateral => quadrilateral_edge_functions(),
        ReferenceElement::Point | ReferenceElement::Hexahedron => return None,
    };

    let (roles, functions) = native_functions
        .into_iter()
        .enumerate()
        .map(|(e, [x, y, z]): (usize, PolynomialVector)| {
            let function = [native_to_reference(&x), native_to_reference(&y), native_to_reference(&z)];
            (FunctionRole::new(EntityKind::Edge, e, 0), BasisFunction::Vector(function))
        })
        .unzip();
    Some((roles, functions))
}
