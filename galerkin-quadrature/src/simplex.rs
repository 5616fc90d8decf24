//! Collapsed Gauss rules for the reference triangle and tetrahedron.
//!
//! A tensor-product rule on `[-1, 1]^d` is mapped onto the simplex with the Duffy transform,
//! which collapses one face of the cube onto a vertex. The weights absorb the Jacobian
//! determinant of the transform, so all weights remain positive.

use crate::univariate::gauss;
use crate::Rule;

/// Collapsed Gauss rule for the reference triangle with `num_points_per_dim` points along
/// each collapsed direction.
///
/// The rule integrates polynomials of total degree up to `2n - 2` exactly, where `n` is the
/// number of points per dimension.
pub fn triangle_collapsed_gauss(num_points_per_dim: usize) -> Rule<2> {
    let (weights1d, points1d) = gauss(num_points_per_dim);
    let mut weights = Vec::new();
    let mut points = Vec::new();
    for (wa, [a]) in weights1d.iter().zip(&points1d) {
        for (wb, [b]) in weights1d.iter().zip(&points1d) {
            let u = 0.5 * (1.0 + a) * (1.0 - b) - 1.0;
            let v = *b;
            weights.push(wa * wb * 0.5 * (1.0 - b));
            points.push([u, v]);
        }
    }
    (weights, points)
}

/// Collapsed Gauss rule for the reference tetrahedron with `num_points_per_dim` points along
/// each collapsed direction.
///
/// The rule integrates polynomials of total degree up to `2n - 3` exactly, where `n` is the
/// number of points per dimension.
pub fn tetrahedron_collapsed_gauss(num_points_per_dim: usize) -> Rule<3> {
    let (weights1d, points1d) = gauss(num_points_per_dim);
    let mut weights = Vec::new();
    let mut points = Vec::new();
    for (wa, [a]) in weights1d.iter().zip(&points1d) {
        for (wb, [b]) in weights1d.iter().zip(&points1d) {
            for (wc, [c]) in weights1d.iter().zip(&points1d) {
                let u = 0.25 * (1.0 + a) * (1.0 - b) * (1.0 - c) - 1.0;
                let v = 0.5 * (1.0 + b) * (1.0 - c) - 1.0;
                let w = *c;
                let jacobian = 0.125 * (1.0 - b) * (1.0 - c) * (1.0 - c);
                weights.push(wa * wb * wc * jacobian);
                points.push([u, v, w]);
            }
        }
    }
    (weights, points)
}
