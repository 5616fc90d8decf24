//! Tensor-product Gauss rules for the reference quadrilateral and hexahedron.

use crate::univariate::gauss;
use crate::Rule;

/// Gauss rule for `[-1, 1]^2` with `num_points_per_dim` points in each direction.
pub fn quadrilateral_gauss(num_points_per_dim: usize) -> Rule<2> {
    let (weights1d, points1d) = gauss(num_points_per_dim);
    let mut weights = Vec::new();
    let mut points = Vec::new();
    for (wx, [x]) in weights1d.iter().zip(&points1d) {
        for (wy, [y]) in weights1d.iter().zip(&points1d) {
            weights.push(wx * wy);
            points.push([*x, *y]);
        }
    }
    (weights, points)
}

/// Gauss rule for `[-1, 1]^3` with `num_points_per_dim` points in each direction.
pub fn hexahedron_gauss(num_points_per_dim: usize) -> Rule<3> {
    let (weights2d, points2d) = quadrilateral_gauss(num_points_per_dim);
    let (weights1d, points1d) = gauss(num_points_per_dim);
    let mut weights = Vec::new();
    let mut points = Vec::new();
    for (wxy, [x, y]) in weights2d.iter().zip(&points2d) {
        for (wz, [z]) in weights1d.iter().zip(&points1d) {
            weights.push(wxy * wz);
            points.push([*x, *y, *z]);
        }
    }
    (weights, points)
}
