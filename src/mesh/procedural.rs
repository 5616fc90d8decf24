//! Basic procedural mesh generation routines.
//!
//! All generated meshes tag their volume (or surface, or line) elements with
//! [`DOMAIN_TAG`] and carry their boundary facets as additional elements tagged
//! [`BOUNDARY_TAG`].
use crate::element::ReferenceElement;
use crate::mesh::{Mesh, MeshElement};
use nalgebra::Point3;

pub const DOMAIN_TAG: usize = 1;
pub const BOUNDARY_TAG: usize = 2;

fn finish(vertices: Vec<Point3<f64>>, elements: Vec<MeshElement>) -> Mesh {
    Mesh::new(vertices, elements)
        .and_then(|mesh| mesh.with_boundary_elements(BOUNDARY_TAG))
        .expect("Internal error: procedural mesh must be valid")
}

/// The interval `[0, 1]` split into `cells` line elements.
///
/// # Panics
///
/// Panics if `cells` is zero.
pub fn create_unit_interval_mesh(cells: usize) -> Mesh {
    assert!(cells > 0, "number of cells must be positive");
    let h = 1.0 / cells as f64;
    let vertices = (0..=cells).map(|i| Point3::new(i as f64 * h, 0.0, 0.0)).collect();
    let elements = (0..cells)
        .map(|i| MeshElement::new(ReferenceElement::Line, vec![i, i + 1], DOMAIN_TAG))
        .collect();
    finish(vertices, elements)
}

fn unit_square_vertices(cells_per_dim: usize) -> Vec<Point3<f64>> {
    let n = cells_per_dim;
    let h = 1.0 / n as f64;
    let mut vertices = Vec::with_capacity((n + 1) * (n + 1));
    for j in 0..=n {
        for i in 0..=n {
            vertices.push(Point3::new(i as f64 * h, j as f64 * h, 0.0));
        }
    }
    vertices
}

/// Counter-clockwise vertex indices of the quadrilateral cell `(i, j)` in a square grid.
fn square_cell(cells_per_dim: usize, i: usize, j: usize) -> [usize; 4] {
    let index = |i, j| (cells_per_dim + 1) * j + i;
    [index(i, j), index(i + 1, j), index(i + 1, j + 1), index(i, j + 1)]
}

/// The unit square `[0, 1]^2` in the `z = 0` plane, split into quadrilaterals.
///
/// # Panics
///
/// Panics if `cells_per_dim` is zero.
pub fn create_unit_square_quad_mesh(cells_per_dim: usize) -> Mesh {
    assert!(cells_per_dim > 0, "number of cells must be positive");
    let n = cells_per_dim;
    let mut elements = Vec::with_capacity(n * n);
    for j in 0..n {
        for i in 0..n {
            let quad = square_cell(n, i, j).to_vec();
            elements.push(MeshElement::new(ReferenceElement::Quadrilateral, quad, DOMAIN_TAG));
        }
    }
    finish(unit_square_vertices(n), elements)
}

/// The unit square `[0, 1]^2` in the `z = 0` plane, with every grid cell split into two
/// triangles along its diagonal.
///
/// # Panics
///
/// Panics if `cells_per_dim` is zero.
pub fn create_unit_square_tri_mesh(cells_per_dim: usize) -> Mesh {
    assert!(cells_per_dim > 0, "number of cells must be positive");
    let n = cells_per_dim;
    let mut elements = Vec::with_capacity(2 * n * n);
    for j in 0..n {
        for i in 0..n {
            let [a, b, c, d] = square_cell(n, i, j);
            elements.push(MeshElement::new(ReferenceElement::Triangle, vec![a, b, c], DOMAIN_TAG));
            elements.push(MeshElement::new(ReferenceElement::Triangle, vec![a, c, d], DOMAIN_TAG));
        }
    }
    finish(unit_square_vertices(n), elements)
}

fn unit_box_vertices(cells_per_dim: usize) -> Vec<Point3<f64>> {
    let n = cells_per_dim;
    let h = 1.0 / n as f64;
    let mut vertices = Vec::with_capacity((n + 1).pow(3));
    for k in 0..=n {
        for j in 0..=n {
            for i in 0..=n {
                vertices.push(Point3::new(i as f64 * h, j as f64 * h, k as f64 * h));
            }
        }
    }
    vertices
}

fn box_vertex_index(cells_per_dim: usize, [i, j, k]: [usize; 3]) -> usize {
    let m = cells_per_dim + 1;
    i + m * (j + m * k)
}

/// The unit cube `[0, 1]^3` split into hexahedra.
///
/// # Panics
///
/// Panics if `cells_per_dim` is zero.
pub fn create_unit_box_hex_mesh(cells_per_dim: usize) -> Mesh {
    assert!(cells_per_dim > 0, "number of cells must be positive");
    let n = cells_per_dim;
    let mut elements = Vec::with_capacity(n * n * n);
    for k in 0..n {
        for j in 0..n {
            for i in 0..n {
                let hex = [
                    [i, j, k],
                    [i + 1, j, k],
                    [i + 1, j + 1, k],
                    [i, j + 1, k],
                    [i, j, k + 1],
                    [i + 1, j, k + 1],
                    [i + 1, j + 1, k + 1],
                    [i, j + 1, k + 1],
                ]
                .iter()
                .map(|&corner| box_vertex_index(n, corner))
                .collect();
                elements.push(MeshElement::new(ReferenceElement::Hexahedron, hex, DOMAIN_TAG));
            }
        }
    }
    finish(unit_box_vertices(n), elements)
}

/// The unit cube `[0, 1]^3` with every grid cell split into six tetrahedra sharing the main
/// diagonal of the cell (Kuhn subdivision), which makes the subdivision conforming.
///
/// # Panics
///
/// Panics if `cells_per_dim` is zero.
pub fn create_unit_box_tet_mesh(cells_per_dim: usize) -> Mesh {
    assert!(cells_per_dim > 0, "number of cells must be positive");
    const AXIS_PERMUTATIONS: [[usize; 3]; 6] = [[0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]];
    let n = cells_per_dim;
    let mut elements = Vec::with_capacity(6 * n * n * n);
    for k in 0..n {
        for j in 0..n {
            for i in 0..n {
                for permutation in AXIS_PERMUTATIONS {
                    // Walk from the lowest to the highest corner, one axis at a time
                    let mut corner = [i, j, k];
                    let mut tet = vec![box_vertex_index(n, corner)];
                    for axis in permutation {
                        corner[axis] += 1;
                        tet.push(box_vertex_index(n, corner));
                    }
                    elements.push(MeshElement::new(ReferenceElement::Tetrahedron, tet, DOMAIN_TAG));
                }
            }
        }
    }
    finish(unit_box_vertices(n), elements)
}
