//! Reference elements and the geometric map from reference to physical coordinates.
//!
//! Every reference domain is built from the interval `[-1, 1]`. The tables of local edges and
//! faces fix the local numbering that bases and meshes agree on.
use nalgebra::{DMatrix, DVector, Matrix3xX, Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::{Display, Formatter};

/// The kind of geometric entity a degree of freedom is attached to.
///
/// The derived order (vertices before edges before faces before cells) is the order in which
/// degrees of freedom are numbered.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Vertex,
    Edge,
    Face,
    Cell,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReferenceElement {
    Point,
    Line,
    Triangle,
    Quadrilateral,
    Tetrahedron,
    Hexahedron,
}

const POINT_VERTICES: &[[f64; 3]] = &[[0.0, 0.0, 0.0]];
const LINE_VERTICES: &[[f64; 3]] = &[[-1.0, 0.0, 0.0], [1.0, 0.0, 0.0]];
const TRIANGLE_VERTICES: &[[f64; 3]] = &[[-1.0, -1.0, 0.0], [1.0, -1.0, 0.0], [-1.0, 1.0, 0.0]];
const QUADRILATERAL_VERTICES: &[[f64; 3]] = &[
    [-1.0, -1.0, 0.0],
    [1.0, -1.0, 0.0],
    [1.0, 1.0, 0.0],
    [-1.0, 1.0, 0.0],
];
const TETRAHEDRON_VERTICES: &[[f64; 3]] = &[
    [-1.0, -1.0, -1.0],
    [1.0, -1.0, -1.0],
    [-1.0, 1.0, -1.0],
    [-1.0, -1.0, 1.0],
];
const HEXAHEDRON_VERTICES: &[[f64; 3]] = &[
    [-1.0, -1.0, -1.0],
    [1.0, -1.0, -1.0],
    [1.0, 1.0, -1.0],
    [-1.0, 1.0, -1.0],
    [-1.0, -1.0, 1.0],
    [1.0, -1.0, 1.0],
    [1.0, 1.0, 1.0],
    [-1.0, 1.0, 1.0],
];

const LINE_EDGES: &[[usize; 2]] = &[[0, 1]];
const TRIANGLE_EDGES: &[[usize; 2]] = &[[0, 1], [1, 2], [2, 0]];
const QUADRILATERAL_EDGES: &[[usize; 2]] = &[[0, 1], [1, 2], [2, 3], [3, 0]];
const TETRAHEDRON_EDGES: &[[usize; 2]] = &[[0, 1], [1, 2], [2, 0], [0, 3], [1, 3], [2, 3]];
const HEXAHEDRON_EDGES: &[[usize; 2]] = &[
    [0, 1],
    [1, 2],
    [2, 3],
    [3, 0],
    [4, 5],
    [5, 6],
    [6, 7],
    [7, 4],
    [0, 4],
    [1, 5],
    [2, 6],
    [3, 7],
];

const TRIANGLE_FACES: &[&[usize]] = &[&[0, 1, 2]];
const QUADRILATERAL_FACES: &[&[usize]] = &[&[0, 1, 2, 3]];
const TETRAHEDRON_FACES: &[&[usize]] = &[&[0, 2, 1], &[0, 1, 3], &[1, 2, 3], &[0, 3, 2]];
const HEXAHEDRON_FACES: &[&[usize]] = &[
    &[0, 3, 2, 1],
    &[0, 1, 5, 4],
    &[1, 2, 6, 5],
    &[2, 3, 7, 6],
    &[0, 4, 7, 3],
    &[4, 5, 6, 7],
];

impl ReferenceElement {
    /// Topological dimension of the element.
    pub fn dim(&self) -> usize {
        match self {
            Self::Point => 0,
            Self::Line => 1,
            Self::Triangle | Self::Quadrilateral => 2,
            Self::Tetrahedron | Self::Hexahedron => 3,
        }
    }

    /// Whether the element is a simplex (point, line, triangle or tetrahedron).
    pub fn is_simplex(&self) -> bool {
        matches!(self, Self::Point | Self::Line | Self::Triangle | Self::Tetrahedron)
    }

    /// Reference coordinates of the vertices, padded with zeros to three components.
    pub fn vertices(&self) -> &'static [[f64; 3]] {
        match self {
            Self::Point => POINT_VERTICES,
            Self::Line => LINE_VERTICES,
            Self::Triangle => TRIANGLE_VERTICES,
            Self::Quadrilateral => QUADRILATERAL_VERTICES,
            Self::Tetrahedron => TETRAHEDRON_VERTICES,
            Self::Hexahedron => HEXAHEDRON_VERTICES,
        }
    }

    /// Local edges, each given by a pair of local vertex indices.
    pub fn edges(&self) -> &'static [[usize; 2]] {
        match self {
            Self::Point => &[],
            Self::Line => LINE_EDGES,
            Self::Triangle => TRIANGLE_EDGES,
            Self::Quadrilateral => QUADRILATERAL_EDGES,
            Self::Tetrahedron => TETRAHEDRON_EDGES,
            Self::Hexahedron => HEXAHEDRON_EDGES,
        }
    }

    /// Local faces, each given by its local vertex indices.
    ///
    /// A triangle or quadrilateral has itself as its only face.
    pub fn faces(&self) -> &'static [&'static [usize]] {
        match self {
            Self::Point | Self::Line => &[],
            Self::Triangle => TRIANGLE_FACES,
            Self::Quadrilateral => QUADRILATERAL_FACES,
            Self::Tetrahedron => TETRAHEDRON_FACES,
            Self::Hexahedron => HEXAHEDRON_FACES,
        }
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices().len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges().len()
    }

    pub fn num_faces(&self) -> usize {
        self.faces().len()
    }

    /// Number of edge orientation variants, one per combination of local edge directions.
    pub fn num_orientations(&self) -> usize {
        1 << self.num_edges()
    }

    /// The kind of entity that the interior of the element corresponds to.
    ///
    /// Lines are edges and triangles/quadrilaterals are faces, so that interior degrees of
    /// freedom of lower-dimensional elements coincide with those of the volume elements they
    /// bound.
    pub fn interior_entity(&self) -> EntityKind {
        match self.dim() {
            0 => EntityKind::Vertex,
            1 => EntityKind::Edge,
            2 => EntityKind::Face,
            _ => EntityKind::Cell,
        }
    }

    /// The element type of the facets (sub-entities of dimension `dim - 1`), if any.
    pub fn facet_type(&self) -> Option<ReferenceElement> {
        match self {
            Self::Point => None,
            Self::Line => Some(Self::Point),
            Self::Triangle | Self::Quadrilateral => Some(Self::Line),
            Self::Tetrahedron => Some(Self::Triangle),
            Self::Hexahedron => Some(Self::Quadrilateral),
        }
    }

    /// Local vertex indices of each facet.
    pub fn facets(&self) -> Vec<Vec<usize>> {
        match self.dim() {
            0 => Vec::new(),
            1 => vec![vec![0], vec![1]],
            2 => self.edges().iter().map(|edge| edge.to_vec()).collect(),
            _ => self.faces().iter().map(|face| face.to_vec()).collect(),
        }
    }

    /// Values of the (multi-)linear vertex shape functions at the given reference point.
    pub fn vertex_shape_functions(&self, xi: &Point3<f64>) -> Vec<f64> {
        match self {
            Self::Point => vec![1.0],
            Self::Triangle => {
                let (u, v) = (xi.x, xi.y);
                vec![-0.5 * (u + v), 0.5 * (1.0 + u), 0.5 * (1.0 + v)]
            }
            Self::Tetrahedron => {
                let (u, v, w) = (xi.x, xi.y, xi.z);
                vec![
                    -0.5 * (1.0 + u + v + w),
                    0.5 * (1.0 + u),
                    0.5 * (1.0 + v),
                    0.5 * (1.0 + w),
                ]
            }
            Self::Line | Self::Quadrilateral | Self::Hexahedron => {
                let dim = self.dim();
                self.vertices()
                    .iter()
                    .map(|vertex| (0..dim).map(|d| 0.5 * (1.0 + vertex[d] * xi[d])).product())
                    .collect()
            }
        }
    }

    /// Reference gradients of the vertex shape functions, one row per reference dimension and
    /// one column per vertex.
    pub fn vertex_shape_gradients(&self, xi: &Point3<f64>) -> DMatrix<f64> {
        let dim = self.dim();
        let n = self.num_vertices();
        match self {
            Self::Point => DMatrix::zeros(0, 1),
            Self::Triangle => DMatrix::from_row_slice(2, 3, &[-0.5, 0.5, 0.0, -0.5, 0.0, 0.5]),
            Self::Tetrahedron => DMatrix::from_row_slice(
                3,
                4,
                &[-0.5, 0.5, 0.0, 0.0, -0.5, 0.0, 0.5, 0.0, -0.5, 0.0, 0.0, 0.5],
            ),
            Self::Line | Self::Quadrilateral | Self::Hexahedron => DMatrix::from_fn(dim, n, |d, i| {
                let vertex = &self.vertices()[i];
                (0..dim)
                    .map(|k| {
                        if k == d {
                            0.5 * vertex[k]
                        } else {
                            0.5 * (1.0 + vertex[k] * xi[k])
                        }
                    })
                    .product()
            }),
        }
    }
}

impl Display for ReferenceElement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Point => "point",
            Self::Line => "line",
            Self::Triangle => "triangle",
            Self::Quadrilateral => "quadrilateral",
            Self::Tetrahedron => "tetrahedron",
            Self::Hexahedron => "hexahedron",
        };
        write!(f, "{}", name)
    }
}

/// The isoparametric (P1/Q1) map of a single mesh element.
///
/// Elements may be embedded in a space of higher dimension than their own, e.g. a triangle in
/// 3D. The Jacobian is therefore a `3 x dim` matrix, and quantities that would normally
/// require its inverse are expressed through the metric `JᵀJ` instead.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementGeometry {
    reference: ReferenceElement,
    vertices: Vec<Point3<f64>>,
}

impl ElementGeometry {
    /// # Panics
    ///
    /// Panics if the number of vertices does not match the reference element.
    pub fn new(reference: ReferenceElement, vertices: Vec<Point3<f64>>) -> Self {
        assert_eq!(
            vertices.len(),
            reference.num_vertices(),
            "number of vertices must match the reference element"
        );
        Self { reference, vertices }
    }

    pub fn reference(&self) -> ReferenceElement {
        self.reference
    }

    pub fn vertices(&self) -> &[Point3<f64>] {
        &self.vertices
    }

    pub fn map_reference_coords(&self, xi: &Point3<f64>) -> Point3<f64> {
        let phi = self.reference.vertex_shape_functions(xi);
        let mut x = Vector3::zeros();
        for (phi_i, vertex) in phi.iter().zip(&self.vertices) {
            x += *phi_i * vertex.coords;
        }
        Point3::from(x)
    }

    /// The Jacobian `dx/dξ` as a `3 x dim` matrix.
    pub fn reference_jacobian(&self, xi: &Point3<f64>) -> Matrix3xX<f64> {
        let gradients = self.reference.vertex_shape_gradients(xi);
        let dim = self.reference.dim();
        let mut jacobian = Matrix3xX::zeros(dim);
        for (i, vertex) in self.vertices.iter().enumerate() {
            for d in 0..dim {
                let mut column = jacobian.column_mut(d);
                column += gradients[(d, i)] * vertex.coords;
            }
        }
        jacobian
    }

    /// The measure density `sqrt(det(JᵀJ))` at the given reference point.
    pub fn measure(&self, xi: &Point3<f64>) -> f64 {
        measure_from_jacobian(&self.reference_jacobian(xi))
    }

    /// The covariant map `J (JᵀJ)⁻¹`, or `None` if the element is degenerate at `xi`.
    pub fn covariant(&self, xi: &Point3<f64>) -> Option<Matrix3xX<f64>> {
        covariant_from_jacobian(&self.reference_jacobian(xi))
    }
}

pub(crate) fn measure_from_jacobian(jacobian: &Matrix3xX<f64>) -> f64 {
    if jacobian.ncols() == 0 {
        return 1.0;
    }
    let metric = jacobian.tr_mul(jacobian);
    metric.determinant().max(0.0).sqrt()
}

pub(crate) fn covariant_from_jacobian(jacobian: &Matrix3xX<f64>) -> Option<Matrix3xX<f64>> {
    if jacobian.ncols() == 0 {
        return Some(Matrix3xX::zeros(0));
    }
    let metric = jacobian.tr_mul(jacobian);
    if metric.determinant() <= 0.0 {
        return None;
    }
    let inverse = metric.try_inverse()?;
    Some(jacobian * inverse)
}

/// Maps a vector given in reference coordinates to physical coordinates with the covariant map.
pub(crate) fn apply_covariant(covariant: &Matrix3xX<f64>, reference_vector: &Vector3<f64>) -> Vector3<f64> {
    let dim = covariant.ncols();
    let truncated = DVector::from_column_slice(&reference_vector.as_slice()[..dim]);
    covariant * truncated
}
