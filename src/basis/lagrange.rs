use super::{BasisFunction, FunctionRole};
use crate::element::{EntityKind, ReferenceElement};
use galerkin_polynomial::Polynomial;

/// Lagrange polynomial in variable `dim` that is one at `node` and zero at the other `nodes`.
fn lagrange_1d(nodes: &[f64], node: f64, dim: usize) -> Polynomial {
    let t = Polynomial::variable(dim);
    nodes
        .iter()
        .filter(|&&other| other != node)
        .fold(Polynomial::one(), |product, &other| {
            let factor = &(&t - &Polynomial::constant(other)) * (1.0 / (node - other));
            &product * &factor
        })
}

fn tensor_lagrange(reference: ReferenceElement, order: usize) -> (Vec<FunctionRole>, Vec<BasisFunction>) {
    let dim = reference.dim();
    let nodes_1d: &[f64] = if order == 1 { &[-1.0, 1.0] } else { &[-1.0, 0.0, 1.0] };
    let vertices = reference.vertices();
    let centroid = |local: &[usize]| -> [f64; 3] {
        let mut c = [0.0; 3];
        for &v in local {
            for d in 0..3 {
                c[d] += vertices[v][d] / local.len() as f64;
            }
        }
        c
    };

    let mut nodes = Vec::new();
    for v in 0..reference.num_vertices() {
        nodes.push((FunctionRole::new(EntityKind::Vertex, v, 0), vertices[v]));
    }
    if order == 2 {
        for (e, edge) in reference.edges().iter().enumerate() {
            nodes.push((FunctionRole::new(EntityKind::Edge, e, 0), centroid(&edge[..])));
        }
        for (f, face) in reference.faces().iter().enumerate() {
            nodes.push((FunctionRole::new(EntityKind::Face, f, 0), centroid(&face[..])));
        }
        if dim == 3 {
            nodes.push((FunctionRole::new(EntityKind::Cell, 0, 0), [0.0; 3]));
        }
    }

    nodes
        .into_iter()
        .map(|(role, coords)| {
            let function = (0..dim).fold(Polynomial::one(), |product, d| {
                &product * &lagrange_1d(nodes_1d, coords[d], d)
            });
            (role, BasisFunction::Scalar(function))
        })
        .unzip()
}

/// Barycentric coordinates of the reference triangle or tetrahedron.
fn barycentric(reference: ReferenceElement) -> Vec<Polynomial> {
    let one = Polynomial::one();
    let dim = reference.dim();
    // λ_d = (1 + ξ_d) / 2 for d = 1..=dim, and λ_0 = 1 - Σ λ_d
    let mut lambdas: Vec<Polynomial> = (0..dim)
        .map(|d| &(&one + &Polynomial::variable(d)) * 0.5)
        .collect();
    let lambda0 = lambdas.iter().fold(one.clone(), |acc, lambda| &acc - lambda);
    lambdas.insert(0, lambda0);
    lambdas
}

fn simplex_lagrange(reference: ReferenceElement, order: usize) -> (Vec<FunctionRole>, Vec<BasisFunction>) {
    let lambda = barycentric(reference);
    let mut roles = Vec::new();
    let mut functions = Vec::new();

    for (v, lambda_v) in lambda.iter().enumerate() {
        roles.push(FunctionRole::new(EntityKind::Vertex, v, 0));
        let function = match order {
            1 => lambda_v.clone(),
            _ => lambda_v * &(&(lambda_v * 2.0) - &Polynomial::one()),
        };
        functions.push(BasisFunction::Scalar(function));
    }
    if order == 2 {
        for (e, &[a, b]) in reference.edges().iter().enumerate() {
            roles.push(FunctionRole::new(EntityKind::Edge, e, 0));
            functions.push(BasisFunction::Scalar(&(&lambda[a] * &lambda[b]) * 4.0));
        }
    }
    (roles, functions)
}

/// Nodal Lagrange functions of order 1 or 2, or `None` if the order is not available.
///
/// Functions are ordered by role: vertices, then edges, then faces, then the cell.
pub(super) fn lagrange_functions(
    reference: ReferenceElement,
    order: usize,
) -> Option<(Vec<FunctionRole>, Vec<BasisFunction>)> {
    if !(1..=2).contains(&order) {
        return None;
    }
    let functions = match reference {
        ReferenceElement::Point => (
            vec![FunctionRole::new(EntityKind::Vertex, 0, 0)],
            vec![BasisFunction::Scalar(Polynomial::one())],
        ),
        ReferenceElement::Line | ReferenceElement::Quadrilateral | ReferenceElement::Hexahedron => {
            tensor_lagrange(reference, order)
        }
        ReferenceElement::Triangle | ReferenceElement::Tetrahedron => simplex_lagrange(reference, order),
    };
    Some(functions)
}
