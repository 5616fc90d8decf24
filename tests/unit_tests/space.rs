use galerkin::basis::Basis;
use galerkin::element::{EntityKind, ReferenceElement};
use galerkin::error::Error;
use galerkin::mesh::procedural::{
    create_unit_square_quad_mesh, create_unit_square_tri_mesh, BOUNDARY_TAG, DOMAIN_TAG,
};
use galerkin::mesh::{Mesh, Support};
use galerkin::nalgebra::{Point3, Vector3};
use galerkin::space::{Dof, FunctionSpace, GroupIdAllocator};
use matrixcompare::assert_scalar_eq;
use std::collections::BTreeSet;

fn domain(mesh: &Mesh) -> Support {
    Support::from_tags(mesh, &[DOMAIN_TAG]).unwrap()
}

/// Coefficients of a vertex-based space sampled from a function of the vertex positions.
fn vertex_coefficients(space: &FunctionSpace, element: usize, f: impl Fn(&Point3<f64>) -> f64) -> Vec<f64> {
    space
        .keys_of_element(element)
        .unwrap()
        .iter()
        .map(|dof| {
            assert_eq!(dof.kind(), EntityKind::Vertex);
            f(&space.mesh().vertices()[dof.entity()])
        })
        .collect()
}

#[test]
fn linear_space_has_one_dof_per_vertex() {
    let mesh = create_unit_square_tri_mesh(2);
    let mut ids = GroupIdAllocator::new();
    let space = FunctionSpace::new(domain(&mesh), Basis::lagrange(ReferenceElement::Triangle, 1).unwrap(), &mut ids)
        .unwrap();

    assert_eq!(space.num_dofs(), 9);
    assert_eq!(space.num_groups(), 8);
    assert!(space.is_scalar());
    assert!(space.groups().iter().all(|group| group.len() == 3));
    assert_eq!(space.keys_of_vertex(4), vec![Dof::new(EntityKind::Vertex, 4, 0)]);
    assert!(space.keys_of_edge(0).is_empty());
}

#[test]
fn quadratic_space_shares_edge_dofs() {
    let mesh = create_unit_square_quad_mesh(2);
    let mut ids = GroupIdAllocator::new();
    let basis = Basis::lagrange(ReferenceElement::Quadrilateral, 2).unwrap();
    let space = FunctionSpace::new(domain(&mesh), basis, &mut ids).unwrap();

    // 9 vertices, 12 edges, 4 faces
    assert_eq!(space.num_dofs(), 25);

    let shared = mesh.find_edge(1, 4).unwrap();
    let edge_dofs = space.keys_of_edge(shared);
    assert_eq!(edge_dofs, vec![Dof::new(EntityKind::Edge, shared, 0)]);
    assert!(space.keys_of_element(0).unwrap().contains(&edge_dofs[0]));
    assert!(space.keys_of_element(1).unwrap().contains(&edge_dofs[0]));
    assert!(!space.keys_of_element(2).unwrap().contains(&edge_dofs[0]));

    let face = mesh.element_faces(3)[0];
    assert_eq!(space.keys_of_face(face).len(), 1);
}

#[test]
fn nedelec_space_has_one_dof_per_edge() {
    let mesh = create_unit_square_tri_mesh(2);
    let mut ids = GroupIdAllocator::new();
    let space = FunctionSpace::new(domain(&mesh), Basis::nedelec(ReferenceElement::Triangle, 1).unwrap(), &mut ids)
        .unwrap();
    assert_eq!(space.num_dofs(), mesh.num_edges());
    assert!(!space.is_scalar());
    assert!(space.dofs().iter().all(|dof| dof.kind() == EntityKind::Edge));
}

#[test]
fn group_ids_come_from_the_shared_allocator() {
    let mesh = create_unit_square_quad_mesh(2);
    let mut ids = GroupIdAllocator::new();
    let basis = Basis::lagrange(ReferenceElement::Quadrilateral, 1).unwrap();
    let first = FunctionSpace::new(domain(&mesh), basis.clone(), &mut ids).unwrap();
    let second = FunctionSpace::new(domain(&mesh), basis, &mut ids).unwrap();

    let all_ids: BTreeSet<usize> = first
        .groups()
        .iter()
        .chain(second.groups())
        .map(|group| group.id())
        .collect();
    assert_eq!(all_ids.len(), 8);
    assert_eq!(ids.num_allocated(), 8);
    assert_eq!(second.groups()[0].id(), 4);
}

#[test]
fn element_lookups() {
    let mesh = create_unit_square_quad_mesh(2);
    let mut ids = GroupIdAllocator::new();
    let space = FunctionSpace::new(
        Support::new(&mesh, vec![3, 1]).unwrap(),
        Basis::lagrange(ReferenceElement::Quadrilateral, 1).unwrap(),
        &mut ids,
    )
    .unwrap();

    assert_eq!(space.group_index_of_element(3), Some(0));
    assert_eq!(space.group_of_element(1).unwrap().element(), 1);
    assert!(space.group_of_element(0).is_none());
    assert_eq!(space.keys_of_element(0).unwrap_err(), Error::ElementNotInSupport(0));
    assert_eq!(space.keys_of_element(1).unwrap().len(), 4);
}

#[test]
fn basis_must_match_support() {
    let mesh = create_unit_square_quad_mesh(1);
    let mut ids = GroupIdAllocator::new();
    let result = FunctionSpace::new(domain(&mesh), Basis::lagrange(ReferenceElement::Triangle, 1).unwrap(), &mut ids);
    assert_eq!(
        result.unwrap_err(),
        Error::ElementTypeMismatch {
            expected: ReferenceElement::Triangle,
            found: ReferenceElement::Quadrilateral
        }
    );
}

#[test]
fn keys_of_closure() {
    let mesh = create_unit_square_quad_mesh(2);
    let mut ids = GroupIdAllocator::new();
    let space = FunctionSpace::new(domain(&mesh), Basis::lagrange(ReferenceElement::Quadrilateral, 2).unwrap(), &mut ids)
        .unwrap();
    let boundary = Support::from_tags(&mesh, &[BOUNDARY_TAG]).unwrap();
    // 8 boundary vertices and 8 boundary edges
    assert_eq!(space.keys_of_closure(&boundary).unwrap().len(), 16);

    let other_mesh = create_unit_square_quad_mesh(2);
    let other = Support::all(&other_mesh).unwrap();
    assert_eq!(space.keys_of_closure(&other).unwrap_err(), Error::ForeignMesh);
}

#[test]
fn linear_interpolation_is_exact_for_affine_functions() {
    let mesh = create_unit_square_tri_mesh(2);
    let mut ids = GroupIdAllocator::new();
    let space = FunctionSpace::new(domain(&mesh), Basis::lagrange(ReferenceElement::Triangle, 1).unwrap(), &mut ids)
        .unwrap();
    let f = |x: &Point3<f64>| 1.0 + 2.0 * x.x - 3.0 * x.y;

    let xi = Point3::new(-0.4, -0.2, 0.0);
    for group in space.groups() {
        let element = group.element();
        let coefficients = vertex_coefficients(&space, element, f);
        let x = mesh.geometry(element).map_reference_coords(&xi);

        let value = space.interpolate_scalar(element, &coefficients, &xi).unwrap();
        assert_scalar_eq!(value, f(&x), comp = abs, tol = 1e-13);

        let gradient = space
            .interpolate_scalar_gradient(element, &coefficients, &xi)
            .unwrap();
        assert_scalar_eq!(gradient.x, 2.0, comp = abs, tol = 1e-12);
        assert_scalar_eq!(gradient.y, -3.0, comp = abs, tol = 1e-12);
        assert_scalar_eq!(gradient.z, 0.0, comp = abs, tol = 1e-12);
    }
}

#[test]
fn bilinear_interpolation_reproduces_bilinear_functions() {
    let mesh = create_unit_square_quad_mesh(3);
    let mut ids = GroupIdAllocator::new();
    let space = FunctionSpace::new(domain(&mesh), Basis::lagrange(ReferenceElement::Quadrilateral, 1).unwrap(), &mut ids)
        .unwrap();
    let f = |x: &Point3<f64>| x.x * x.y;

    let xi = Point3::new(0.3, -0.7, 0.0);
    for group in space.groups() {
        let element = group.element();
        let coefficients = vertex_coefficients(&space, element, f);
        let x = mesh.geometry(element).map_reference_coords(&xi);
        let value = space.interpolate_scalar(element, &coefficients, &xi).unwrap();
        assert_scalar_eq!(value, f(&x), comp = abs, tol = 1e-13);
        let gradient = space
            .interpolate_scalar_gradient(element, &coefficients, &xi)
            .unwrap();
        assert_scalar_eq!(gradient.x, x.y, comp = abs, tol = 1e-12);
        assert_scalar_eq!(gradient.y, x.x, comp = abs, tol = 1e-12);
    }
}

#[test]
fn nedelec_interpolation_is_tangentially_continuous() {
    let mesh = create_unit_square_tri_mesh(3);
    let mut ids = GroupIdAllocator::new();
    let space = FunctionSpace::new(domain(&mesh), Basis::nedelec(ReferenceElement::Triangle, 1).unwrap(), &mut ids)
        .unwrap();
    let reference = ReferenceElement::Triangle;
    let coefficient_of = |dof: &Dof| 0.5 + 0.25 * dof.entity() as f64;

    for group in space.groups() {
        let element = group.element();
        let coefficients: Vec<f64> = group.dofs().iter().map(coefficient_of).collect();
        let vertices = mesh.element(element).unwrap().vertices().to_vec();
        for (local, &[a, b]) in reference.edges().iter().enumerate() {
            let (ra, rb) = (reference.vertices()[a], reference.vertices()[b]);
            let xi = Point3::new(0.5 * (ra[0] + rb[0]), 0.5 * (ra[1] + rb[1]), 0.0);
            let value = space.interpolate_vector(element, &coefficients, &xi).unwrap();

            // Physical edge from the lower to the higher global vertex
            let (low, high) = (vertices[a].min(vertices[b]), vertices[a].max(vertices[b]));
            let tangent: Vector3<f64> = mesh.vertices()[high] - mesh.vertices()[low];
            let expected = 2.0 * coefficients[local];
            assert_scalar_eq!(tangent.dot(&value), expected, comp = abs, tol = 1e-12);
        }
    }
}

#[test]
fn interpolation_errors() {
    let mesh = create_unit_square_tri_mesh(1);
    let mut ids = GroupIdAllocator::new();
    let space = FunctionSpace::new(domain(&mesh), Basis::lagrange(ReferenceElement::Triangle, 1).unwrap(), &mut ids)
        .unwrap();
    let xi = Point3::origin();

    assert_eq!(
        space.interpolate_scalar(0, &[1.0, 2.0], &xi).unwrap_err(),
        Error::CoefficientCountMismatch { expected: 3, found: 2 }
    );
    assert!(matches!(
        space.interpolate_vector(0, &[1.0, 2.0, 3.0], &xi),
        Err(Error::FieldKindMismatch { .. })
    ));
    assert_eq!(
        space.interpolate_scalar(2, &[1.0, 2.0, 3.0], &xi).unwrap_err(),
        Error::ElementNotInSupport(2)
    );
}
