use galerkin::element::{ElementGeometry, EntityKind, ReferenceElement};
use galerkin::nalgebra::{Matrix3x2, Point3};
use galerkin::proptest::{point3, reference_point};
use matrixcompare::{assert_matrix_eq, assert_scalar_eq};
use proptest::prelude::*;

const ALL_ELEMENTS: [ReferenceElement; 6] = [
    ReferenceElement::Point,
    ReferenceElement::Line,
    ReferenceElement::Triangle,
    ReferenceElement::Quadrilateral,
    ReferenceElement::Tetrahedron,
    ReferenceElement::Hexahedron,
];

#[test]
fn reference_element_tables_are_consistent() {
    let expected = [
        (ReferenceElement::Point, 0, 1, 0, 0),
        (ReferenceElement::Line, 1, 2, 1, 0),
        (ReferenceElement::Triangle, 2, 3, 3, 1),
        (ReferenceElement::Quadrilateral, 2, 4, 4, 1),
        (ReferenceElement::Tetrahedron, 3, 4, 6, 4),
        (ReferenceElement::Hexahedron, 3, 8, 12, 6),
    ];
    for (reference, dim, num_vertices, num_edges, num_faces) in expected {
        assert_eq!(reference.dim(), dim);
        assert_eq!(reference.num_vertices(), num_vertices);
        assert_eq!(reference.num_edges(), num_edges);
        assert_eq!(reference.num_faces(), num_faces);
        assert_eq!(reference.num_orientations(), 1 << num_edges);
        for edge in reference.edges() {
            assert!(edge.iter().all(|&v| v < num_vertices));
        }
    }
}

#[test]
fn interior_entities_and_facets() {
    assert_eq!(ReferenceElement::Point.interior_entity(), EntityKind::Vertex);
    assert_eq!(ReferenceElement::Line.interior_entity(), EntityKind::Edge);
    assert_eq!(ReferenceElement::Quadrilateral.interior_entity(), EntityKind::Face);
    assert_eq!(ReferenceElement::Hexahedron.interior_entity(), EntityKind::Cell);

    assert_eq!(ReferenceElement::Point.facet_type(), None);
    assert_eq!(ReferenceElement::Line.facet_type(), Some(ReferenceElement::Point));
    assert_eq!(ReferenceElement::Tetrahedron.facet_type(), Some(ReferenceElement::Triangle));
    assert_eq!(ReferenceElement::Hexahedron.facets().len(), 6);
    assert_eq!(ReferenceElement::Triangle.facets(), vec![vec![0, 1], vec![1, 2], vec![2, 0]]);
}

#[test]
fn vertex_shape_functions_are_nodal() {
    for reference in ALL_ELEMENTS {
        for (i, vertex) in reference.vertices().iter().enumerate() {
            let phi = reference.vertex_shape_functions(&Point3::from(*vertex));
            for (j, phi_j) in phi.iter().enumerate() {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_scalar_eq!(*phi_j, expected, comp = abs, tol = 1e-14);
            }
        }
    }
}

#[test]
fn element_display() {
    insta::assert_display_snapshot!(ReferenceElement::Quadrilateral, @"quadrilateral");
    insta::assert_display_snapshot!(ReferenceElement::Tetrahedron, @"tetrahedron");
}

#[test]
fn affine_quadrilateral_geometry() {
    let h = 0.5;
    let vertices = vec![
        Point3::new(1.0, 2.0, 0.0),
        Point3::new(1.0 + h, 2.0, 0.0),
        Point3::new(1.0 + h, 2.0 + h, 0.0),
        Point3::new(1.0, 2.0 + h, 0.0),
    ];
    let geometry = ElementGeometry::new(ReferenceElement::Quadrilateral, vertices);
    let xi = Point3::new(0.3, -0.2, 0.0);

    let x = geometry.map_reference_coords(&xi);
    assert_scalar_eq!(x.x, 1.0 + 0.5 * h * 1.3, comp = abs, tol = 1e-14);
    assert_scalar_eq!(x.y, 2.0 + 0.5 * h * 0.8, comp = abs, tol = 1e-14);
    assert_scalar_eq!(geometry.measure(&xi), h * h / 4.0, comp = abs, tol = 1e-14);

    #[rustfmt::skip]
    let expected_covariant = Matrix3x2::new(
        2.0 / h, 0.0,
        0.0, 2.0 / h,
        0.0, 0.0);
    let covariant = geometry.covariant(&xi).unwrap();
    assert_matrix_eq!(covariant, expected_covariant, comp = abs, tol = 1e-12);
}

#[test]
fn triangle_embedded_in_3d_has_constant_measure() {
    let vertices = vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(0.0, 0.0, 1.0),
    ];
    let geometry = ElementGeometry::new(ReferenceElement::Triangle, vertices);
    // Physical area 1/2, reference area 2
    for xi in [Point3::new(-1.0, -1.0, 0.0), Point3::new(-0.2, 0.1, 0.0)] {
        assert_scalar_eq!(geometry.measure(&xi), 0.25, comp = abs, tol = 1e-14);
    }
    let covariant = geometry.covariant(&Point3::origin()).unwrap();
    assert_eq!(covariant.ncols(), 2);
    assert_scalar_eq!(covariant[(1, 0)], 0.0, comp = abs, tol = 1e-14);
    assert_scalar_eq!(covariant[(1, 1)], 0.0, comp = abs, tol = 1e-14);
}

#[test]
fn collapsed_triangle_has_no_covariant_map() {
    let vertices = vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 1.0, 0.0),
        Point3::new(2.0, 2.0, 0.0),
    ];
    let geometry = ElementGeometry::new(ReferenceElement::Triangle, vertices);
    assert!(geometry.covariant(&Point3::origin()).is_none());
    assert_scalar_eq!(geometry.measure(&Point3::origin()), 0.0, comp = abs, tol = 1e-14);
}

#[test]
fn point_geometry_has_unit_measure() {
    let geometry = ElementGeometry::new(ReferenceElement::Point, vec![Point3::new(3.0, 4.0, 5.0)]);
    assert_eq!(geometry.measure(&Point3::origin()), 1.0);
    assert_eq!(geometry.map_reference_coords(&Point3::origin()), Point3::new(3.0, 4.0, 5.0));
    assert_eq!(geometry.covariant(&Point3::origin()).unwrap().ncols(), 0);
}

proptest! {
    #[test]
    fn vertex_shape_functions_partition_unity(
        (reference, xi) in any::<ReferenceElement>()
            .prop_flat_map(|reference| (Just(reference), reference_point(reference)))
    ) {
        let sum: f64 = reference.vertex_shape_functions(&xi).iter().sum();
        prop_assert!((sum - 1.0).abs() < 1e-12);

        let gradients = reference.vertex_shape_gradients(&xi);
        for d in 0..reference.dim() {
            let row_sum: f64 = gradients.row(d).iter().sum();
            prop_assert!(row_sum.abs() < 1e-12);
        }
    }

    #[test]
    fn triangle_geometry_interpolates_its_vertices(a in point3(), b in point3(), c in point3()) {
        let geometry = ElementGeometry::new(ReferenceElement::Triangle, vec![a, b, c]);
        for (reference_vertex, vertex) in ReferenceElement::Triangle.vertices().iter().zip([a, b, c]) {
            let x = geometry.map_reference_coords(&Point3::from(*reference_vertex));
            prop_assert!((x - vertex).norm() < 1e-12);
        }
        // The measure density of an affine triangle is half its area
        let centroid = Point3::new(-1.0 / 3.0, -1.0 / 3.0, 0.0);
        let area = 0.5 * (b - a).cross(&(c - a)).norm();
        prop_assert!((geometry.measure(&centroid) - 0.5 * area).abs() < 1e-9 * (1.0 + area));
    }
}
