//! Strategies for property-based testing with `proptest`.
use crate::element::ReferenceElement;
use ::proptest::collection::vec;
use ::proptest::prelude::*;
use nalgebra::Point3;

pub fn point3() -> impl Strategy<Value = Point3<f64>> {
    // Keep coordinates moderate so that derived quantities stay well conditioned
    let range = -10.0..10.0;
    [range.clone(), range.clone(), range].prop_map(|[x, y, z]| Point3::new(x, y, z))
}

impl Arbitrary for ReferenceElement {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        prop_oneof![
            Just(ReferenceElement::Point),
            Just(ReferenceElement::Line),
            Just(ReferenceElement::Triangle),
            Just(ReferenceElement::Quadrilateral),
            Just(ReferenceElement::Tetrahedron),
            Just(ReferenceElement::Hexahedron),
        ]
        .boxed()
    }
}

/// Points inside the reference domain of the given element. Unused coordinates are zero.
pub fn reference_point(reference: ReferenceElement) -> impl Strategy<Value = Point3<f64>> {
    let num_vertices = reference.num_vertices();
    vec(0.0..=1.0f64, num_vertices).prop_map(move |weights| {
        if reference.is_simplex() {
            // Convex combination of the vertices
            let total: f64 = weights.iter().sum::<f64>() + 1e-12;
            let mut xi = Point3::origin();
            for (w, vertex) in weights.iter().zip(reference.vertices()) {
                xi.x += w / total * vertex[0];
                xi.y += w / total * vertex[1];
                xi.z += w / total * vertex[2];
            }
            xi
        } else {
            // Tensor-product domains are boxes
            let mut coords = [0.0; 3];
            for d in 0..reference.dim() {
                coords[d] = 2.0 * weights[d] - 1.0;
            }
            Point3::from(coords)
        }
    })
}
