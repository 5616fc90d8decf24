//! Basis functions on reference elements.
//!
//! A [`Basis`] holds exact polynomial basis functions, each tagged with the geometric entity
//! of the reference element it belongs to. Vector bases additionally come in one variant per
//! combination of edge orientations, see [`Mesh::orientation`](crate::mesh::Mesh::orientation).
use crate::element::{EntityKind, ReferenceElement};
use crate::error::Error;
use galerkin_polynomial::{curl, evaluate_vector, Polynomial, PolynomialVector};
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

mod lagrange;
mod nedelec;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BasisFamily {
    /// Nodal, scalar-valued functions.
    Lagrange,
    /// Edge-based, vector-valued functions with tangential continuity.
    Nedelec,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    Scalar,
    Vector,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BasisFunction {
    Scalar(Polynomial),
    Vector(PolynomialVector),
}

impl BasisFunction {
    pub fn field_kind(&self) -> FieldKind {
        match self {
            Self::Scalar(_) => FieldKind::Scalar,
            Self::Vector(_) => FieldKind::Vector,
        }
    }

    /// The gradient of a scalar function, or the curl of a vector function.
    pub fn derivative(&self) -> PolynomialVector {
        match self {
            Self::Scalar(p) => p.gradient(),
            Self::Vector(v) => curl(v),
        }
    }

    fn negated(&self) -> Self {
        match self {
            Self::Scalar(p) => Self::Scalar(-p),
            Self::Vector([x, y, z]) => Self::Vector([-x, -y, -z]),
        }
    }
}

/// The geometric role of a basis function: the `index`-th function attached to the
/// `local_entity`-th entity of the given kind.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionRole {
    pub kind: EntityKind,
    pub local_entity: usize,
    pub index: usize,
}

impl FunctionRole {
    pub fn new(kind: EntityKind, local_entity: usize, index: usize) -> Self {
        Self {
            kind,
            local_entity,
            index,
        }
    }
}

/// An immutable set of basis functions on a reference element.
#[derive(Debug, Clone)]
pub struct Basis {
    reference: ReferenceElement,
    family: BasisFamily,
    order: usize,
    field_kind: FieldKind,
    roles: Vec<FunctionRole>,
    // variants[orientation][function]; a single variant if the basis is orientation-independent
    variants: Vec<Vec<BasisFunction>>,
    derivatives: Vec<Vec<PolynomialVector>>,
}

impl Basis {
    /// Constructs the basis of the given family and order on the reference element.
    pub fn new(reference: ReferenceElement, family: BasisFamily, order: usize) -> Result<Self, Error> {
        match family {
            BasisFamily::Lagrange => Self::lagrange(reference, order),
            BasisFamily::Nedelec => Self::nedelec(reference, order),
        }
    }

    /// Lagrange basis of order 1 or 2.
    pub fn lagrange(reference: ReferenceElement, order: usize) -> Result<Self, Error> {
        let (roles, functions) =
            lagrange::lagrange_functions(reference, order).ok_or(Error::UnsupportedBasis {
                reference,
                family: BasisFamily::Lagrange,
                order,
            })?;
        Ok(Self::from_functions(reference, BasisFamily::Lagrange, order, roles, functions, false))
    }

    /// Lowest-order Nedelec (edge) basis. Only `order == 1` is available, and hexahedra are not
    /// supported.
    pub fn nedelec(reference: ReferenceElement, order: usize) -> Result<Self, Error> {
        let unsupported = Error::UnsupportedBasis {
            reference,
            family: BasisFamily::Nedelec,
            order,
        };
        if order != 1 {
            return Err(unsupported);
        }
        let (roles, functions) = nedelec::nedelec_functions(reference).ok_or(unsupported)?;
        Ok(Self::from_functions(reference, BasisFamily::Nedelec, order, roles, functions, true))
    }

    fn from_functions(
        reference: ReferenceElement,
        family: BasisFamily,
        order: usize,
        roles: Vec<FunctionRole>,
        functions: Vec<BasisFunction>,
        oriented: bool,
    ) -> Self {
        assert_eq!(roles.len(), functions.len());
        let field_kind = functions
            .first()
            .map(BasisFunction::field_kind)
            .unwrap_or(FieldKind::Scalar);

        let variants: Vec<Vec<BasisFunction>> = if oriented {
            // The reference functions follow the local edge direction. A set bit flips the
            // sign of every function on that edge, so that it follows the global direction.
            (0..reference.num_orientations())
                .map(|orientation| {
                    functions
                        .iter()
                        .zip(&roles)
                        .map(|(function, role)| {
                            let flipped = role.kind == EntityKind::Edge && orientation & (1 << role.local_entity) != 0;
                            if flipped {
                                function.negated()
                            } else {
                                function.clone()
                            }
                        })
                        .collect()
                })
                .collect()
        } else {
            vec![functions]
        };

        let derivatives = variants
            .iter()
            .map(|variant| variant.iter().map(BasisFunction::derivative).collect())
            .collect();

        Self {
            reference,
            family,
            order,
            field_kind,
            roles,
            variants,
            derivatives,
        }
    }

    pub fn reference(&self) -> ReferenceElement {
        self.reference
    }

    pub fn family(&self) -> BasisFamily {
        self.family
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn field_kind(&self) -> FieldKind {
        self.field_kind
    }

    pub fn is_scalar(&self) -> bool {
        self.field_kind == FieldKind::Scalar
    }

    pub fn num_functions(&self) -> usize {
        self.roles.len()
    }

    /// Number of orientation variants that may be requested.
    pub fn num_orientations(&self) -> usize {
        self.reference.num_orientations()
    }

    pub fn roles(&self) -> &[FunctionRole] {
        &self.roles
    }

    /// # Panics
    ///
    /// Panics if the function index is out of bounds.
    pub fn role(&self, i: usize) -> FunctionRole {
        self.roles[i]
    }

    /// Indices of the functions attached to the given local entity.
    pub fn functions_on(&self, kind: EntityKind, local_entity: usize) -> impl Iterator<Item = usize> + '_ {
        self.roles
            .iter()
            .enumerate()
            .filter(move |(_, role)| role.kind == kind && role.local_entity == local_entity)
            .map(|(i, _)| i)
    }

    fn variant(&self, orientation: usize) -> usize {
        assert!(
            orientation < self.num_orientations(),
            "orientation variant {} is not defined for a {} basis on {} ({} variants)",
            orientation,
            match self.family {
                BasisFamily::Lagrange => "Lagrange",
                BasisFamily::Nedelec => "Nedelec",
            },
            self.reference,
            self.num_orientations()
        );
        if self.variants.len() == 1 {
            0
        } else {
            orientation
        }
    }

    /// The `i`-th function of the given orientation variant.
    ///
    /// # Panics
    ///
    /// Panics if the variant or the function index is not defined.
    pub fn function(&self, orientation: usize, i: usize) -> &BasisFunction {
        let variant = &self.variants[self.variant(orientation)];
        assert!(
            i < variant.len(),
            "function index {} out of bounds for basis with {} functions",
            i,
            variant.len()
        );
        &variant[i]
    }

    /// Gradient (scalar bases) or curl (vector bases) of the `i`-th function.
    ///
    /// # Panics
    ///
    /// Panics if the variant or the function index is not defined.
    pub fn derivative(&self, orientation: usize, i: usize) -> &PolynomialVector {
        let variant = &self.derivatives[self.variant(orientation)];
        assert!(
            i < variant.len(),
            "function index {} out of bounds for basis with {} functions",
            i,
            variant.len()
        );
        &variant[i]
    }

    /// Evaluates all scalar functions at the reference point.
    ///
    /// # Panics
    ///
    /// Panics if the basis is not scalar, or if `values` does not have one entry per function.
    pub fn populate_values(&self, orientation: usize, xi: &Point3<f64>, values: &mut [f64]) {
        assert!(self.is_scalar(), "cannot evaluate vector basis functions as scalars");
        assert_eq!(values.len(), self.num_functions());
        let variant = &self.variants[self.variant(orientation)];
        for (value, function) in values.iter_mut().zip(variant) {
            if let BasisFunction::Scalar(p) = function {
                *value = p.evaluate(xi.x, xi.y, xi.z);
            }
        }
    }

    /// Evaluates all vector functions at the reference point.
    ///
    /// # Panics
    ///
    /// Panics if the basis is not vector-valued, or if `values` does not have one entry per
    /// function.
    pub fn populate_vectors(&self, orientation: usize, xi: &Point3<f64>, values: &mut [Vector3<f64>]) {
        assert!(!self.is_scalar(), "cannot evaluate scalar basis functions as vectors");
        assert_eq!(values.len(), self.num_functions());
        let variant = &self.variants[self.variant(orientation)];
        for (value, function) in values.iter_mut().zip(variant) {
            if let BasisFunction::Vector(v) = function {
                *value = Vector3::from(evaluate_vector(v, xi.x, xi.y, xi.z));
            }
        }
    }

    /// Evaluates the gradients (scalar bases) or curls (vector bases) at the reference point.
    ///
    /// # Panics
    ///
    /// Panics if `values` does not have one entry per function.
    pub fn populate_derivatives(&self, orientation: usize, xi: &Point3<f64>, values: &mut [Vector3<f64>]) {
        assert_eq!(values.len(), self.num_functions());
        let variant = &self.derivatives[self.variant(orientation)];
        for (value, derivative) in values.iter_mut().zip(variant) {
            *value = Vector3::from(evaluate_vector(derivative, xi.x, xi.y, xi.z));
        }
    }
}

/// Maps polynomials given in the native coordinates `[0, 1]^d` to the reference coordinates
/// `[-1, 1]^d` by substituting `x -> (x + 1) / 2` in every variable.
fn native_to_reference(p: &Polynomial) -> Polynomial {
    let half_shift = |dim| &(Polynomial::variable(dim) + Polynomial::one()) * 0.5;
    p.compose3(&half_shift(0), &half_shift(1), &half_shift(2))
}
