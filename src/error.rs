//! The error type shared by mesh, space, dof management and assembly routines.
use crate::basis::{BasisFamily, FieldKind};
use crate::element::ReferenceElement;
use crate::space::Dof;
use std::fmt;
use std::fmt::{Display, Formatter};

/// Library-wide error type.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// An element has the wrong number of vertices, repeated vertices or vertices out of bounds.
    InvalidElement { element: usize, reason: &'static str },
    /// An element index does not refer to an element of the mesh.
    ElementOutOfBounds { element: usize, num_elements: usize },
    /// The same element was listed twice in a support.
    DuplicateElement(usize),
    /// A support must contain at least one element.
    EmptySupport,
    /// Elements of different types were combined, or a basis was used on the wrong element type.
    ElementTypeMismatch {
        expected: ReferenceElement,
        found: ReferenceElement,
    },
    /// No basis of the requested family and order exists for the element type.
    UnsupportedBasis {
        reference: ReferenceElement,
        family: BasisFamily,
        order: usize,
    },
    /// A scalar quantity was used where a vector quantity was expected, or vice versa.
    FieldKindMismatch { expected: FieldKind, found: FieldKind },
    /// Two objects that must share a mesh refer to different meshes.
    ForeignMesh,
    /// The dof is not managed by the dof manager.
    UnknownDof(Dof),
    /// Global indices were requested before the free dofs were numbered.
    DofNotNumbered(Dof),
    /// Dofs cannot be fixed once the free dofs have been numbered.
    DofAlreadyNumbered(Dof),
    /// Dofs can only be fixed to finite values.
    NonFiniteValue { dof: Dof, value: f64 },
    /// The dof was already fixed to a different value.
    ConflictingFixedValue { dof: Dof, existing: f64, requested: f64 },
    /// The element is not part of the support of the function space.
    ElementNotInSupport(usize),
    /// The element has a singular (or non-positive) metric.
    DegenerateElement(usize),
    /// The number of coefficients does not match the number of dofs of the element.
    CoefficientCountMismatch { expected: usize, found: usize },
    /// The linear system must be assembled before it can be solved.
    NotAssembled,
    /// The linear solver failed, e.g. because the matrix is not positive definite.
    SolveFailed(String),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidElement { element, reason } => write!(f, "Element {} is invalid: {}", element, reason),
            Self::ElementOutOfBounds { element, num_elements } => {
                write!(f, "Element index {} is out of bounds for mesh with {} elements", element, num_elements)
            }
            Self::DuplicateElement(element) => write!(f, "Element {} appears more than once", element),
            Self::EmptySupport => write!(f, "Support must contain at least one element"),
            Self::ElementTypeMismatch { expected, found } => {
                write!(f, "Expected element of type {}, found {}", expected, found)
            }
            Self::UnsupportedBasis {
                reference,
                family,
                order,
            } => write!(f, "No {:?} basis of order {} is available for {}", family, order, reference),
            Self::FieldKindMismatch { expected, found } => {
                write!(f, "Expected {:?} field, found {:?} field", expected, found)
            }
            Self::ForeignMesh => write!(f, "Domain is defined on a different mesh"),
            Self::UnknownDof(dof) => write!(f, "Unknown dof {:?}", dof),
            Self::DofNotNumbered(dof) => write!(f, "Dof {:?} has not been numbered", dof),
            Self::DofAlreadyNumbered(dof) => {
                write!(f, "Cannot fix dof {:?} after the free dofs have been numbered", dof)
            }
            Self::NonFiniteValue { dof, value } => write!(f, "Cannot fix dof {:?} to non-finite value {}", dof, value),
            Self::ConflictingFixedValue {
                dof,
                existing,
                requested,
            } => write!(
                f,
                "Dof {:?} is already fixed to {}, cannot fix it to {}",
                dof, existing, requested
            ),
            Self::ElementNotInSupport(element) => {
                write!(f, "Element {} is not in the support of the function space", element)
            }
            Self::DegenerateElement(element) => write!(f, "Element {} is degenerate", element),
            Self::CoefficientCountMismatch { expected, found } => {
                write!(f, "Expected {} coefficients, found {}", expected, found)
            }
            Self::NotAssembled => write!(f, "Linear system has not been assembled"),
            Self::SolveFailed(reason) => write!(f, "Failed to solve linear system: {}", reason),
        }
    }
}

impl std::error::Error for Error {}
