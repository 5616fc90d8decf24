use crate::element::EntityKind;
use serde::{Deserialize, Serialize};

/// A degree of freedom: the `index`-th unknown attached to a mesh entity.
///
/// Entities are identified by their global index in the mesh: vertex index, edge index, face
/// index, or element index for cells. Dofs order first by entity kind, then by entity, then by
/// index.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Dof {
    kind: EntityKind,
    entity: usize,
    index: usize,
}

impl Dof {
    pub fn new(kind: EntityKind, entity: usize, index: usize) -> Self {
        Self { kind, entity, index }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn entity(&self) -> usize {
        self.entity
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

/// The ordered dofs of a single element, in the order of the basis functions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupOfDof {
    id: usize,
    element: usize,
    dofs: Vec<Dof>,
}

impl GroupOfDof {
    pub(crate) fn new(id: usize, element: usize, dofs: Vec<Dof>) -> Self {
        Self { id, element, dofs }
    }

    /// Unique identifier handed out by the [`GroupIdAllocator`] that created the group.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Index of the mesh element the group belongs to.
    pub fn element(&self) -> usize {
        self.element
    }

    pub fn dofs(&self) -> &[Dof] {
        &self.dofs
    }

    pub fn len(&self) -> usize {
        self.dofs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dofs.is_empty()
    }
}

/// Monotonically increasing source of group identifiers.
///
/// Every function space built with the same allocator produces groups with distinct ids.
#[derive(Debug, Default)]
pub struct GroupIdAllocator {
    next: usize,
}

impl GroupIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> usize {
        let id = self.next;
        self.next += 1;
        id
    }

    /// Number of ids handed out so far.
    pub fn num_allocated(&self) -> usize {
        self.next
    }
}
