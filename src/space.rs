//! Function spaces: a basis bound to a support, with the dofs and element groups it induces.
use crate::basis::{Basis, FieldKind};
use crate::element::EntityKind;
use crate::error::Error;
use crate::mesh::{Mesh, Support};
use log::debug;
use rustc_hash::FxHashMap;
use std::collections::BTreeSet;

mod dof;
mod interpolate;

pub use dof::{Dof, GroupIdAllocator, GroupOfDof};

/// A basis bound to a support.
///
/// Dofs are keyed by mesh entities, so elements that share a vertex, edge or face share the
/// corresponding dofs.
#[derive(Debug, Clone)]
pub struct FunctionSpace<'a> {
    support: Support<'a>,
    basis: Basis,
    dofs: BTreeSet<Dof>,
    groups: Vec<GroupOfDof>,
    element_to_group: FxHashMap<usize, usize>,
}

impl<'a> FunctionSpace<'a> {
    /// Builds the dofs and one group per element of the support.
    ///
    /// Fails if the elements of the support do not match the reference element of the basis.
    pub fn new(support: Support<'a>, basis: Basis, ids: &mut GroupIdAllocator) -> Result<Self, Error> {
        let element_type = support.element_type()?;
        if element_type != basis.reference() {
            return Err(Error::ElementTypeMismatch {
                expected: basis.reference(),
                found: element_type,
            });
        }

        let mesh = support.mesh();
        let mut dofs = BTreeSet::new();
        let mut groups = Vec::with_capacity(support.len());
        let mut element_to_group = FxHashMap::default();

        for &element in support.elements() {
            let group_dofs: Vec<Dof> = basis
                .roles()
                .iter()
                .map(|role| {
                    let entity = mesh.entity_of_element(element, role.kind, role.local_entity);
                    Dof::new(role.kind, entity, role.index)
                })
                .collect();
            dofs.extend(group_dofs.iter().copied());
            element_to_group.insert(element, groups.len());
            groups.push(GroupOfDof::new(ids.next_id(), element, group_dofs));
        }

        debug!(
            "Built function space on {} {} elements with {} dofs",
            groups.len(),
            element_type,
            dofs.len()
        );

        Ok(Self {
            support,
            basis,
            dofs,
            groups,
            element_to_group,
        })
    }

    pub fn support(&self) -> &Support<'a> {
        &self.support
    }

    pub fn mesh(&self) -> &'a Mesh {
        self.support.mesh()
    }

    pub fn basis(&self) -> &Basis {
        &self.basis
    }

    pub fn field_kind(&self) -> FieldKind {
        self.basis.field_kind()
    }

    pub fn is_scalar(&self) -> bool {
        self.basis.is_scalar()
    }

    /// All dofs of the space, in ascending order.
    pub fn dofs(&self) -> &BTreeSet<Dof> {
        &self.dofs
    }

    pub fn groups(&self) -> &[GroupOfDof] {
        &self.groups
    }

    pub fn num_dofs(&self) -> usize {
        self.dofs.len()
    }

    pub fn num_groups(&self) -> usize {
        self.groups.len()
    }

    /// Position of the element's group in [`groups`](Self::groups), if the element is in the
    /// support.
    pub fn group_index_of_element(&self, element: usize) -> Option<usize> {
        self.element_to_group.get(&element).copied()
    }

    pub fn group_of_element(&self, element: usize) -> Option<&GroupOfDof> {
        self.group_index_of_element(element)
            .map(|index| &self.groups[index])
    }

    /// The ordered dofs of the element.
    pub fn keys_of_element(&self, element: usize) -> Result<&[Dof], Error> {
        self.group_of_element(element)
            .map(GroupOfDof::dofs)
            .ok_or(Error::ElementNotInSupport(element))
    }

    /// The ordered dofs attached to the entity. Empty if the entity carries no dofs.
    pub fn keys_of_entity(&self, kind: EntityKind, entity: usize) -> Vec<Dof> {
        let first = Dof::new(kind, entity, 0);
        let last = Dof::new(kind, entity, usize::MAX);
        self.dofs.range(first..=last).copied().collect()
    }

    pub fn keys_of_vertex(&self, vertex: usize) -> Vec<Dof> {
        self.keys_of_entity(EntityKind::Vertex, vertex)
    }

    pub fn keys_of_edge(&self, edge: usize) -> Vec<Dof> {
        self.keys_of_entity(EntityKind::Edge, edge)
    }

    pub fn keys_of_face(&self, face: usize) -> Vec<Dof> {
        self.keys_of_entity(EntityKind::Face, face)
    }

    /// All dofs attached to the closure of the given domain, which must be defined on the
    /// same mesh as the space.
    pub fn keys_of_closure(&self, domain: &Support) -> Result<Vec<Dof>, Error> {
        if !self.support.shares_mesh_with(domain) {
            return Err(Error::ForeignMesh);
        }
        let mut keys = Vec::new();
        for kind in [EntityKind::Vertex, EntityKind::Edge, EntityKind::Face, EntityKind::Cell] {
            for entity in domain.closure(kind) {
                keys.extend(self.keys_of_entity(kind, entity));
            }
        }
        Ok(keys)
    }
}
