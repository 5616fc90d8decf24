//! Meshes with globally identified edges and faces, and element supports.
use crate::element::{ElementGeometry, EntityKind, ReferenceElement};
use crate::error::Error;
use itertools::Itertools;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::convert::TryFrom;
use std::ptr;

pub mod procedural;

/// A single mesh element: its type, its vertices (indices into the mesh vertices, in the local
/// order of the reference element) and a physical tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeshElement {
    reference: ReferenceElement,
    vertices: Vec<usize>,
    tag: usize,
}

impl MeshElement {
    pub fn new(reference: ReferenceElement, vertices: Vec<usize>, tag: usize) -> Self {
        Self {
            reference,
            vertices,
            tag,
        }
    }

    pub fn reference(&self) -> ReferenceElement {
        self.reference
    }

    pub fn vertices(&self) -> &[usize] {
        &self.vertices
    }

    pub fn tag(&self) -> usize {
        self.tag
    }
}

/// Index-based mesh of mixed element types.
///
/// On construction, every edge and face is given a global index, keyed by its sorted set of
/// vertex indices, so that elements sharing an edge or face refer to it by the same index.
/// Serialization only stores vertices and elements; the entity tables are rebuilt on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MeshData", into = "MeshData")]
pub struct Mesh {
    vertices: Vec<Point3<f64>>,
    elements: Vec<MeshElement>,
    edges: Vec<[usize; 2]>,
    edge_indices: BTreeMap<[usize; 2], usize>,
    faces: Vec<Vec<usize>>,
    face_indices: BTreeMap<Vec<usize>, usize>,
    element_edges: Vec<Vec<usize>>,
    element_faces: Vec<Vec<usize>>,
}

/// The serialized form of a [`Mesh`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshData {
    pub vertices: Vec<Point3<f64>>,
    pub elements: Vec<MeshElement>,
}

impl TryFrom<MeshData> for Mesh {
    type Error = Error;

    fn try_from(data: MeshData) -> Result<Self, Self::Error> {
        Mesh::new(data.vertices, data.elements)
    }
}

impl From<Mesh> for MeshData {
    fn from(mesh: Mesh) -> Self {
        Self {
            vertices: mesh.vertices,
            elements: mesh.elements,
        }
    }
}

fn sorted<const N: usize>(mut indices: [usize; N]) -> [usize; N] {
    indices.sort_unstable();
    indices
}

impl Mesh {
    /// Constructs a mesh from vertices and elements, building the edge and face tables.
    ///
    /// Elements with the wrong number of vertices, repeated vertices or vertex indices out of
    /// bounds are rejected.
    pub fn new(vertices: Vec<Point3<f64>>, elements: Vec<MeshElement>) -> Result<Self, Error> {
        for (index, element) in elements.iter().enumerate() {
            if element.vertices.len() != element.reference.num_vertices() {
                return Err(Error::InvalidElement {
                    element: index,
                    reason: "wrong number of vertices for element type",
                });
            }
            if element.vertices.iter().any(|&v| v >= vertices.len()) {
                return Err(Error::InvalidElement {
                    element: index,
                    reason: "vertex index out of bounds",
                });
            }
            let distinct: BTreeSet<_> = element.vertices.iter().collect();
            if distinct.len() != element.vertices.len() {
                return Err(Error::InvalidElement {
                    element: index,
                    reason: "repeated vertex",
                });
            }
        }

        let mut mesh = Self {
            vertices,
            elements: Vec::new(),
            edges: Vec::new(),
            edge_indices: BTreeMap::new(),
            faces: Vec::new(),
            face_indices: BTreeMap::new(),
            element_edges: Vec::with_capacity(elements.len()),
            element_faces: Vec::with_capacity(elements.len()),
        };

        for element in &elements {
            let reference = element.reference;
            let edges = reference
                .edges()
                .iter()
                .map(|&[a, b]| mesh.insert_edge(sorted([element.vertices[a], element.vertices[b]])))
                .collect();
            let faces = reference
                .faces()
                .iter()
                .map(|face| {
                    let key = face.iter().map(|&v| element.vertices[v]).sorted_unstable().collect();
                    mesh.insert_face(key)
                })
                .collect();
            mesh.element_edges.push(edges);
            mesh.element_faces.push(faces);
        }

        mesh.elements = elements;
        Ok(mesh)
    }

    fn insert_edge(&mut self, key: [usize; 2]) -> usize {
        let next = self.edges.len();
        let index = *self.edge_indices.entry(key).or_insert(next);
        if index == next {
            self.edges.push(key);
        }
        index
    }

    fn insert_face(&mut self, key: Vec<usize>) -> usize {
        let next = self.faces.len();
        if let Some(&index) = self.face_indices.get(&key) {
            return index;
        }
        self.face_indices.insert(key.clone(), next);
        self.faces.push(key);
        next
    }

    pub fn vertices(&self) -> &[Point3<f64>] {
        &self.vertices
    }

    pub fn elements(&self) -> &[MeshElement] {
        &self.elements
    }

    pub fn num_elements(&self) -> usize {
        self.elements.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Sorted vertex indices of each global edge.
    pub fn edges(&self) -> &[[usize; 2]] {
        &self.edges
    }

    /// Sorted vertex indices of each global face.
    pub fn faces(&self) -> &[Vec<usize>] {
        &self.faces
    }

    pub fn element(&self, index: usize) -> Result<&MeshElement, Error> {
        self.elements.get(index).ok_or(Error::ElementOutOfBounds {
            element: index,
            num_elements: self.elements.len(),
        })
    }

    /// Global edge indices of the local edges of the given element.
    ///
    /// # Panics
    ///
    /// Panics if the element index is out of bounds.
    pub fn element_edges(&self, element: usize) -> &[usize] {
        &self.element_edges[element]
    }

    /// Global face indices of the local faces of the given element.
    ///
    /// # Panics
    ///
    /// Panics if the element index is out of bounds.
    pub fn element_faces(&self, element: usize) -> &[usize] {
        &self.element_faces[element]
    }

    /// The global edge with the given endpoints, in any order.
    pub fn find_edge(&self, a: usize, b: usize) -> Option<usize> {
        self.edge_indices.get(&sorted([a, b])).copied()
    }

    /// The global face with the given vertices, in any order.
    pub fn find_face(&self, vertices: &[usize]) -> Option<usize> {
        let key: Vec<_> = vertices.iter().copied().sorted_unstable().collect();
        self.face_indices.get(&key).copied()
    }

    /// Global index of the entity of the given kind that is the `local`-th such entity of the
    /// element. Cells are identified by the element index itself.
    ///
    /// # Panics
    ///
    /// Panics if the element or the local entity index is out of bounds.
    pub fn entity_of_element(&self, element: usize, kind: EntityKind, local: usize) -> usize {
        match kind {
            EntityKind::Vertex => self.elements[element].vertices[local],
            EntityKind::Edge => self.element_edges[element][local],
            EntityKind::Face => self.element_faces[element][local],
            EntityKind::Cell => {
                assert_eq!(local, 0, "an element has exactly one cell");
                element
            }
        }
    }

    /// Edge orientation bitmask of the element.
    ///
    /// Bit `e` is set if local edge `e` runs from the higher to the lower global vertex index.
    ///
    /// # Panics
    ///
    /// Panics if the element index is out of bounds.
    pub fn orientation(&self, element: usize) -> usize {
        let element = &self.elements[element];
        element
            .reference
            .edges()
            .iter()
            .enumerate()
            .filter(|(_, edge)| element.vertices[edge[0]] > element.vertices[edge[1]])
            .fold(0, |mask, (e, _)| mask | (1 << e))
    }

    /// The geometric map of the given element.
    ///
    /// # Panics
    ///
    /// Panics if the element index is out of bounds.
    pub fn geometry(&self, element: usize) -> ElementGeometry {
        let element = &self.elements[element];
        let vertices = element.vertices.iter().map(|&v| self.vertices[v]).collect();
        ElementGeometry::new(element.reference, vertices)
    }

    /// Indices of all elements with the given tag.
    pub fn elements_with_tag(&self, tag: usize) -> Vec<usize> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, element)| element.tag == tag)
            .map(|(index, _)| index)
            .collect()
    }

    /// Finds facets of the top-dimensional elements that belong to exactly one such element.
    ///
    /// Each facet is returned as a new element with the given tag, with its vertices in the
    /// local order of the parent element.
    pub fn find_boundary_facets(&self, tag: usize) -> Vec<MeshElement> {
        let top_dim = self
            .elements
            .iter()
            .map(|element| element.reference.dim())
            .max()
            .unwrap_or(0);

        // Use a BTreeMap so that the facets are returned in a deterministic order
        let mut counts: BTreeMap<Vec<usize>, (MeshElement, usize)> = BTreeMap::new();
        for element in self.elements.iter().filter(|e| e.reference.dim() == top_dim) {
            let facet_type = match element.reference.facet_type() {
                Some(facet_type) => facet_type,
                None => continue,
            };
            for local_facet in element.reference.facets() {
                let vertices: Vec<_> = local_facet.iter().map(|&v| element.vertices[v]).collect();
                let key = vertices.iter().copied().sorted_unstable().collect();
                counts
                    .entry(key)
                    .and_modify(|(_, count)| *count += 1)
                    .or_insert((MeshElement::new(facet_type, vertices, tag), 1));
            }
        }

        counts
            .into_values()
            .filter(|(_, count)| *count == 1)
            .map(|(facet, _)| facet)
            .collect()
    }

    /// Appends the boundary facets of the mesh as new elements with the given tag.
    pub fn with_boundary_elements(self, tag: usize) -> Result<Self, Error> {
        let facets = self.find_boundary_facets(tag);
        let MeshData {
            vertices,
            mut elements,
        } = MeshData::from(self);
        elements.extend(facets);
        Self::new(vertices, elements)
    }
}

/// An ordered, duplicate-free collection of elements of a single mesh.
///
/// Supports are the geometric domains that function spaces live on, and the sub-domains on
/// which essential conditions are imposed.
#[derive(Debug, Clone)]
pub struct Support<'a> {
    mesh: &'a Mesh,
    elements: Vec<usize>,
}

impl<'a> Support<'a> {
    pub fn new(mesh: &'a Mesh, elements: Vec<usize>) -> Result<Self, Error> {
        if elements.is_empty() {
            return Err(Error::EmptySupport);
        }
        let mut seen = BTreeSet::new();
        for &element in &elements {
            if element >= mesh.num_elements() {
                return Err(Error::ElementOutOfBounds {
                    element,
                    num_elements: mesh.num_elements(),
                });
            }
            if !seen.insert(element) {
                return Err(Error::DuplicateElement(element));
            }
        }
        Ok(Self { mesh, elements })
    }

    /// All elements carrying any of the given tags, in mesh order.
    pub fn from_tags(mesh: &'a Mesh, tags: &[usize]) -> Result<Self, Error> {
        let elements = mesh
            .elements()
            .iter()
            .enumerate()
            .filter(|(_, element)| tags.contains(&element.tag()))
            .map(|(index, _)| index)
            .collect();
        Self::new(mesh, elements)
    }

    pub fn all(mesh: &'a Mesh) -> Result<Self, Error> {
        Self::new(mesh, (0..mesh.num_elements()).collect())
    }

    pub fn mesh(&self) -> &'a Mesh {
        self.mesh
    }

    pub fn elements(&self) -> &[usize] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Whether both supports are defined on the very same mesh instance.
    pub fn shares_mesh_with(&self, other: &Support) -> bool {
        ptr::eq(self.mesh, other.mesh)
    }

    /// The common element type of the support.
    pub fn element_type(&self) -> Result<ReferenceElement, Error> {
        let expected = self.mesh.elements[self.elements[0]].reference;
        for &element in &self.elements[1..] {
            let found = self.mesh.elements[element].reference;
            if found != expected {
                return Err(Error::ElementTypeMismatch { expected, found });
            }
        }
        Ok(expected)
    }

    /// All entities of the given kind in the closure of the support.
    pub fn closure(&self, kind: EntityKind) -> BTreeSet<usize> {
        let mut entities = BTreeSet::new();
        for &element in &self.elements {
            let num_local = match kind {
                EntityKind::Vertex => self.mesh.elements[element].vertices.len(),
                EntityKind::Edge => self.mesh.element_edges[element].len(),
                EntityKind::Face => self.mesh.element_faces[element].len(),
                EntityKind::Cell => 1,
            };
            for local in 0..num_local {
                entities.insert(self.mesh.entity_of_element(element, kind, local));
            }
        }
        entities
    }
}
