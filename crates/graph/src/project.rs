use crate::decoder::ProjectDecoder;
use crate::error::{GraphError, Result};
use crate::nodes::{Node, NodeKind, NodePayload, Project, TypedNode};
use crate::types::{NodeId, Reference};
use std::collections::HashMap;
use std::path::Path;

/// Decoded project: every object of the file, addressable by reference.
///
/// Nodes live in an arena in decode (file) order. The graph is read-only once
/// built; resolution results are kept outside it.
#[derive(Debug, Clone)]
pub struct ProjectGraph {
    nodes: Vec<Node>,

    /// Reference -> arena slot
    index: HashMap<Reference, NodeId>,

    root: NodeId,
}

impl ProjectGraph {
    /// Assemble a graph from decoded nodes, enforcing the single-root invariant.
    /// `declared_root` is the document's `rootObject`.
    pub(crate) fn from_nodes(nodes: Vec<Node>, declared_root: Reference) -> Result<Self> {
        let index: HashMap<Reference, NodeId> = nodes
            .iter()
            .enumerate()
            .map(|(slot, node)| (node.reference().clone(), NodeId(slot)))
            .collect();

        let projects: Vec<NodeId> = nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.kind() == NodeKind::Project)
            .map(|(slot, _)| NodeId(slot))
            .collect();

        let root = match projects.as_slice() {
            [] => return Err(GraphError::MissingRoot),
            [only] => *only,
            many => {
                return Err(GraphError::AmbiguousRoot {
                    references: many
                        .iter()
                        .map(|id| nodes[id.0].reference().clone())
                        .collect(),
                })
            }
        };

        let found = nodes[root.0].reference();
        if *found != declared_root {
            return Err(GraphError::RootMismatch {
                declared: declared_root,
                found: found.clone(),
            });
        }

        Ok(Self { nodes, index, root })
    }

    /// Decode project text (OpenStep or JSON)
    pub fn from_text(text: &str) -> Result<Self> {
        ProjectDecoder::default().decode_str(text)
    }

    /// Decode a `project.pbxproj` file or the `.xcodeproj` bundle containing it
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        ProjectDecoder::default().decode_path(path)
    }

    /// Node for `reference` if it exists and has the expected kind
    pub fn get(&self, reference: &str, expected: NodeKind) -> Option<&Node> {
        self.lookup(reference, expected).ok()
    }

    /// Like [`get`](Self::get) but reports why the lookup failed
    pub fn lookup(&self, reference: &str, expected: NodeKind) -> Result<&Node> {
        let id = self.lookup_id(reference, expected)?;
        Ok(&self.nodes[id.0])
    }

    pub fn lookup_id(&self, reference: &str, expected: NodeKind) -> Result<NodeId> {
        let id = *self
            .index
            .get(reference)
            .ok_or_else(|| GraphError::DanglingReference(Reference::from(reference)))?;

        let found = self.nodes[id.0].kind();
        if found != expected {
            return Err(GraphError::KindMismatch {
                reference: Reference::from(reference),
                expected,
                found,
            });
        }
        Ok(id)
    }

    /// Typed payload for `reference`
    pub fn get_as<T: TypedNode>(&self, reference: &str) -> Option<&T> {
        self.lookup_as(reference).ok()
    }

    pub fn lookup_as<T: TypedNode>(&self, reference: &str) -> Result<&T> {
        let node = self.lookup(reference, T::KIND)?;
        node.as_typed::<T>().ok_or_else(|| GraphError::KindMismatch {
            reference: Reference::from(reference),
            expected: T::KIND,
            found: node.kind(),
        })
    }

    /// All nodes of one kind, in decode order
    pub fn all(&self, kind: NodeKind) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(move |node| node.kind() == kind)
    }

    /// All payloads of one typed kind with their arena slots, in decode order
    pub fn all_as<'a, T: TypedNode + 'a>(&'a self) -> impl Iterator<Item = (NodeId, &'a T)> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(slot, node)| node.as_typed::<T>().map(|typed| (NodeId(slot), typed)))
    }

    /// The unique `PBXProject` node
    pub fn root_project(&self) -> &Node {
        &self.nodes[self.root.0]
    }

    pub fn project(&self) -> &Project {
        match self.root_project().payload() {
            NodePayload::Project(project) => project,
            // from_nodes only ever selects a Project node as root
            _ => unreachable!("root node is not a PBXProject"),
        }
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn reference_of(&self, id: NodeId) -> &Reference {
        self.nodes[id.0].reference()
    }

    pub fn id_of(&self, reference: &str) -> Option<NodeId> {
        self.index.get(reference).copied()
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(slot, node)| (NodeId(slot), node))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
