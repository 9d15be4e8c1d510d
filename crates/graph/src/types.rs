use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Opaque object identifier as written in the project file
/// (e.g. `4C0A11112B00000000000501`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Reference(String);

impl Reference {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Reference {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Reference {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Reference {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Reference {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Arena slot of a decoded node. Only meaningful for the graph that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Kind of a resolved dependency edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Another native target of the project
    Native,
    /// A Swift package product
    Package,
}

/// Dependency of a target on another target or on a package product
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedEdge {
    Native { node: NodeId, name: String },
    Package { node: NodeId, name: String },
}

impl ResolvedEdge {
    /// Target name or package product name
    pub fn name(&self) -> &str {
        match self {
            Self::Native { name, .. } | Self::Package { name, .. } => name,
        }
    }

    pub fn node(&self) -> NodeId {
        match self {
            Self::Native { node, .. } | Self::Package { node, .. } => *node,
        }
    }

    pub fn kind(&self) -> EdgeKind {
        match self {
            Self::Native { .. } => EdgeKind::Native,
            Self::Package { .. } => EdgeKind::Package,
        }
    }

    pub fn is_native(&self) -> bool {
        matches!(self, Self::Native { .. })
    }
}

/// Append `edge` unless an edge with the same name is already present.
/// Returns whether it was appended.
pub(crate) fn push_unique(edges: &mut Vec<ResolvedEdge>, edge: ResolvedEdge) -> bool {
    if edges.iter().any(|existing| existing.name() == edge.name()) {
        return false;
    }
    edges.push(edge);
    true
}
