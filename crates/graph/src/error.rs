use crate::nodes::NodeKind;
use crate::types::Reference;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GraphError>;

fn kind_label(kind: &Option<NodeKind>) -> String {
    kind.map(|kind| format!(" ({kind})")).unwrap_or_default()
}

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Property list error: {0}")]
    Plist(#[from] xcdeps_plist::PlistError),

    #[error("Invalid project document: {0}")]
    InvalidDocument(String),

    #[error("Unknown node kind '{isa}' for object {reference}")]
    UnknownNodeKind { reference: Reference, isa: String },

    /// `kind` is `None` when the record has no usable `isa`
    #[error("Malformed object {reference}{}: {message}", kind_label(.kind))]
    MalformedNode {
        reference: Reference,
        kind: Option<NodeKind>,
        message: String,
    },

    #[error("No PBXProject object found")]
    MissingRoot,

    #[error("Expected exactly one PBXProject object, found {}", references.len())]
    AmbiguousRoot { references: Vec<Reference> },

    #[error("rootObject {declared} does not name the project object {found}")]
    RootMismatch { declared: Reference, found: Reference },

    #[error("Dangling reference: {0}")]
    DanglingReference(Reference),

    #[error("Object {reference} is a {found}, expected {expected}")]
    KindMismatch {
        reference: Reference,
        expected: NodeKind,
        found: NodeKind,
    },

    #[error("Target dependency {0} names neither a target nor a proxy")]
    UnlinkedDependency(Reference),

    #[error("Dependency resolution for target '{target}' stopped after {steps} steps")]
    ResolutionBudgetExceeded { target: String, steps: usize },

    #[error("Dependency cycle involving target '{target}'")]
    DependencyCycle { target: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl GraphError {
    /// Errors the resolver absorbs (skip one edge, truncate one closure)
    /// rather than aborting on
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::DanglingReference(_)
                | Self::KindMismatch { .. }
                | Self::UnlinkedDependency(_)
                | Self::ResolutionBudgetExceeded { .. }
        )
    }
}
