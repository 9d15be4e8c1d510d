use crate::error::{GraphError, Result};
use crate::nodes::Node;
use crate::project::ProjectGraph;
use crate::registry;
use crate::types::Reference;
use serde_json::Value;
use std::path::{Path, PathBuf};
use xcdeps_plist::Format;

/// File inside an `.xcodeproj` bundle holding the object graph
pub const PROJECT_FILE_NAME: &str = "project.pbxproj";

/// Decode project documents into a [`ProjectGraph`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectDecoder {
    format: Format,
}

impl ProjectDecoder {
    pub fn new(format: Format) -> Self {
        Self { format }
    }

    /// Decode a `project.pbxproj` file, or an `.xcodeproj` directory containing one
    pub fn decode_path(&self, path: impl AsRef<Path>) -> Result<ProjectGraph> {
        let file = project_file(path.as_ref());
        log::debug!("Reading project file {}", file.display());
        let document = xcdeps_plist::from_path(&file, self.format)?;
        self.decode_value(document)
    }

    pub fn decode_str(&self, text: &str) -> Result<ProjectGraph> {
        let document = xcdeps_plist::from_str(text, self.format)?;
        self.decode_value(document)
    }

    /// Decode an already-parsed document tree.
    ///
    /// Single pass over `objects`: look up each record's `isa` in the registry,
    /// decode the body, attach the outer key as the node's reference. No
    /// cross-reference checks happen here; dangling references surface at
    /// lookup time.
    pub fn decode_value(&self, document: Value) -> Result<ProjectGraph> {
        let Value::Object(mut root) = document else {
            return Err(GraphError::InvalidDocument(
                "top-level value is not a dictionary".to_string(),
            ));
        };

        let declared_root = match root.get("rootObject") {
            Some(Value::String(reference)) => Reference::from(reference.as_str()),
            Some(_) => {
                return Err(GraphError::InvalidDocument(
                    "rootObject is not a string".to_string(),
                ))
            }
            None => return Err(GraphError::InvalidDocument("missing rootObject".to_string())),
        };

        let objects = match root.remove("objects") {
            Some(Value::Object(objects)) => objects,
            Some(_) => {
                return Err(GraphError::InvalidDocument(
                    "objects is not a dictionary".to_string(),
                ))
            }
            None => return Err(GraphError::InvalidDocument("missing objects".to_string())),
        };

        let mut nodes = Vec::with_capacity(objects.len());
        for (key, record) in objects {
            nodes.push(decode_object(Reference::from(key), record)?);
        }

        let graph = ProjectGraph::from_nodes(nodes, declared_root)?;

        log::info!(
            "Decoded project graph: {} objects, {} targets",
            graph.len(),
            graph.project().targets.len()
        );

        Ok(graph)
    }
}

fn decode_object(reference: Reference, record: Value) -> Result<Node> {
    let isa = match record.get("isa") {
        Some(Value::String(isa)) => isa.clone(),
        Some(_) => {
            return Err(GraphError::MalformedNode {
                reference,
                kind: None,
                message: "isa is not a string".to_string(),
            })
        }
        None => {
            return Err(GraphError::MalformedNode {
                reference,
                kind: None,
                message: "record has no isa".to_string(),
            })
        }
    };

    let rule = registry::rule_for(&isa).ok_or_else(|| GraphError::UnknownNodeKind {
        reference: reference.clone(),
        isa: isa.clone(),
    })?;

    let payload = rule.decode(record).map_err(|e| GraphError::MalformedNode {
        reference: reference.clone(),
        kind: Some(rule.kind),
        message: e.to_string(),
    })?;

    Ok(Node::new(reference, payload))
}

/// Accept either the bundle directory or the file itself
fn project_file(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(PROJECT_FILE_NAME)
    } else {
        path.to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::NodeKind;
    use serde_json::json;

    fn decode(document: Value) -> Result<ProjectGraph> {
        ProjectDecoder::default().decode_value(document)
    }

    #[test]
    fn test_reference_comes_from_outer_key() {
        // A body field that looks like a reference must not leak into identity
        let graph = decode(json!({
            "rootObject": "ROOT",
            "objects": {
                "ROOT": { "isa": "PBXProject", "reference": "IMPOSTOR", "targets": [] },
                "FILE": { "isa": "PBXFileReference", "path": "a.swift", "reference": "OTHER" },
            }
        }))
        .unwrap();

        for (_, node) in graph.nodes() {
            assert!(["ROOT", "FILE"].contains(&node.reference().as_str()));
        }
        assert!(graph.get("FILE", NodeKind::FileReference).is_some());
        assert!(graph.get("OTHER", NodeKind::FileReference).is_none());
    }

    #[test]
    fn test_unknown_kind_fails_whole_decode() {
        let err = decode(json!({
            "rootObject": "ROOT",
            "objects": {
                "ROOT": { "isa": "PBXProject" },
                "X": { "isa": "PBXFileSystemSynchronizedRootGroup" },
            }
        }))
        .unwrap_err();

        match err {
            GraphError::UnknownNodeKind { reference, isa } => {
                assert_eq!(reference.as_str(), "X");
                assert_eq!(isa, "PBXFileSystemSynchronizedRootGroup");
            }
            other => panic!("expected UnknownNodeKind, got {other:?}"),
        }
    }

    #[test]
    fn test_record_without_isa() {
        let err = decode(json!({
            "rootObject": "ROOT",
            "objects": { "ROOT": { "isa": "PBXProject" }, "X": { "path": "a" } }
        }))
        .unwrap_err();
        assert!(matches!(
            err,
            GraphError::MalformedNode { ref reference, kind: None, .. } if reference.as_str() == "X"
        ));
    }

    #[test]
    fn test_missing_required_field_is_malformed() {
        let err = decode(json!({
            "rootObject": "ROOT",
            "objects": {
                "ROOT": { "isa": "PBXProject" },
                "T": { "isa": "PBXNativeTarget", "productType": "x" },
            }
        }))
        .unwrap_err();
        assert!(matches!(
            err,
            GraphError::MalformedNode {
                kind: Some(NodeKind::NativeTarget),
                ..
            }
        ));
        assert!(err.to_string().contains("(PBXNativeTarget)"), "{err}");
    }

    #[test]
    fn test_root_must_be_unique() {
        let none = decode(json!({
            "rootObject": "ROOT",
            "objects": { "F": { "isa": "PBXFileReference", "path": "x" } }
        }));
        assert!(matches!(none, Err(GraphError::MissingRoot)));

        let two = decode(json!({
            "rootObject": "A",
            "objects": { "A": { "isa": "PBXProject" }, "B": { "isa": "PBXProject" } }
        }));
        match two {
            Err(GraphError::AmbiguousRoot { references }) => assert_eq!(references.len(), 2),
            other => panic!("expected AmbiguousRoot, got {other:?}"),
        }

        let one = decode(json!({
            "rootObject": "A",
            "objects": { "A": { "isa": "PBXProject" } }
        }));
        assert!(one.is_ok());
    }

    #[test]
    fn test_root_object_must_name_project() {
        let err = decode(json!({
            "rootObject": "F",
            "objects": {
                "A": { "isa": "PBXProject" },
                "F": { "isa": "PBXFileReference", "path": "x" },
            }
        }))
        .unwrap_err();
        assert!(matches!(err, GraphError::RootMismatch { .. }));
    }

    #[test]
    fn test_document_shape_errors() {
        assert!(matches!(
            decode(json!([])),
            Err(GraphError::InvalidDocument(_))
        ));
        assert!(matches!(
            decode(json!({ "objects": {} })),
            Err(GraphError::InvalidDocument(msg)) if msg.contains("rootObject")
        ));
        assert!(matches!(
            decode(json!({ "rootObject": "A" })),
            Err(GraphError::InvalidDocument(msg)) if msg.contains("objects")
        ));
    }

    #[test]
    fn test_dangling_references_are_not_checked_at_decode() {
        let graph = decode(json!({
            "rootObject": "A",
            "objects": { "A": { "isa": "PBXProject", "targets": ["GONE"] } }
        }))
        .unwrap();
        assert!(graph.get("GONE", NodeKind::NativeTarget).is_none());
    }
}
