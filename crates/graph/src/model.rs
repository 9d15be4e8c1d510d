use crate::error::{GraphError, Result};
use crate::nodes::{FileReference, NativeTarget, SwiftPackageProductDependency};
use crate::project::ProjectGraph;
use crate::resolver::Closure;
use crate::types::{EdgeKind, NodeId, ResolvedEdge};
use petgraph::algo::{tarjan_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

/// Resolved dependency model: the decoded graph plus, for every candidate
/// target, its direct and transitive dependency edges.
#[derive(Debug)]
pub struct DependencyModel {
    graph: ProjectGraph,

    /// Candidate native targets, in project order
    targets: Vec<NodeId>,

    /// Package product dependencies, in decode order
    packages: Vec<NodeId>,

    direct: HashMap<NodeId, Vec<ResolvedEdge>>,
    closures: HashMap<NodeId, Closure>,

    /// Non-fatal problems absorbed during resolution
    diagnostics: Vec<GraphError>,
}

impl DependencyModel {
    pub(crate) fn new(
        graph: ProjectGraph,
        targets: Vec<NodeId>,
        packages: Vec<NodeId>,
        direct: HashMap<NodeId, Vec<ResolvedEdge>>,
        closures: HashMap<NodeId, Closure>,
        diagnostics: Vec<GraphError>,
    ) -> Self {
        Self {
            graph,
            targets,
            packages,
            direct,
            closures,
            diagnostics,
        }
    }

    pub fn graph(&self) -> &ProjectGraph {
        &self.graph
    }

    /// Candidate targets with their payloads
    pub fn targets(&self) -> impl Iterator<Item = (NodeId, &NativeTarget)> {
        self.targets
            .iter()
            .filter_map(|&id| self.native(id).map(|target| (id, target)))
    }

    pub fn packages(&self) -> impl Iterator<Item = (NodeId, &SwiftPackageProductDependency)> {
        self.packages.iter().filter_map(|&id| {
            self.graph
                .node(id)
                .as_typed::<SwiftPackageProductDependency>()
                .map(|package| (id, package))
        })
    }

    pub fn is_candidate(&self, target: NodeId) -> bool {
        self.closures.contains_key(&target)
    }

    /// Phase 1 edges of a candidate target; empty for anything else
    pub fn direct_dependencies(&self, target: NodeId) -> &[ResolvedEdge] {
        self.direct
            .get(&target)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Transitive dependencies of a candidate target in breadth-first
    /// discovery order, deduplicated by name; empty for anything else
    pub fn dependencies(&self, target: NodeId) -> &[ResolvedEdge] {
        self.closures
            .get(&target)
            .map(|closure| closure.edges.as_slice())
            .unwrap_or_default()
    }

    /// Whether the target's closure stopped at the step budget
    pub fn is_truncated(&self, target: NodeId) -> bool {
        self.closures
            .get(&target)
            .is_some_and(|closure| closure.truncated)
    }

    pub fn diagnostics(&self) -> &[GraphError] {
        &self.diagnostics
    }

    /// Candidate target by target name, then by product name
    pub fn target_named(&self, name: &str) -> Option<NodeId> {
        self.targets()
            .find(|(_, target)| target.name() == name)
            .or_else(|| self.targets().find(|(_, target)| target.product_name() == Some(name)))
            .map(|(id, _)| id)
    }

    /// Package dependency by product name
    pub fn package_named(&self, product_name: &str) -> Option<NodeId> {
        self.packages()
            .find(|(_, package)| package.product_name == product_name)
            .map(|(id, _)| id)
    }

    /// Names of everything the named target transitively depends on.
    /// Unknown names and packages yield an empty list.
    pub fn dependency_names(&self, name: &str) -> Vec<String> {
        self.target_named(name)
            .map(|id| {
                self.dependencies(id)
                    .iter()
                    .map(|edge| edge.name().to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Last path component of the target's product file reference, ignoring
    /// trailing slashes (e.g. `App.app`); with `strip_extension`, everything from the first `.`
    /// is dropped (`App`).
    pub fn product_path(&self, target: NodeId, strip_extension: bool) -> Option<String> {
        let native = self.native(target)?;

        let Some(product_reference) = &native.product_reference else {
            log::debug!(
                "No product reference for target '{}'; possibly a package description",
                native.name()
            );
            return None;
        };

        let Some(file) = self.graph.get_as::<FileReference>(product_reference.as_str()) else {
            log::warn!(
                "Product reference {product_reference} of target '{}' is not a file reference",
                native.name()
            );
            return None;
        };

        let trimmed = file.path.trim_end_matches('/');
        let mut path = trimmed.rsplit('/').next().unwrap_or(trimmed).to_string();
        if strip_extension {
            if let Some(dot) = path.find('.') {
                path.truncate(dot);
            }
        }
        Some(path)
    }

    /// Direct native dependencies between candidate targets as a petgraph
    /// graph; edges point from dependency to dependent.
    pub fn dependency_graph(&self) -> (DiGraph<NodeId, EdgeKind>, HashMap<NodeId, NodeIndex>) {
        let mut graph = DiGraph::with_capacity(self.targets.len(), self.targets.len());
        let mut index = HashMap::with_capacity(self.targets.len());

        for &target in &self.targets {
            index.insert(target, graph.add_node(target));
        }

        for &target in &self.targets {
            for edge in self.direct_dependencies(target) {
                if let (Some(&from), Some(&to)) = (index.get(&edge.node()), index.get(&target)) {
                    if edge.is_native() {
                        graph.add_edge(from, to, EdgeKind::Native);
                    }
                }
            }
        }

        (graph, index)
    }

    /// Candidate targets ordered so each comes after the targets it depends on
    pub fn build_order(&self) -> Result<Vec<NodeId>> {
        let (graph, _) = self.dependency_graph();

        match toposort(&graph, None) {
            Ok(order) => Ok(order.into_iter().map(|idx| graph[idx]).collect()),
            Err(cycle) => Err(GraphError::DependencyCycle {
                target: self.name_of(graph[cycle.node_id()]).to_string(),
            }),
        }
    }

    /// Groups of candidate targets that depend on each other in a cycle
    pub fn dependency_cycles(&self) -> Vec<Vec<String>> {
        let (graph, _) = self.dependency_graph();

        tarjan_scc(&graph)
            .into_iter()
            .filter(|component| {
                component.len() > 1
                    || component
                        .first()
                        .is_some_and(|&idx| graph.contains_edge(idx, idx))
            })
            .map(|component| {
                let mut names: Vec<String> = component
                    .into_iter()
                    .map(|idx| self.name_of(graph[idx]).to_string())
                    .collect();
                names.sort();
                names
            })
            .collect()
    }

    /// Target name or package product name of a node
    pub fn name_of(&self, node: NodeId) -> &str {
        let node = self.graph.node(node);
        if let Some(target) = node.as_typed::<NativeTarget>() {
            return target.name();
        }
        if let Some(package) = node.as_typed::<SwiftPackageProductDependency>() {
            return &package.product_name;
        }
        node.reference().as_str()
    }

    fn native(&self, id: NodeId) -> Option<&NativeTarget> {
        self.graph.node(id).as_typed::<NativeTarget>()
    }
}
