use crate::config::ResolverConfig;
use crate::error::{GraphError, Result};
use crate::model::DependencyModel;
use crate::nodes::{
    ContainerItemProxy, NativeTarget, NodeKind, SwiftPackageProductDependency, TargetDependency,
};
use crate::project::ProjectGraph;
use crate::types::{push_unique, NodeId, Reference, ResolvedEdge};
use std::collections::{HashMap, HashSet, VecDeque};

/// Computes per-target dependency closures over a decoded project.
///
/// Resolution runs in two phases:
///
/// 1. **Direct edges** - each candidate target's `dependencies` and
///    `packageProductDependencies` are followed to target and package nodes.
///    A reference that cannot be followed drops that one edge.
/// 2. **Closure** - breadth-first expansion of each target's direct edges
///    through other targets' direct edges. Packages are leaves.
///
/// Phase 2 reads every target's phase 1 result, so phase 1 completes for all
/// targets first.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    config: ResolverConfig,
}

/// Result of expanding one target
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Closure {
    pub(crate) edges: Vec<ResolvedEdge>,
    pub(crate) steps: usize,
    pub(crate) truncated: bool,
}

impl Resolver {
    pub fn new(config: ResolverConfig) -> Result<Self> {
        config.validate().map_err(GraphError::InvalidConfig)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve every candidate target of `graph`
    pub fn resolve(&self, graph: ProjectGraph) -> DependencyModel {
        let mut diagnostics = Vec::new();

        let targets = self.candidate_targets(&graph, &mut diagnostics);
        let packages: Vec<NodeId> = graph
            .all_as::<SwiftPackageProductDependency>()
            .map(|(id, _)| id)
            .collect();

        // Phase 1: direct edges
        let mut direct: HashMap<NodeId, Vec<ResolvedEdge>> = HashMap::with_capacity(targets.len());
        for &target in &targets {
            let edges = self.direct_edges(&graph, target, &mut diagnostics);
            direct.insert(target, edges);
        }

        // Phase 2: transitive closure
        let mut closures: HashMap<NodeId, Closure> = HashMap::with_capacity(targets.len());
        for &target in &targets {
            let name = target_name(&graph, target);
            let closure = expand(target, &direct[&target], &direct, self.config.step_budget);

            if closure.truncated {
                log::warn!(
                    "Dependency resolution for '{}' hit the step budget ({}); result is partial",
                    name,
                    self.config.step_budget
                );
                diagnostics.push(GraphError::ResolutionBudgetExceeded {
                    target: name.to_string(),
                    steps: closure.steps,
                });
            }

            log::debug!(
                "target: {}. Dependencies: {:?}",
                name,
                closure.edges.iter().map(ResolvedEdge::name).collect::<Vec<_>>()
            );
            closures.insert(target, closure);
        }

        for (_, package) in graph.all_as::<SwiftPackageProductDependency>() {
            log::debug!("package: {}", package.product_name);
        }

        log::info!(
            "Resolved dependencies for {} targets and {} packages ({} diagnostics)",
            targets.len(),
            packages.len(),
            diagnostics.len()
        );

        DependencyModel::new(graph, targets, packages, direct, closures, diagnostics)
    }

    /// Native targets listed by the root project, minus excluded product types
    fn candidate_targets(&self, graph: &ProjectGraph, diagnostics: &mut Vec<GraphError>) -> Vec<NodeId> {
        let mut targets = Vec::new();

        for reference in &graph.project().targets {
            match graph.lookup_id(reference.as_str(), NodeKind::NativeTarget) {
                Ok(id) => {
                    let Some(target) = graph.node(id).as_typed::<NativeTarget>() else {
                        continue;
                    };
                    if self.config.is_excluded(target.product_type.as_deref()) {
                        log::debug!("Skipping target '{}' (excluded product type)", target.name());
                        continue;
                    }
                    targets.push(id);
                }
                Err(GraphError::KindMismatch { found, .. }) if found.is_target() => {
                    log::debug!("Skipping {found} {reference}: only native targets are resolved");
                }
                Err(e) => {
                    log::debug!("Skipping project target {reference}: {e}");
                    diagnostics.push(e);
                }
            }
        }

        targets
    }

    /// Phase 1 for one target: deduplicated direct edges in declaration order
    fn direct_edges(
        &self,
        graph: &ProjectGraph,
        target: NodeId,
        diagnostics: &mut Vec<GraphError>,
    ) -> Vec<ResolvedEdge> {
        let mut edges = Vec::new();
        let Some(native) = graph.node(target).as_typed::<NativeTarget>() else {
            return edges;
        };

        for reference in native.dependencies() {
            match self.dependency_target(graph, reference) {
                Ok(Some((node, dependency))) => {
                    push_unique(
                        &mut edges,
                        ResolvedEdge::Native {
                            node,
                            name: dependency.name().to_string(),
                        },
                    );
                }
                Ok(None) => {}
                Err(e) => {
                    log::debug!("{}: skipping dependency {reference}: {e}", native.name());
                    diagnostics.push(e);
                }
            }
        }

        for reference in &native.package_product_dependencies {
            match graph.lookup_id(reference.as_str(), NodeKind::SwiftPackageProductDependency) {
                Ok(node) => {
                    if let Some(package) = graph.node(node).as_typed::<SwiftPackageProductDependency>() {
                        push_unique(
                            &mut edges,
                            ResolvedEdge::Package {
                                node,
                                name: package.product_name.clone(),
                            },
                        );
                    }
                }
                Err(e) => {
                    log::debug!("{}: skipping package {reference}: {e}", native.name());
                    diagnostics.push(e);
                }
            }
        }

        edges
    }

    /// Follow a `PBXTargetDependency` to the native target it names, either
    /// directly or through a container item proxy's remote id.
    /// `Ok(None)` means the target exists but is excluded.
    fn dependency_target<'g>(
        &self,
        graph: &'g ProjectGraph,
        reference: &Reference,
    ) -> Result<Option<(NodeId, &'g NativeTarget)>> {
        let dependency = graph.lookup_as::<TargetDependency>(reference.as_str())?;

        let target_ref = match (&dependency.target, &dependency.target_proxy) {
            (Some(target), _) => target,
            (None, Some(proxy)) => {
                &graph
                    .lookup_as::<ContainerItemProxy>(proxy.as_str())?
                    .remote_global_id
            }
            (None, None) => return Err(GraphError::UnlinkedDependency(reference.clone())),
        };

        let id = graph.lookup_id(target_ref.as_str(), NodeKind::NativeTarget)?;
        let Some(target) = graph.node(id).as_typed::<NativeTarget>() else {
            return Ok(None);
        };

        if self.config.is_excluded(target.product_type.as_deref()) {
            log::debug!("Dropping dependency on excluded target '{}'", target.name());
            return Ok(None);
        }

        Ok(Some((id, target)))
    }
}

fn target_name(graph: &ProjectGraph, target: NodeId) -> &str {
    graph
        .node(target)
        .as_typed::<NativeTarget>()
        .map_or("", NativeTarget::name)
}

/// Phase 2 for one target.
///
/// FIFO worklist seeded with the target's direct edges; `seen` is keyed by
/// dependency name. Native edges back to `own` are dropped so a target never
/// lists itself, while a package named like its target is kept. Native edges
/// enqueue that target's direct edges, package edges are terminal. `budget`
/// caps the number of pops.
pub(crate) fn expand(
    own: NodeId,
    seeds: &[ResolvedEdge],
    direct: &HashMap<NodeId, Vec<ResolvedEdge>>,
    budget: usize,
) -> Closure {
    let mut closure = Closure::default();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut worklist: VecDeque<&ResolvedEdge> = seeds.iter().collect();

    while let Some(edge) = worklist.pop_front() {
        if closure.steps == budget {
            closure.truncated = true;
            break;
        }
        closure.steps += 1;

        if matches!(edge, ResolvedEdge::Native { node, .. } if *node == own) {
            continue;
        }

        if !seen.insert(edge.name()) {
            continue;
        }

        closure.edges.push(edge.clone());

        if let ResolvedEdge::Native { node, .. } = edge {
            if let Some(next) = direct.get(node) {
                worklist.extend(next.iter());
            }
        }
    }

    closure
}
