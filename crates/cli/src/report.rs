use serde::Serialize;
use std::fmt::Write as _;
use xcdeps_graph::{
    CatalogMatch, DependencyLookup, DependencyModel, EdgeKind, MatchedKey, ResolvedEdge,
};

#[derive(Debug, Serialize)]
pub struct EdgeReport {
    pub name: String,
    pub kind: EdgeKind,
}

impl From<&ResolvedEdge> for EdgeReport {
    fn from(edge: &ResolvedEdge) -> Self {
        Self {
            name: edge.name().to_string(),
            kind: edge.kind(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TargetReport {
    pub name: String,
    pub product_name: Option<String>,
    pub product_path: Option<String>,
    pub direct: Vec<EdgeReport>,
    pub dependencies: Vec<EdgeReport>,
    pub truncated: bool,
}

#[derive(Debug, Serialize)]
pub struct ResolveReport {
    pub targets: Vec<TargetReport>,
    pub packages: Vec<String>,
    pub cycles: Vec<Vec<String>>,
    pub diagnostics: Vec<String>,
}

impl ResolveReport {
    pub fn new(model: &DependencyModel) -> Self {
        let targets = model
            .targets()
            .map(|(id, target)| TargetReport {
                name: target.name().to_string(),
                product_name: target.product_name().map(str::to_string),
                product_path: model.product_path(id, false),
                direct: model.direct_dependencies(id).iter().map(EdgeReport::from).collect(),
                dependencies: model.dependencies(id).iter().map(EdgeReport::from).collect(),
                truncated: model.is_truncated(id),
            })
            .collect();

        Self {
            targets,
            packages: model
                .packages()
                .map(|(_, package)| package.product_name.clone())
                .collect(),
            cycles: model.dependency_cycles(),
            diagnostics: model.diagnostics().iter().map(ToString::to_string).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LookupReport {
    pub key: String,
    pub name: String,
    pub kind: EdgeKind,
    pub matched: MatchedKey,
    pub output_path: Option<String>,
    pub dependencies: Vec<String>,
    pub dependencies_matched: MatchedKey,
}

impl LookupReport {
    pub fn new(key: &str, hit: CatalogMatch<'_>, dependencies: DependencyLookup) -> Self {
        Self {
            key: key.to_string(),
            name: hit.entry.name.clone(),
            kind: hit.entry.backing.kind(),
            matched: hit.matched,
            output_path: hit.entry.output_path.clone(),
            dependencies: dependencies.names,
            dependencies_matched: dependencies.matched,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OrderReport {
    pub order: Vec<String>,
}

pub fn render_resolve(report: &ResolveReport) -> String {
    let mut out = String::new();

    for target in &report.targets {
        let _ = match &target.product_path {
            Some(path) => writeln!(out, "{} ({})", target.name, path),
            None => writeln!(out, "{}", target.name),
        };
        if target.dependencies.is_empty() {
            out.push_str("  (no dependencies)\n");
        }
        for edge in &target.dependencies {
            let _ = writeln!(out, "  -> {}{}", edge.name, kind_suffix(edge.kind));
        }
        if target.truncated {
            out.push_str("  (truncated at step budget)\n");
        }
    }

    if !report.packages.is_empty() {
        let _ = writeln!(out, "\nPackages: {}", report.packages.join(", "));
    }

    for cycle in &report.cycles {
        let _ = writeln!(out, "Cycle: {}", cycle.join(" <-> "));
    }

    if !report.diagnostics.is_empty() {
        let _ = writeln!(out, "\nDiagnostics ({}):", report.diagnostics.len());
        for diagnostic in &report.diagnostics {
            let _ = writeln!(out, "  - {diagnostic}");
        }
    }

    out
}

pub fn render_lookup(report: &LookupReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}{} (matched by {})",
        report.name,
        kind_suffix(report.kind),
        matched_label(report.matched)
    );
    if let Some(path) = &report.output_path {
        let _ = writeln!(out, "  output: {path}");
    }
    for name in &report.dependencies {
        let _ = writeln!(out, "  -> {name}");
    }
    if report.dependencies_matched != MatchedKey::Name {
        let _ = writeln!(
            out,
            "  (dependencies found by {})",
            matched_label(report.dependencies_matched)
        );
    }
    out
}

pub fn render_order(report: &OrderReport) -> String {
    let mut out = String::new();
    for (position, name) in report.order.iter().enumerate() {
        let _ = writeln!(out, "{:>3}. {}", position + 1, name);
    }
    out
}

fn kind_suffix(kind: EdgeKind) -> &'static str {
    match kind {
        EdgeKind::Native => "",
        EdgeKind::Package => " [package]",
    }
}

fn matched_label(matched: MatchedKey) -> &'static str {
    match matched {
        MatchedKey::Name => "name",
        MatchedKey::ProductName => "product name",
        MatchedKey::OutputPath => "output path",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_resolve_marks_packages_and_truncation() {
        let report = ResolveReport {
            targets: vec![TargetReport {
                name: "App".to_string(),
                product_name: Some("App".to_string()),
                product_path: Some("App.app".to_string()),
                direct: vec![],
                dependencies: vec![
                    EdgeReport {
                        name: "Lib".to_string(),
                        kind: EdgeKind::Native,
                    },
                    EdgeReport {
                        name: "Pkg".to_string(),
                        kind: EdgeKind::Package,
                    },
                ],
                truncated: true,
            }],
            packages: vec!["Pkg".to_string()],
            cycles: vec![],
            diagnostics: vec!["dangling reference X".to_string()],
        };

        let text = render_resolve(&report);
        assert!(text.starts_with("App (App.app)\n"));
        assert!(text.contains("  -> Lib\n"));
        assert!(text.contains("  -> Pkg [package]\n"));
        assert!(text.contains("truncated"));
        assert!(text.contains("Diagnostics (1):"));
    }

    #[test]
    fn test_render_order_numbers_lines() {
        let report = OrderReport {
            order: vec!["Kit".to_string(), "App".to_string()],
        };
        assert_eq!(render_order(&report), "  1. Kit\n  2. App\n");
    }
}
