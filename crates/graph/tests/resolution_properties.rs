use pretty_assertions::assert_eq;
use serde_json::{json, Map, Value};
use xcdeps_graph::{
    DependencyModel, EdgeKind, GraphError, ProjectDecoder, ProjectGraph, Resolver,
    ResolverConfig,
};

/// Document whose root project lists `targets`; `objects` gets `P` added
fn graph(targets: &[&str], objects: Value) -> ProjectGraph {
    let Value::Object(objects) = objects else {
        panic!("objects must be a dictionary");
    };

    let mut all = Map::new();
    all.insert(
        "P".to_string(),
        json!({ "isa": "PBXProject", "targets": targets }),
    );
    all.extend(objects);

    let document = json!({
        "archiveVersion": "1",
        "objectVersion": "56",
        "objects": all,
        "rootObject": "P",
    });
    ProjectDecoder::default().decode_value(document).unwrap()
}

fn native(name: &str, dependencies: &[&str], packages: &[&str]) -> Value {
    json!({
        "isa": "PBXNativeTarget",
        "name": name,
        "productType": "com.apple.product-type.framework",
        "dependencies": dependencies,
        "packageProductDependencies": packages,
    })
}

fn depends_on(target: &str) -> Value {
    json!({ "isa": "PBXTargetDependency", "target": target })
}

fn package(product_name: &str) -> Value {
    json!({ "isa": "XCSwiftPackageProductDependency", "productName": product_name })
}

fn closure(model: &DependencyModel, target: &str) -> Vec<(EdgeKind, String)> {
    let id = model.target_named(target).unwrap();
    model
        .dependencies(id)
        .iter()
        .map(|edge| (edge.kind(), edge.name().to_string()))
        .collect()
}

fn names(model: &DependencyModel, target: &str) -> Vec<String> {
    model.dependency_names(target)
}

#[test]
fn chain_through_library_to_package() {
    let model = Resolver::default().resolve(graph(
        &["APP", "LIB"],
        json!({
            "APP": native("App", &["D1"], &[]),
            "D1": depends_on("LIB"),
            "LIB": native("Lib", &[], &["PKG"]),
            "PKG": package("Pkg"),
        }),
    ));

    assert_eq!(
        closure(&model, "App"),
        vec![
            (EdgeKind::Native, "Lib".to_string()),
            (EdgeKind::Package, "Pkg".to_string()),
        ]
    );
    assert_eq!(
        closure(&model, "Lib"),
        vec![(EdgeKind::Package, "Pkg".to_string())]
    );
    assert!(model.diagnostics().is_empty());
}

#[test]
fn mutual_dependency_terminates() {
    let model = Resolver::default().resolve(graph(
        &["A", "B"],
        json!({
            "A": native("A", &["DB"], &[]),
            "DB": depends_on("B"),
            "B": native("B", &["DA"], &[]),
            "DA": depends_on("A"),
        }),
    ));

    assert_eq!(names(&model, "A"), vec!["B"]);
    assert_eq!(names(&model, "B"), vec!["A"]);
    assert_eq!(model.dependency_cycles(), vec![vec!["A".to_string(), "B".to_string()]]);
    assert!(matches!(
        model.build_order(),
        Err(GraphError::DependencyCycle { .. })
    ));
}

#[test]
fn target_never_lists_itself() {
    let model = Resolver::default().resolve(graph(
        &["A"],
        json!({
            "A": native("A", &["SELF"], &[]),
            "SELF": depends_on("A"),
        }),
    ));

    assert!(names(&model, "A").is_empty());
}

#[test]
fn package_named_like_its_target_is_kept() {
    let model = Resolver::default().resolve(graph(
        &["SENTRY", "APP"],
        json!({
            "SENTRY": native("Sentry", &[], &["PKG"]),
            "APP": native("App", &["D1"], &[]),
            "D1": depends_on("SENTRY"),
            "PKG": package("Sentry"),
        }),
    ));

    let sentry = model.target_named("Sentry").unwrap();
    assert_eq!(model.direct_dependencies(sentry).len(), 1);
    assert_eq!(
        closure(&model, "Sentry"),
        vec![(EdgeKind::Package, "Sentry".to_string())]
    );
    // first discovery of the name wins
    assert_eq!(
        closure(&model, "App"),
        vec![(EdgeKind::Native, "Sentry".to_string())]
    );
}

#[test]
fn duplicate_names_collapse_to_first_discovery() {
    let model = Resolver::default().resolve(graph(
        &["APP", "LIB", "UTIL"],
        json!({
            "APP": native("App", &["D1", "D2", "D1"], &["PKG"]),
            "D1": depends_on("LIB"),
            "D2": depends_on("UTIL"),
            "LIB": native("Lib", &["D2"], &["PKG"]),
            "UTIL": native("Util", &[], &["PKG"]),
            "PKG": package("Pkg"),
        }),
    ));

    let app = model.target_named("App").unwrap();
    assert_eq!(model.direct_dependencies(app).len(), 3);
    assert_eq!(names(&model, "App"), vec!["Lib", "Util", "Pkg"]);
}

#[test]
fn packages_are_leaves() {
    let model = Resolver::default().resolve(graph(
        &["APP"],
        json!({
            "APP": native("App", &[], &["PKG"]),
            "PKG": package("Pkg"),
        }),
    ));

    let pkg = model.package_named("Pkg").unwrap();
    assert!(!model.is_candidate(pkg));
    assert!(model.dependencies(pkg).is_empty());
    assert!(names(&model, "Pkg").is_empty());
    assert_eq!(model.packages().count(), 1);
}

#[test]
fn resolution_is_repeatable() {
    let graph = graph(
        &["APP", "LIB"],
        json!({
            "APP": native("App", &["D1"], &["PKG"]),
            "D1": depends_on("LIB"),
            "LIB": native("Lib", &[], &["PKG"]),
            "PKG": package("Pkg"),
        }),
    );

    let resolver = Resolver::default();
    let first = resolver.resolve(graph.clone());
    let second = resolver.resolve(graph);

    for target in ["App", "Lib"] {
        assert_eq!(closure(&first, target), closure(&second, target));
    }
}

#[test]
fn proxy_dependency_uses_remote_global_id() {
    let model = Resolver::default().resolve(graph(
        &["APP", "EXT"],
        json!({
            "APP": native("App", &["D1"], &[]),
            "D1": { "isa": "PBXTargetDependency", "targetProxy": "PX" },
            "PX": {
                "isa": "PBXContainerItemProxy",
                "containerPortal": "P",
                "proxyType": "1",
                "remoteGlobalIDString": "EXT",
                "remoteInfo": "Ext",
            },
            "EXT": native("Ext", &[], &[]),
        }),
    ));

    assert_eq!(names(&model, "App"), vec!["Ext"]);
}

#[test]
fn broken_references_drop_only_their_edge() {
    let model = Resolver::default().resolve(graph(
        &["APP", "LIB", "MISSING"],
        json!({
            "APP": native("App", &["D1", "DGONE", "DLOOSE"], &["FILE", "PKG"]),
            "D1": depends_on("LIB"),
            "DGONE": depends_on("GONE"),
            "DLOOSE": { "isa": "PBXTargetDependency" },
            "LIB": native("Lib", &[], &[]),
            "FILE": { "isa": "PBXFileReference", "path": "Lib.framework" },
            "PKG": package("Pkg"),
        }),
    ));

    assert_eq!(names(&model, "App"), vec!["Lib", "Pkg"]);

    let diagnostics = model.diagnostics();
    assert_eq!(diagnostics.len(), 4, "{diagnostics:?}");
    assert!(diagnostics
        .iter()
        .any(|e| matches!(e, GraphError::DanglingReference(r) if r.as_str() == "MISSING")));
    assert!(diagnostics
        .iter()
        .any(|e| matches!(e, GraphError::DanglingReference(r) if r.as_str() == "GONE")));
    assert!(diagnostics
        .iter()
        .any(|e| matches!(e, GraphError::UnlinkedDependency(r) if r.as_str() == "DLOOSE")));
    assert!(diagnostics
        .iter()
        .any(|e| matches!(e, GraphError::KindMismatch { reference, .. } if reference.as_str() == "FILE")));
    assert!(diagnostics.iter().all(GraphError::is_local));
}

#[test]
fn aggregate_targets_are_skipped_quietly() {
    let model = Resolver::default().resolve(graph(
        &["APP", "AGG"],
        json!({
            "APP": native("App", &[], &[]),
            "AGG": { "isa": "PBXAggregateTarget", "name": "Everything" },
        }),
    ));

    assert_eq!(model.targets().count(), 1);
    assert!(model.target_named("Everything").is_none());
    assert!(model.diagnostics().is_empty());
}

#[test]
fn excluded_product_types_are_configurable() {
    let graph = graph(
        &["APP", "LIB"],
        json!({
            "APP": native("App", &["D1"], &[]),
            "D1": depends_on("LIB"),
            "LIB": native("Lib", &[], &[]),
        }),
    );

    let config = ResolverConfig {
        excluded_product_types: vec!["com.apple.product-type.framework".to_string()],
        ..ResolverConfig::default()
    };
    let model = Resolver::new(config).unwrap().resolve(graph);

    assert_eq!(model.targets().count(), 0);
    assert!(model.diagnostics().is_empty());
}

#[test]
fn step_budget_truncates_and_reports() {
    let graph = graph(
        &["A", "B", "C", "D"],
        json!({
            "A": native("A", &["DB"], &[]),
            "DB": depends_on("B"),
            "B": native("B", &["DC"], &[]),
            "DC": depends_on("C"),
            "C": native("C", &["DD"], &[]),
            "DD": depends_on("D"),
            "D": native("D", &[], &[]),
        }),
    );

    let resolver = Resolver::new(ResolverConfig::default().with_step_budget(2)).unwrap();
    let model = resolver.resolve(graph);

    assert_eq!(names(&model, "A"), vec!["B", "C"]);
    assert!(model.is_truncated(model.target_named("A").unwrap()));
    assert_eq!(names(&model, "B"), vec!["C", "D"]);
    assert!(!model.is_truncated(model.target_named("B").unwrap()));

    assert!(matches!(
        model.diagnostics(),
        [GraphError::ResolutionBudgetExceeded { target, steps: 2 }] if target == "A"
    ));
}

#[test]
fn zero_budget_is_rejected() {
    let err = Resolver::new(ResolverConfig::default().with_step_budget(0)).unwrap_err();
    assert!(matches!(err, GraphError::InvalidConfig(_)));
}
