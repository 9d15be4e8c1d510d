use crate::model::DependencyModel;
use crate::types::{EdgeKind, NodeId};
use serde::Serialize;

/// What a catalog entry is backed by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backing {
    Native(NodeId),
    Package(NodeId),
}

impl Backing {
    pub fn node(self) -> NodeId {
        match self {
            Backing::Native(id) | Backing::Package(id) => id,
        }
    }

    pub fn kind(self) -> EdgeKind {
        match self {
            Backing::Native(_) => EdgeKind::Native,
            Backing::Package(_) => EdgeKind::Package,
        }
    }
}

/// A target or package as external tools address it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Target name, or product name for packages
    pub name: String,
    pub product_name: Option<String>,
    /// File name of the built product (targets only)
    pub output_path: Option<String>,
    pub backing: Backing,
}

/// Which key a lookup matched on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchedKey {
    Name,
    ProductName,
    OutputPath,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogMatch<'a> {
    pub entry: &'a CatalogEntry,
    pub matched: MatchedKey,
}

/// Dependency names of an entry and the key that produced them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyLookup {
    pub names: Vec<String>,
    pub matched: MatchedKey,
}

/// Name-addressable view over resolved targets and package dependencies.
///
/// Build-log matching and product-path resolution address targets by
/// different names, so lookups fall back from target name to product name to
/// output path, and report which one hit.
#[derive(Debug)]
pub struct TargetCatalog<'m> {
    model: &'m DependencyModel,
    entries: Vec<CatalogEntry>,
}

impl<'m> TargetCatalog<'m> {
    /// Catalog of every candidate target followed by every package dependency
    pub fn new(model: &'m DependencyModel) -> Self {
        let mut catalog = Self {
            model,
            entries: Vec::new(),
        };

        for (id, target) in model.targets() {
            catalog.insert(CatalogEntry {
                name: target.name().to_string(),
                product_name: target.product_name().map(str::to_string),
                output_path: model.product_path(id, false),
                backing: Backing::Native(id),
            });
        }

        for (id, package) in model.packages() {
            catalog.insert(CatalogEntry {
                name: package.product_name.clone(),
                product_name: None,
                output_path: None,
                backing: Backing::Package(id),
            });
        }

        catalog
    }

    /// Insert unless an entry with the same name exists.
    /// Returns whether it was inserted, and the entry now stored under the name.
    pub fn insert(&mut self, entry: CatalogEntry) -> (bool, &CatalogEntry) {
        if let Some(pos) = self.entries.iter().position(|e| e.name == entry.name) {
            log::debug!("Catalog already holds '{}', keeping existing entry", entry.name);
            return (false, &self.entries[pos]);
        }
        self.entries.push(entry);
        let last = self.entries.len() - 1;
        (true, &self.entries[last])
    }

    /// Find an entry by name, then product name, then output path
    pub fn lookup(&self, key: &str) -> Option<CatalogMatch<'_>> {
        if let Some(entry) = self.entries.iter().find(|e| e.name == key) {
            return Some(CatalogMatch {
                entry,
                matched: MatchedKey::Name,
            });
        }

        if let Some(entry) = self
            .entries
            .iter()
            .find(|e| e.product_name.as_deref() == Some(key))
        {
            return Some(CatalogMatch {
                entry,
                matched: MatchedKey::ProductName,
            });
        }

        self.entries
            .iter()
            .filter(|e| matches!(e.backing, Backing::Native(_)))
            .find(|e| e.output_path.as_deref() == Some(key))
            .map(|entry| CatalogMatch {
                entry,
                matched: MatchedKey::OutputPath,
            })
    }

    /// Transitive dependency names of an entry.
    ///
    /// Queried by the entry's name first; if that yields nothing and the entry
    /// has a product name, the product name is tried. `matched` says which one
    /// produced the result so callers can spot naming mismatches.
    pub fn dependencies(&self, entry: &CatalogEntry) -> DependencyLookup {
        let names = self.model.dependency_names(&entry.name);
        if !names.is_empty() {
            return DependencyLookup {
                names,
                matched: MatchedKey::Name,
            };
        }

        if let Some(product_name) = entry.product_name.as_deref() {
            let by_product = self.model.dependency_names(product_name);
            if !by_product.is_empty() {
                log::debug!(
                    "'{}' has no dependencies under its name; using product name '{}'",
                    entry.name,
                    product_name
                );
                return DependencyLookup {
                    names: by_product,
                    matched: MatchedKey::ProductName,
                };
            }
        }

        DependencyLookup {
            names,
            matched: MatchedKey::Name,
        }
    }

    pub fn model(&self) -> &'m DependencyModel {
        self.model
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::ProjectGraph;
    use crate::resolver::Resolver;
    use pretty_assertions::assert_eq;

    const PROJECT: &str = r#"{
        objects = {
            P = { isa = PBXProject; targets = (APP, LIB); };
            APP = {
                isa = PBXNativeTarget;
                name = App;
                productName = AppProduct;
                productReference = F1;
                dependencies = (D1);
            };
            D1 = { isa = PBXTargetDependency; target = LIB; };
            LIB = { isa = PBXNativeTarget; name = Lib; };
            F1 = { isa = PBXFileReference; path = "Build/App.app"; };
        };
        rootObject = P;
    }"#;

    fn model() -> DependencyModel {
        Resolver::default().resolve(ProjectGraph::from_text(PROJECT).unwrap())
    }

    #[test]
    fn test_lookup_fallback_chain() {
        let model = model();
        let catalog = TargetCatalog::new(&model);

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.lookup("App").unwrap().matched, MatchedKey::Name);

        let by_product = catalog.lookup("AppProduct").unwrap();
        assert_eq!(by_product.matched, MatchedKey::ProductName);
        assert_eq!(by_product.entry.name, "App");

        let by_path = catalog.lookup("App.app").unwrap();
        assert_eq!(by_path.matched, MatchedKey::OutputPath);
        assert_eq!(by_path.entry.output_path.as_deref(), Some("App.app"));
    }

    #[test]
    fn test_dependencies_fall_back_to_product_name() {
        let model = model();
        let mut catalog = TargetCatalog::new(&model);
        let app = model.target_named("App").unwrap();

        // stored under a build-log name; the product name is the resolvable one
        let (inserted, _) = catalog.insert(CatalogEntry {
            name: "App (iOS)".to_string(),
            product_name: Some("App".to_string()),
            output_path: None,
            backing: Backing::Native(app),
        });
        assert!(inserted);

        let entry = catalog.lookup("App (iOS)").unwrap().entry;
        let deps = catalog.dependencies(entry);
        assert_eq!(deps.matched, MatchedKey::ProductName);
        assert_eq!(deps.names, vec!["Lib"]);

        let lib = catalog.lookup("Lib").unwrap().entry;
        let deps = catalog.dependencies(lib);
        assert_eq!(deps.matched, MatchedKey::Name);
        assert!(deps.names.is_empty());
    }

    #[test]
    fn test_insert_keeps_existing_entry() {
        let model = model();
        let mut catalog = TargetCatalog::new(&model);
        let lib = model.target_named("Lib").unwrap();

        let (inserted, existing) = catalog.insert(CatalogEntry {
            name: "App".to_string(),
            product_name: None,
            output_path: None,
            backing: Backing::Native(lib),
        });
        assert!(!inserted);
        assert_eq!(existing.backing, Backing::Native(model.target_named("App").unwrap()));
        assert_eq!(existing.product_name.as_deref(), Some("AppProduct"));
        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.iter().map(|e| e.name.as_str()).collect::<Vec<_>>(),
            vec!["App", "Lib"]
        );
    }
}
