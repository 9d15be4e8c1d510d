//! # xcdeps graph
//!
//! Decodes Xcode project object graphs and resolves, for every buildable
//! target, the full set of targets and Swift package products it depends on.
//!
//! ## Architecture
//!
//! ```text
//! project.pbxproj (OpenStep / JSON)
//!     │
//!     ├──> Decoder
//!     │      ├─ objects: reference -> record
//!     │      ├─ registry: isa -> payload shape
//!     │      └─ ProjectGraph (arena + reference index, single PBXProject root)
//!     │
//!     ├──> Resolver
//!     │      ├─ Phase 1: direct edges per candidate target
//!     │      │    (target dependency -> target | proxy -> remote target,
//!     │      │     package product dependencies)
//!     │      └─ Phase 2: breadth-first closure, dedup by name
//!     │
//!     └──> DependencyModel / TargetCatalog
//!            ├─ dependencies(target), build_order()
//!            └─ lookup by name | product name | output path
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use xcdeps_graph::{ProjectGraph, Resolver, TargetCatalog};
//!
//! let graph = ProjectGraph::from_path("App.xcodeproj")?;
//! let model = Resolver::default().resolve(graph);
//! let catalog = TargetCatalog::new(&model);
//!
//! if let Some(hit) = catalog.lookup("App") {
//!     println!("{:?}", catalog.dependencies(hit.entry).names);
//! }
//! # Ok::<(), xcdeps_graph::GraphError>(())
//! ```

mod catalog;
mod config;
mod decoder;
mod error;
mod model;
mod nodes;
mod project;
mod registry;
mod resolver;
mod types;

pub use catalog::{Backing, CatalogEntry, CatalogMatch, DependencyLookup, MatchedKey, TargetCatalog};
pub use config::{ResolverConfig, DEFAULT_STEP_BUDGET, RESOURCE_BUNDLE_PRODUCT_TYPE};
pub use decoder::{ProjectDecoder, PROJECT_FILE_NAME};
pub use error::{GraphError, Result};
pub use model::DependencyModel;
pub use nodes::*;
pub use project::ProjectGraph;
pub use registry::{rule_for, DecodeRule};
pub use resolver::Resolver;
pub use types::{EdgeKind, NodeId, Reference, ResolvedEdge};
pub use xcdeps_plist::Format;
