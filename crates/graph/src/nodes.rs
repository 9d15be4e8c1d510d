//! Typed payloads for every object kind a project file can contain.
//!
//! Scalar values in the property-list format are always strings, so numeric
//! looking fields (`buildActionMask`, `proxyType`, ...) stay `String`.

use crate::types::Reference;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Closed set of object kinds, one per `isa` discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    BuildFile,
    AppleScriptBuildPhase,
    CopyFilesBuildPhase,
    FrameworksBuildPhase,
    HeadersBuildPhase,
    ResourcesBuildPhase,
    ShellScriptBuildPhase,
    SourcesBuildPhase,
    RezBuildPhase,
    ContainerItemProxy,
    FileReference,
    Group,
    VariantGroup,
    VersionGroup,
    AggregateTarget,
    LegacyTarget,
    NativeTarget,
    Project,
    TargetDependency,
    BuildConfiguration,
    ConfigurationList,
    SwiftPackageProductDependency,
    RemoteSwiftPackageReference,
    ReferenceProxy,
    BuildRule,
}

impl NodeKind {
    pub const ALL: [NodeKind; 25] = [
        NodeKind::BuildFile,
        NodeKind::AppleScriptBuildPhase,
        NodeKind::CopyFilesBuildPhase,
        NodeKind::FrameworksBuildPhase,
        NodeKind::HeadersBuildPhase,
        NodeKind::ResourcesBuildPhase,
        NodeKind::ShellScriptBuildPhase,
        NodeKind::SourcesBuildPhase,
        NodeKind::RezBuildPhase,
        NodeKind::ContainerItemProxy,
        NodeKind::FileReference,
        NodeKind::Group,
        NodeKind::VariantGroup,
        NodeKind::VersionGroup,
        NodeKind::AggregateTarget,
        NodeKind::LegacyTarget,
        NodeKind::NativeTarget,
        NodeKind::Project,
        NodeKind::TargetDependency,
        NodeKind::BuildConfiguration,
        NodeKind::ConfigurationList,
        NodeKind::SwiftPackageProductDependency,
        NodeKind::RemoteSwiftPackageReference,
        NodeKind::ReferenceProxy,
        NodeKind::BuildRule,
    ];

    /// The `isa` string this kind is serialized as
    pub fn isa(self) -> &'static str {
        match self {
            NodeKind::BuildFile => "PBXBuildFile",
            NodeKind::AppleScriptBuildPhase => "PBXAppleScriptBuildPhase",
            NodeKind::CopyFilesBuildPhase => "PBXCopyFilesBuildPhase",
            NodeKind::FrameworksBuildPhase => "PBXFrameworksBuildPhase",
            NodeKind::HeadersBuildPhase => "PBXHeadersBuildPhase",
            NodeKind::ResourcesBuildPhase => "PBXResourcesBuildPhase",
            NodeKind::ShellScriptBuildPhase => "PBXShellScriptBuildPhase",
            NodeKind::SourcesBuildPhase => "PBXSourcesBuildPhase",
            NodeKind::RezBuildPhase => "PBXRezBuildPhase",
            NodeKind::ContainerItemProxy => "PBXContainerItemProxy",
            NodeKind::FileReference => "PBXFileReference",
            NodeKind::Group => "PBXGroup",
            NodeKind::VariantGroup => "PBXVariantGroup",
            NodeKind::VersionGroup => "XCVersionGroup",
            NodeKind::AggregateTarget => "PBXAggregateTarget",
            NodeKind::LegacyTarget => "PBXLegacyTarget",
            NodeKind::NativeTarget => "PBXNativeTarget",
            NodeKind::Project => "PBXProject",
            NodeKind::TargetDependency => "PBXTargetDependency",
            NodeKind::BuildConfiguration => "XCBuildConfiguration",
            NodeKind::ConfigurationList => "XCConfigurationList",
            NodeKind::SwiftPackageProductDependency => "XCSwiftPackageProductDependency",
            NodeKind::RemoteSwiftPackageReference => "XCRemoteSwiftPackageReference",
            NodeKind::ReferenceProxy => "PBXReferenceProxy",
            NodeKind::BuildRule => "PBXBuildRule",
        }
    }

    pub fn is_target(self) -> bool {
        matches!(
            self,
            NodeKind::AggregateTarget | NodeKind::LegacyTarget | NodeKind::NativeTarget
        )
    }

    pub fn is_build_phase(self) -> bool {
        matches!(
            self,
            NodeKind::AppleScriptBuildPhase
                | NodeKind::CopyFilesBuildPhase
                | NodeKind::FrameworksBuildPhase
                | NodeKind::HeadersBuildPhase
                | NodeKind::ResourcesBuildPhase
                | NodeKind::ShellScriptBuildPhase
                | NodeKind::SourcesBuildPhase
                | NodeKind::RezBuildPhase
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.isa())
    }
}

impl Serialize for NodeKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.isa())
    }
}

/// `PBXBuildFile`: membership of a file or package product in a build phase
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildFile {
    pub file_ref: Option<Reference>,
    pub product_ref: Option<Reference>,
}

/// Shared shape of the plain build phases
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildPhase {
    #[serde(default)]
    pub files: Vec<Reference>,
    pub build_action_mask: Option<String>,
    pub run_only_for_deployment_postprocessing: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CopyFilesBuildPhase {
    #[serde(flatten)]
    pub phase: BuildPhase,
    pub name: Option<String>,
    pub dst_path: Option<String>,
    pub dst_subfolder_spec: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShellScriptBuildPhase {
    #[serde(flatten)]
    pub phase: BuildPhase,
    pub name: Option<String>,
    pub shell_path: Option<String>,
    pub shell_script: Option<String>,
    #[serde(default)]
    pub input_paths: Vec<String>,
    #[serde(default)]
    pub output_paths: Vec<String>,
}

/// `PBXContainerItemProxy`: indirection to an object that may live in
/// another container (used by cross-project target dependencies)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerItemProxy {
    pub container_portal: Option<Reference>,
    pub proxy_type: Option<String>,
    #[serde(rename = "remoteGlobalIDString")]
    pub remote_global_id: Reference,
    pub remote_info: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReference {
    pub path: String,
    pub name: Option<String>,
    pub source_tree: Option<String>,
    pub explicit_file_type: Option<String>,
    pub last_known_file_type: Option<String>,
}

/// `PBXGroup` and `PBXVariantGroup`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    #[serde(default)]
    pub children: Vec<Reference>,
    pub name: Option<String>,
    pub path: Option<String>,
    pub source_tree: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionGroup {
    #[serde(default)]
    pub children: Vec<Reference>,
    pub current_version: Option<Reference>,
    pub path: Option<String>,
    pub version_group_type: Option<String>,
}

/// Fields every target kind carries
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetCommon {
    pub name: String,
    pub product_name: Option<String>,
    pub build_configuration_list: Option<Reference>,
    #[serde(default)]
    pub build_phases: Vec<Reference>,
    #[serde(default)]
    pub dependencies: Vec<Reference>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateTarget {
    #[serde(flatten)]
    pub common: TargetCommon,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyTarget {
    #[serde(flatten)]
    pub common: TargetCommon,
    pub build_tool_path: Option<String>,
    pub build_arguments_string: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeTarget {
    #[serde(flatten)]
    pub common: TargetCommon,
    pub product_type: Option<String>,
    pub product_reference: Option<Reference>,
    #[serde(default)]
    pub build_rules: Vec<Reference>,
    #[serde(default)]
    pub package_product_dependencies: Vec<Reference>,
}

impl NativeTarget {
    pub fn name(&self) -> &str {
        &self.common.name
    }

    pub fn product_name(&self) -> Option<&str> {
        self.common.product_name.as_deref()
    }

    pub fn dependencies(&self) -> &[Reference] {
        &self.common.dependencies
    }
}

/// `PBXProject`: the root object
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default)]
    pub targets: Vec<Reference>,
    pub main_group: Option<Reference>,
    pub build_configuration_list: Option<Reference>,
    #[serde(default)]
    pub package_references: Vec<Reference>,
    pub product_ref_group: Option<Reference>,
    pub project_dir_path: Option<String>,
    pub project_root: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetDependency {
    pub target: Option<Reference>,
    pub target_proxy: Option<Reference>,
    pub name: Option<String>,
    pub product_ref: Option<Reference>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildConfiguration {
    pub name: String,
    pub base_configuration_reference: Option<Reference>,
    #[serde(default)]
    pub build_settings: Map<String, Value>,
}

impl BuildConfiguration {
    /// Scalar build setting; list-valued settings return `None`
    pub fn setting(&self, key: &str) -> Option<&str> {
        self.build_settings.get(key).and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationList {
    #[serde(default)]
    pub build_configurations: Vec<Reference>,
    pub default_configuration_name: Option<String>,
    pub default_configuration_is_visible: Option<String>,
}

/// `XCSwiftPackageProductDependency`: a product vended by a Swift package.
/// The project file records nothing about what the product itself depends on.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwiftPackageProductDependency {
    pub product_name: String,
    pub package: Option<Reference>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteSwiftPackageReference {
    #[serde(rename = "repositoryURL")]
    pub repository_url: Option<String>,
    #[serde(default)]
    pub requirement: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceProxy {
    pub file_type: Option<String>,
    pub path: Option<String>,
    pub remote_ref: Option<Reference>,
    pub source_tree: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildRule {
    pub name: Option<String>,
    pub compiler_spec: Option<String>,
    pub file_type: Option<String>,
    pub is_editable: Option<String>,
    #[serde(default)]
    pub output_files: Vec<String>,
    pub script: Option<String>,
}

/// Decoded body of an object, one variant per [`NodeKind`]
#[derive(Debug, Clone)]
pub enum NodePayload {
    BuildFile(BuildFile),
    AppleScriptBuildPhase(BuildPhase),
    CopyFilesBuildPhase(CopyFilesBuildPhase),
    FrameworksBuildPhase(BuildPhase),
    HeadersBuildPhase(BuildPhase),
    ResourcesBuildPhase(BuildPhase),
    ShellScriptBuildPhase(ShellScriptBuildPhase),
    SourcesBuildPhase(BuildPhase),
    RezBuildPhase(BuildPhase),
    ContainerItemProxy(ContainerItemProxy),
    FileReference(FileReference),
    Group(Group),
    VariantGroup(Group),
    VersionGroup(VersionGroup),
    AggregateTarget(AggregateTarget),
    LegacyTarget(LegacyTarget),
    NativeTarget(NativeTarget),
    Project(Project),
    TargetDependency(TargetDependency),
    BuildConfiguration(BuildConfiguration),
    ConfigurationList(ConfigurationList),
    SwiftPackageProductDependency(SwiftPackageProductDependency),
    RemoteSwiftPackageReference(RemoteSwiftPackageReference),
    ReferenceProxy(ReferenceProxy),
    BuildRule(BuildRule),
}

impl NodePayload {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodePayload::BuildFile(_) => NodeKind::BuildFile,
            NodePayload::AppleScriptBuildPhase(_) => NodeKind::AppleScriptBuildPhase,
            NodePayload::CopyFilesBuildPhase(_) => NodeKind::CopyFilesBuildPhase,
            NodePayload::FrameworksBuildPhase(_) => NodeKind::FrameworksBuildPhase,
            NodePayload::HeadersBuildPhase(_) => NodeKind::HeadersBuildPhase,
            NodePayload::ResourcesBuildPhase(_) => NodeKind::ResourcesBuildPhase,
            NodePayload::ShellScriptBuildPhase(_) => NodeKind::ShellScriptBuildPhase,
            NodePayload::SourcesBuildPhase(_) => NodeKind::SourcesBuildPhase,
            NodePayload::RezBuildPhase(_) => NodeKind::RezBuildPhase,
            NodePayload::ContainerItemProxy(_) => NodeKind::ContainerItemProxy,
            NodePayload::FileReference(_) => NodeKind::FileReference,
            NodePayload::Group(_) => NodeKind::Group,
            NodePayload::VariantGroup(_) => NodeKind::VariantGroup,
            NodePayload::VersionGroup(_) => NodeKind::VersionGroup,
            NodePayload::AggregateTarget(_) => NodeKind::AggregateTarget,
            NodePayload::LegacyTarget(_) => NodeKind::LegacyTarget,
            NodePayload::NativeTarget(_) => NodeKind::NativeTarget,
            NodePayload::Project(_) => NodeKind::Project,
            NodePayload::TargetDependency(_) => NodeKind::TargetDependency,
            NodePayload::BuildConfiguration(_) => NodeKind::BuildConfiguration,
            NodePayload::ConfigurationList(_) => NodeKind::ConfigurationList,
            NodePayload::SwiftPackageProductDependency(_) => NodeKind::SwiftPackageProductDependency,
            NodePayload::RemoteSwiftPackageReference(_) => NodeKind::RemoteSwiftPackageReference,
            NodePayload::ReferenceProxy(_) => NodeKind::ReferenceProxy,
            NodePayload::BuildRule(_) => NodeKind::BuildRule,
        }
    }

    /// Target fields shared by aggregate, legacy and native targets
    pub fn target_common(&self) -> Option<&TargetCommon> {
        match self {
            NodePayload::AggregateTarget(t) => Some(&t.common),
            NodePayload::LegacyTarget(t) => Some(&t.common),
            NodePayload::NativeTarget(t) => Some(&t.common),
            _ => None,
        }
    }

    pub fn build_phase(&self) -> Option<&BuildPhase> {
        match self {
            NodePayload::AppleScriptBuildPhase(p)
            | NodePayload::FrameworksBuildPhase(p)
            | NodePayload::HeadersBuildPhase(p)
            | NodePayload::ResourcesBuildPhase(p)
            | NodePayload::SourcesBuildPhase(p)
            | NodePayload::RezBuildPhase(p) => Some(p),
            NodePayload::CopyFilesBuildPhase(p) => Some(&p.phase),
            NodePayload::ShellScriptBuildPhase(p) => Some(&p.phase),
            _ => None,
        }
    }
}

/// One decoded object together with the key it was stored under
#[derive(Debug, Clone)]
pub struct Node {
    reference: Reference,
    payload: NodePayload,
}

impl Node {
    /// The reference comes from the `objects` key, never from the record body
    pub(crate) fn new(reference: Reference, payload: NodePayload) -> Self {
        Self { reference, payload }
    }

    pub fn reference(&self) -> &Reference {
        &self.reference
    }

    pub fn kind(&self) -> NodeKind {
        self.payload.kind()
    }

    pub fn payload(&self) -> &NodePayload {
        &self.payload
    }

    pub fn as_typed<T: TypedNode>(&self) -> Option<&T> {
        T::from_payload(&self.payload)
    }
}

/// Payload types that belong to exactly one [`NodeKind`]
pub trait TypedNode: Sized {
    const KIND: NodeKind;

    fn from_payload(payload: &NodePayload) -> Option<&Self>;
}

macro_rules! typed_node {
    ($($ty:ident),+ $(,)?) => {
        $(
            impl TypedNode for $ty {
                const KIND: NodeKind = NodeKind::$ty;

                fn from_payload(payload: &NodePayload) -> Option<&Self> {
                    match payload {
                        NodePayload::$ty(inner) => Some(inner),
                        _ => None,
                    }
                }
            }
        )+
    };
}

typed_node!(
    BuildFile,
    ContainerItemProxy,
    FileReference,
    VersionGroup,
    AggregateTarget,
    LegacyTarget,
    NativeTarget,
    Project,
    TargetDependency,
    BuildConfiguration,
    ConfigurationList,
    RemoteSwiftPackageReference,
    ReferenceProxy,
    BuildRule,
    CopyFilesBuildPhase,
    ShellScriptBuildPhase,
    SwiftPackageProductDependency,
);
