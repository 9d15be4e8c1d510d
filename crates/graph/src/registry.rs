//! Node type registry: the single place an `isa` discriminator is mapped to
//! the payload shape it decodes into. Adding a kind means adding it to
//! [`NodeKind`], to [`rule_for`] and to [`DecodeRule::decode`]; the matches
//! are exhaustive so a half-registered kind does not compile.

use crate::nodes::*;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// How to decode the record of one registered kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeRule {
    pub kind: NodeKind,
}

/// Look up the decode rule for a discriminator. Unregistered kinds return `None`.
pub fn rule_for(discriminator: &str) -> Option<DecodeRule> {
    let kind = match discriminator {
        "PBXBuildFile" => NodeKind::BuildFile,
        "PBXAppleScriptBuildPhase" => NodeKind::AppleScriptBuildPhase,
        "PBXCopyFilesBuildPhase" => NodeKind::CopyFilesBuildPhase,
        "PBXFrameworksBuildPhase" => NodeKind::FrameworksBuildPhase,
        "PBXHeadersBuildPhase" => NodeKind::HeadersBuildPhase,
        "PBXResourcesBuildPhase" => NodeKind::ResourcesBuildPhase,
        "PBXShellScriptBuildPhase" => NodeKind::ShellScriptBuildPhase,
        "PBXSourcesBuildPhase" => NodeKind::SourcesBuildPhase,
        "PBXRezBuildPhase" => NodeKind::RezBuildPhase,
        "PBXContainerItemProxy" => NodeKind::ContainerItemProxy,
        "PBXFileReference" => NodeKind::FileReference,
        "PBXGroup" => NodeKind::Group,
        "PBXVariantGroup" => NodeKind::VariantGroup,
        "XCVersionGroup" => NodeKind::VersionGroup,
        "PBXAggregateTarget" => NodeKind::AggregateTarget,
        "PBXLegacyTarget" => NodeKind::LegacyTarget,
        "PBXNativeTarget" => NodeKind::NativeTarget,
        "PBXProject" => NodeKind::Project,
        "PBXTargetDependency" => NodeKind::TargetDependency,
        "XCBuildConfiguration" => NodeKind::BuildConfiguration,
        "XCConfigurationList" => NodeKind::ConfigurationList,
        "XCSwiftPackageProductDependency" => NodeKind::SwiftPackageProductDependency,
        "XCRemoteSwiftPackageReference" => NodeKind::RemoteSwiftPackageReference,
        "PBXReferenceProxy" => NodeKind::ReferenceProxy,
        "PBXBuildRule" => NodeKind::BuildRule,
        _ => return None,
    };
    Some(DecodeRule { kind })
}

impl DecodeRule {
    /// Decode a raw record into this rule's payload shape.
    /// The record's `isa` and any unrecognised fields are ignored.
    pub fn decode(self, record: Value) -> serde_json::Result<NodePayload> {
        use NodePayload as P;

        Ok(match self.kind {
            NodeKind::BuildFile => P::BuildFile(body(record)?),
            NodeKind::AppleScriptBuildPhase => P::AppleScriptBuildPhase(body(record)?),
            NodeKind::CopyFilesBuildPhase => P::CopyFilesBuildPhase(body(record)?),
            NodeKind::FrameworksBuildPhase => P::FrameworksBuildPhase(body(record)?),
            NodeKind::HeadersBuildPhase => P::HeadersBuildPhase(body(record)?),
            NodeKind::ResourcesBuildPhase => P::ResourcesBuildPhase(body(record)?),
            NodeKind::ShellScriptBuildPhase => P::ShellScriptBuildPhase(body(record)?),
            NodeKind::SourcesBuildPhase => P::SourcesBuildPhase(body(record)?),
            NodeKind::RezBuildPhase => P::RezBuildPhase(body(record)?),
            NodeKind::ContainerItemProxy => P::ContainerItemProxy(body(record)?),
            NodeKind::FileReference => P::FileReference(body(record)?),
            NodeKind::Group => P::Group(body(record)?),
            NodeKind::VariantGroup => P::VariantGroup(body(record)?),
            NodeKind::VersionGroup => P::VersionGroup(body(record)?),
            NodeKind::AggregateTarget => P::AggregateTarget(body(record)?),
            NodeKind::LegacyTarget => P::LegacyTarget(body(record)?),
            NodeKind::NativeTarget => P::NativeTarget(body(record)?),
            NodeKind::Project => P::Project(body(record)?),
            NodeKind::TargetDependency => P::TargetDependency(body(record)?),
            NodeKind::BuildConfiguration => P::BuildConfiguration(body(record)?),
            NodeKind::ConfigurationList => P::ConfigurationList(body(record)?),
            NodeKind::SwiftPackageProductDependency => {
                P::SwiftPackageProductDependency(body(record)?)
            }
            NodeKind::RemoteSwiftPackageReference => {
                P::RemoteSwiftPackageReference(body(record)?)
            }
            NodeKind::ReferenceProxy => P::ReferenceProxy(body(record)?),
            NodeKind::BuildRule => P::BuildRule(body(record)?),
        })
    }
}

fn body<T: DeserializeOwned>(record: Value) -> serde_json::Result<T> {
    serde_json::from_value(record)
}
