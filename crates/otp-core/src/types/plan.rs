//! Build plan types produced by detection

use crate::types::version::VersionTag;
use crate::{RUNTIME_ID, TOOL_VERSIONS_FILE, VERSION_ENV};
use serde::{Deserialize, Serialize};

/// Where a version requirement came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VersionSource {
    /// The `BP_ERLANG_VERSION` environment variable
    #[serde(rename = "BP_ERLANG_VERSION")]
    EnvironmentOverride,
    /// The project's `.tool-versions` file
    #[serde(rename = ".tool-versions")]
    ProjectManifest,
}

impl VersionSource {
    /// Label written as `version-source` in the plan
    pub fn label(&self) -> &'static str {
        match self {
            VersionSource::EnvironmentOverride => VERSION_ENV,
            VersionSource::ProjectManifest => TOOL_VERSIONS_FILE,
        }
    }
}

/// Metadata attached to a requirement entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RequirementMetadata {
    pub version: VersionTag,
    pub version_source: VersionSource,
}

/// A `[[requires]]` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRequirement {
    pub name: String,
    pub metadata: RequirementMetadata,
}

impl VersionRequirement {
    /// Requirement on the runtime from the given source
    pub fn new(version: VersionTag, source: VersionSource) -> Self {
        Self {
            name: RUNTIME_ID.to_string(),
            metadata: RequirementMetadata {
                version,
                version_source: source,
            },
        }
    }

    pub fn source(&self) -> VersionSource {
        self.metadata.version_source
    }
}

/// A `[[provides]]` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provision {
    pub name: String,
}

/// Build plan written by `detect`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BuildPlan {
    #[serde(default)]
    pub provides: Vec<Provision>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requires: Vec<VersionRequirement>,
}

impl BuildPlan {
    /// Plan providing the runtime with the given requirements
    pub fn providing_runtime(requires: Vec<VersionRequirement>) -> Self {
        Self {
            provides: vec![Provision {
                name: RUNTIME_ID.to_string(),
            }],
            requires,
        }
    }
}
