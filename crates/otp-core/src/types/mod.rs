//! Type definitions shared by detection and build

pub mod buildpack_config;
pub mod plan;
pub mod platform;
pub mod version;

pub use buildpack_config::{BuildpackConfig, NetworkConfig};
pub use plan::{BuildPlan, Provision, RequirementMetadata, VersionRequirement, VersionSource};
pub use platform::{Arch, PlatformDescriptor, PlatformVariant};
pub use version::{VersionTag, VersionVector, RELEASE_PREFIX};
