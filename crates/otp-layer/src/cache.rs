//! Layer cache validity
//!
//! A layer is reused only when the record persisted by the previous build
//! matches the fresh fingerprint exactly, field by field. Versions are
//! compared as strings here, not numerically: `OTP-28.1` and `OTP-28.1.0`
//! name different archives.

use otp_core::types::{PlatformDescriptor, VersionTag};
use serde::{Deserialize, Serialize};

/// Metadata key holding the release tag
pub const VERSION_KEY: &str = "version";
/// Metadata key holding the architecture
pub const ARCH_KEY: &str = "arch";
/// Metadata key holding the Ubuntu variant
pub const UBUNTU_VERSION_KEY: &str = "ubuntu-version";

/// Fingerprint of an installed runtime, persisted as layer metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CacheRecord {
    pub version: String,
    pub arch: String,
    pub ubuntu_version: String,
}

impl CacheRecord {
    /// Fingerprint of `version` built for `platform`
    pub fn fingerprint(version: &VersionTag, platform: &PlatformDescriptor) -> Self {
        Self {
            version: version.as_str().to_string(),
            arch: platform.arch.download_name().to_string(),
            ubuntu_version: platform.variant.as_str().to_string(),
        }
    }

    /// Read a record from a layer's `[metadata]` table.
    ///
    /// `None` unless all three keys are present as strings.
    pub fn from_metadata(metadata: &toml::Table) -> Option<Self> {
        let field = |key: &str| metadata.get(key)?.as_str().map(str::to_string);
        Some(Self {
            version: field(VERSION_KEY)?,
            arch: field(ARCH_KEY)?,
            ubuntu_version: field(UBUNTU_VERSION_KEY)?,
        })
    }

    /// The record as a `[metadata]` table
    pub fn to_metadata(&self) -> toml::Table {
        let mut table = toml::Table::new();
        table.insert(VERSION_KEY.into(), self.version.clone().into());
        table.insert(ARCH_KEY.into(), self.arch.clone().into());
        table.insert(UBUNTU_VERSION_KEY.into(), self.ubuntu_version.clone().into());
        table
    }
}

/// Outcome of comparing a fingerprint against the prior record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheDecision {
    /// The installed layer matches, keep it untouched
    Reuse,
    /// Reset the layer and install from scratch
    Rebuild,
}

impl CacheDecision {
    /// Reuse iff a prior record exists and every field matches exactly
    pub fn decide(fresh: &CacheRecord, prior: Option<&CacheRecord>) -> Self {
        match prior {
            Some(prior)
                if prior.version == fresh.version
                    && prior.arch == fresh.arch
                    && prior.ubuntu_version == fresh.ubuntu_version =>
            {
                CacheDecision::Reuse
            }
            _ => CacheDecision::Rebuild,
        }
    }

    pub fn is_reuse(&self) -> bool {
        matches!(self, CacheDecision::Reuse)
    }
}
