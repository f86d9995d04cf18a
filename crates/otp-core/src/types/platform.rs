//! Platform classification
//!
//! OTP builds are published per CPU architecture and Ubuntu release, so a
//! build target is identified by the host architecture plus the Ubuntu
//! variant derived from the CNB stack identifier.

use crate::error::{Error, Result};
use std::fmt;

/// Supported CPU architectures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    /// x86_64 / AMD64
    Amd64,
    /// ARM64 / AArch64
    Arm64,
}

impl Arch {
    /// Detect the current CPU architecture
    pub fn detect() -> Result<Self> {
        Self::from_rust_arch(std::env::consts::ARCH)
    }

    /// Map a Rust target architecture name (`x86_64`, `aarch64`)
    pub fn from_rust_arch(arch: &str) -> Result<Self> {
        match arch {
            "x86_64" => Ok(Arch::Amd64),
            "aarch64" => Ok(Arch::Arm64),
            other => Err(Error::unsupported_architecture(other)),
        }
    }

    /// Architecture name used in build URLs (e.g., "amd64", "arm64")
    pub fn download_name(&self) -> &'static str {
        match self {
            Arch::Amd64 => "amd64",
            Arch::Arm64 => "arm64",
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.download_name())
    }
}

/// Ubuntu releases with published OTP builds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformVariant {
    /// Ubuntu 24.04
    Noble,
    /// Ubuntu 22.04
    Jammy,
    /// Ubuntu 20.04
    Focal,
    /// Ubuntu 18.04
    Bionic,
}

impl PlatformVariant {
    /// Classify a stack identifier such as `io.buildpacks.stacks.jammy`.
    ///
    /// Codenames are matched as substrings, newest first.
    pub fn from_stack_id(stack_id: &str) -> Result<Self> {
        const CODENAMES: [(&str, PlatformVariant); 4] = [
            ("noble", PlatformVariant::Noble),
            ("jammy", PlatformVariant::Jammy),
            ("focal", PlatformVariant::Focal),
            ("bionic", PlatformVariant::Bionic),
        ];

        CODENAMES
            .iter()
            .find(|(codename, _)| stack_id.contains(codename))
            .map(|(_, variant)| *variant)
            .ok_or_else(|| Error::platform_unsupported(stack_id))
    }

    /// Variant name used in build URLs and layer metadata
    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformVariant::Noble => "ubuntu-24.04",
            PlatformVariant::Jammy => "ubuntu-22.04",
            PlatformVariant::Focal => "ubuntu-20.04",
            PlatformVariant::Bionic => "ubuntu-18.04",
        }
    }
}

impl fmt::Display for PlatformVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Architecture and Ubuntu variant of the build target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformDescriptor {
    pub arch: Arch,
    pub variant: PlatformVariant,
}

impl PlatformDescriptor {
    pub fn new(arch: Arch, variant: PlatformVariant) -> Self {
        Self { arch, variant }
    }

    /// `{arch}/{variant}` path segment shared by manifest and archive URLs
    pub fn url_segment(&self) -> String {
        format!("{}/{}", self.arch.download_name(), self.variant.as_str())
    }
}

impl fmt::Display for PlatformDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.arch, self.variant)
    }
}
