//! Error types for otp-core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using otp-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by detection and build. All of them abort the build.
#[derive(Error, Debug)]
pub enum Error {
    /// Stack identifier names none of the supported Ubuntu releases
    #[error("unsupported stack: {stack} - this buildpack only supports Ubuntu-based stacks (noble, jammy, focal, bionic)")]
    PlatformUnsupported { stack: String },

    /// Host CPU architecture has no published OTP builds
    #[error("unsupported architecture: {arch} - this buildpack only supports amd64 and arm64")]
    UnsupportedArchitecture { arch: String },

    /// Reading a manifest-hint or configuration file failed
    #[error("failed to read {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration format
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// The builds manifest could not be fetched
    #[error("failed to fetch latest Erlang version from {url}: {reason}")]
    ManifestFetch { url: String, reason: String },

    /// The builds manifest body could not be read
    #[error("error reading version data: {0}")]
    ManifestRead(#[source] std::io::Error),

    /// The builds manifest contained no stable release
    #[error("no stable Erlang versions found")]
    NoStableVersionFound,

    /// The layer directory could not be created or reset
    #[error("failed to acquire layer at {}: {source}", path.display())]
    LayerAcquisition {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The layer descriptor or environment files could not be written
    #[error("failed to write layer {}: {reason}", path.display())]
    LayerWrite { path: PathBuf, reason: String },

    /// The runtime archive could not be downloaded
    #[error("failed to download Erlang from {url}: {reason}")]
    Download { url: String, reason: String },

    /// The runtime archive could not be unpacked
    #[error("failed to decompress Erlang archive to {}: {reason}", path.display())]
    Extract { path: PathBuf, reason: String },

    /// The build plan could not be written
    #[error("failed to write build plan {}: {reason}", path.display())]
    PlanWrite { path: PathBuf, reason: String },
}

impl Error {
    /// Create a platform unsupported error
    pub fn platform_unsupported(stack: impl Into<String>) -> Self {
        Self::PlatformUnsupported {
            stack: stack.into(),
        }
    }

    /// Create an unsupported architecture error
    pub fn unsupported_architecture(arch: impl Into<String>) -> Self {
        Self::UnsupportedArchitecture { arch: arch.into() }
    }

    /// Create a config read error
    pub fn config_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ConfigRead {
            path: path.into(),
            source,
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a manifest fetch error
    pub fn manifest_fetch(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ManifestFetch {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Create a layer acquisition error
    pub fn layer_acquisition(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::LayerAcquisition {
            path: path.into(),
            source,
        }
    }

    /// Create a layer write error
    pub fn layer_write(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::LayerWrite {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a download error
    pub fn download(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::Download {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// Create an archive extraction error
    pub fn extract(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Extract {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a plan write error
    pub fn plan_write(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::PlanWrite {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether the error is an installation failure (download or unpack)
    pub fn is_install_failure(&self) -> bool {
        matches!(self, Self::Download { .. } | Self::Extract { .. })
    }
}
