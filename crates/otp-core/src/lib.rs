//! # otp-core
//!
//! Core library for the Erlang buildpack providing:
//! - Platform classification (architecture + Ubuntu variant)
//! - OTP release tags and numeric version ordering
//! - Build plan types
//! - Error types and hierarchical configuration loading

pub mod config;
pub mod error;
pub mod types;

pub use config::ConfigLoader;
pub use error::{Error, Result};
pub use types::{BuildpackConfig, PlatformDescriptor, VersionTag};

/// Runtime identifier used for the plan entry, the layer and `.tool-versions`
pub const RUNTIME_ID: &str = "erlang";

/// Environment variable holding an explicit version request
pub const VERSION_ENV: &str = "BP_ERLANG_VERSION";

/// Environment variable overriding the builds mirror
pub const BUILDS_URL_ENV: &str = "BP_ERLANG_BUILDS_URL";

/// Environment variable selecting the log level
pub const LOG_LEVEL_ENV: &str = "BP_LOG_LEVEL";

/// Per-project manifest-hint file
pub const TOOL_VERSIONS_FILE: &str = ".tool-versions";
