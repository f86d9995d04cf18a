//! OTP version discovery for the Erlang buildpack
//!
//! Provides:
//! - Builds manifest scanning with numeric release ordering
//! - `.tool-versions` parsing and environment override precedence
//! - Manifest transport over HTTP
//! - Version resolution and detection

pub mod detect;
pub mod manifest;
pub mod resolver;
pub mod tool_versions;
pub mod transport;

pub use detect::detect;
pub use manifest::{classify, select_latest_stable, select_latest_stable_from_reader, LineClass};
pub use resolver::{VersionResolver, MANIFEST_FILE};
pub use tool_versions::{ConfigVersionSource, ToolVersionsParser, VersionParser};
pub use transport::{HttpManifestTransport, ManifestReader, ManifestTransport};
