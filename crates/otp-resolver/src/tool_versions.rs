//! Version requests from configuration
//!
//! Two sources can request an explicit OTP version: the `BP_ERLANG_VERSION`
//! override (passed in by the caller, never read here) and the project's
//! `.tool-versions` file. The override wins.

use otp_core::types::{VersionRequirement, VersionSource, VersionTag};
use otp_core::{Error, Result, RUNTIME_ID, TOOL_VERSIONS_FILE};
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;
use tracing::debug;

/// Reads a requested version from a manifest-hint file
pub trait VersionParser {
    /// Returns `Ok(None)` when the file is absent or names no `erlang` version
    fn parse_version(&self, path: &Path) -> Result<Option<VersionTag>>;
}

/// Parser for asdf-style `.tool-versions` files (`<tool> <version>` per line)
#[derive(Debug, Clone, Copy, Default)]
pub struct ToolVersionsParser;

impl ToolVersionsParser {
    pub fn new() -> Self {
        Self
    }
}

impl VersionParser for ToolVersionsParser {
    fn parse_version(&self, path: &Path) -> Result<Option<VersionTag>> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::config_read(path, e)),
        };

        // Lines are decoded lossily; non-UTF-8 bytes never fail the read
        let mut reader = BufReader::new(file);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let read = reader
                .read_until(b'\n', &mut buf)
                .map_err(|e| Error::config_read(path, e))?;
            if read == 0 {
                break;
            }

            let line = String::from_utf8_lossy(&buf);
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut fields = line.split_whitespace();
            if fields.next() != Some(RUNTIME_ID) {
                continue;
            }
            if let Some(version) = fields.next() {
                debug!("Found {} {} in {}", RUNTIME_ID, version, path.display());
                return Ok(Some(VersionTag::normalize(version)));
            }
        }

        Ok(None)
    }
}

/// Ranked explicit version sources
#[derive(Debug, Clone, Default)]
pub struct ConfigVersionSource<P = ToolVersionsParser> {
    env_override: Option<VersionTag>,
    parser: P,
}

impl ConfigVersionSource<ToolVersionsParser> {
    /// Source with the given environment override; empty counts as absent
    pub fn new(env_override: Option<&str>) -> Self {
        Self::with_parser(env_override, ToolVersionsParser)
    }
}

impl<P: VersionParser> ConfigVersionSource<P> {
    pub fn with_parser(env_override: Option<&str>, parser: P) -> Self {
        let env_override = env_override
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(VersionTag::normalize);
        Self {
            env_override,
            parser,
        }
    }

    /// Normalised environment override, if any
    pub fn env_override(&self) -> Option<&VersionTag> {
        self.env_override.as_ref()
    }

    pub fn parser(&self) -> &P {
        &self.parser
    }

    /// The version that should flow into the build.
    ///
    /// The environment override wins outright and the file is not read;
    /// otherwise the file at `manifest_path` is consulted.
    pub fn resolve_requested_version(&self, manifest_path: &Path) -> Result<Option<VersionTag>> {
        if let Some(version) = &self.env_override {
            return Ok(Some(version.clone()));
        }
        self.parser.parse_version(manifest_path)
    }

    /// Every requirement both sources express, override first
    pub fn requirements(&self, app_dir: &Path) -> Result<Vec<VersionRequirement>> {
        let mut requirements = Vec::new();

        if let Some(version) = &self.env_override {
            requirements.push(VersionRequirement::new(
                version.clone(),
                VersionSource::EnvironmentOverride,
            ));
        }

        if let Some(version) = self.parser.parse_version(&app_dir.join(TOOL_VERSIONS_FILE))? {
            requirements.push(VersionRequirement::new(
                version,
                VersionSource::ProjectManifest,
            ));
        }

        Ok(requirements)
    }
}
