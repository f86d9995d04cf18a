//! Hierarchical configuration loader with precedence
//!
//! Loads configuration from multiple sources with the following precedence (low to high):
//! 1. Embedded defaults (built into binary)
//! 2. Optional config file (`--config`)
//! 3. Environment variables (`BP_ERLANG_VERSION`, `BP_ERLANG_BUILDS_URL`, `BP_LOG_LEVEL`)

use crate::error::{Error, Result};
use crate::types::BuildpackConfig;
use crate::{BUILDS_URL_ENV, LOG_LEVEL_ENV, VERSION_ENV};
use rust_embed::RustEmbed;
use serde_yaml_ng::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Embedded configuration files
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/../../embedded/config/"]
#[prefix = ""]
struct EmbeddedConfigs;

const DEFAULTS_FILE: &str = "buildpack-defaults.yaml";

/// Configuration hierarchy loader
#[derive(Debug, Default)]
pub struct ConfigLoader {
    /// Optional YAML file layered over the embedded defaults
    config_file: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a loader using only embedded defaults and the environment
    pub fn new() -> Self {
        Self::default()
    }

    /// Layer a config file over the embedded defaults
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Load configuration, reading overrides from the process environment
    pub fn load(&self) -> Result<BuildpackConfig> {
        self.load_with(|key| std::env::var(key).ok())
    }

    /// Load configuration, reading overrides through `lookup`
    pub fn load_with<F>(&self, lookup: F) -> Result<BuildpackConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut value = Self::load_embedded_value(DEFAULTS_FILE)?;

        if let Some(path) = &self.config_file {
            debug!("Loading config file: {}", path.display());
            let overlay = Self::load_yaml_file(path)?;
            merge_values(&mut value, overlay);
        }

        let config: BuildpackConfig = serde_yaml_ng::from_value(value)
            .map_err(|e| Error::invalid_config(format!("Failed to parse configuration: {}", e)))?;

        Ok(Self::apply_env_overrides(config, lookup))
    }

    /// Load an embedded configuration file
    fn load_embedded_value(filename: &str) -> Result<Value> {
        let embedded_file = EmbeddedConfigs::get(filename).ok_or_else(|| {
            Error::invalid_config(format!("Embedded config not found: {}", filename))
        })?;

        let content = std::str::from_utf8(&embedded_file.data).map_err(|_| {
            Error::invalid_config(format!("Invalid UTF-8 in embedded config: {}", filename))
        })?;

        serde_yaml_ng::from_str(content).map_err(|e| {
            Error::invalid_config(format!(
                "Failed to parse embedded config {}: {}",
                filename, e
            ))
        })
    }

    /// Load a YAML file and parse it
    fn load_yaml_file(path: &Path) -> Result<Value> {
        let content = fs::read_to_string(path).map_err(|e| Error::config_read(path, e))?;
        serde_yaml_ng::from_str(&content).map_err(|e| {
            Error::invalid_config(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// Apply environment variable overrides. Empty values count as unset.
    fn apply_env_overrides<F>(mut config: BuildpackConfig, lookup: F) -> BuildpackConfig
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(version) = non_empty(VERSION_ENV) {
            debug!("{} override: {}", VERSION_ENV, version);
            config.version_override = Some(version.trim().to_string());
        }

        if let Some(url) = non_empty(BUILDS_URL_ENV) {
            debug!("{} override: {}", BUILDS_URL_ENV, url);
            config.builds_url = url;
        }

        if let Some(level) = non_empty(LOG_LEVEL_ENV) {
            config.log_level = Some(level);
        }

        config
    }
}

/// Deep-merge `overlay` into `base`; mappings merge per key, everything else replaces
fn merge_values(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(base_value) => merge_values(base_value, overlay_value),
                    None => {
                        base_map.insert(key, overlay_value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}
