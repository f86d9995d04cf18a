//! CNB layers
//!
//! A layer named `erlang` is the directory `<layers>/erlang/` plus its
//! descriptor `<layers>/erlang.toml`, which carries the `[types]` flags and
//! the free-form `[metadata]` table the next build reads back.
//! Environment contributions live under `<layers>/erlang/env/`, one file per
//! variable and action (`PATH.prepend`, `ERLANG_HOME.default`).

use crate::cache::CacheRecord;
use otp_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const ENV_DIR: &str = "env";

/// The buildpack's layers directory
#[derive(Debug, Clone)]
pub struct Layers {
    path: PathBuf,
}

impl Layers {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Acquire the layer `name`, creating its directory if needed.
    ///
    /// Prior metadata is loaded from `<name>.toml`. A missing descriptor means
    /// no prior state; an unreadable or corrupt one is logged and treated the
    /// same way. The `[types]` flags always start cleared.
    pub fn get(&self, name: &str) -> Result<Layer> {
        let path = self.path.join(name);
        fs::create_dir_all(&path).map_err(|e| Error::layer_acquisition(&path, e))?;

        let descriptor_path = self.path.join(format!("{}.toml", name));
        let metadata = load_metadata(&descriptor_path);

        Ok(Layer {
            name: name.to_string(),
            path,
            descriptor_path,
            build: false,
            launch: false,
            cache: false,
            metadata,
            shared_env: LayerEnv::default(),
        })
    }
}

fn load_metadata(descriptor_path: &Path) -> toml::Table {
    let content = match fs::read_to_string(descriptor_path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("No layer descriptor at {}", descriptor_path.display());
            return toml::Table::new();
        }
        Err(e) => {
            warn!(
                "Ignoring unreadable layer descriptor {}: {}",
                descriptor_path.display(),
                e
            );
            return toml::Table::new();
        }
    };

    match toml::from_str::<LayerDescriptor>(&content) {
        Ok(descriptor) => descriptor.metadata,
        Err(e) => {
            warn!(
                "Ignoring corrupt layer descriptor {}: {}",
                descriptor_path.display(),
                e
            );
            toml::Table::new()
        }
    }
}

/// On-disk `<name>.toml`
#[derive(Debug, Default, Serialize, Deserialize)]
struct LayerDescriptor {
    #[serde(default)]
    types: LayerTypes,
    #[serde(default, skip_serializing_if = "toml::Table::is_empty")]
    metadata: toml::Table,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct LayerTypes {
    #[serde(default)]
    build: bool,
    #[serde(default)]
    cache: bool,
    #[serde(default)]
    launch: bool,
}

/// Environment modifications contributed by a layer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerEnv {
    files: BTreeMap<String, String>,
}

impl LayerEnv {
    /// Set `name` only if the environment does not already define it
    pub fn default_value(&mut self, name: &str, value: impl Into<String>) {
        self.files.insert(format!("{}.default", name), value.into());
    }

    /// Prepend `value` to `name`, joined with `delim`
    pub fn prepend(&mut self, name: &str, value: impl Into<String>, delim: &str) {
        self.files.insert(format!("{}.prepend", name), value.into());
        self.files.insert(format!("{}.delim", name), delim.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Env file names and contents, sorted by file name
    pub fn files(&self) -> impl Iterator<Item = (&str, &str)> {
        self.files.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Contents of the env file `file_name` (e.g. `PATH.prepend`)
    pub fn get(&self, file_name: &str) -> Option<&str> {
        self.files.get(file_name).map(String::as_str)
    }

    fn clear(&mut self) {
        self.files.clear();
    }
}

/// An acquired layer
#[derive(Debug, Clone)]
pub struct Layer {
    pub name: String,
    pub path: PathBuf,
    descriptor_path: PathBuf,
    pub build: bool,
    pub launch: bool,
    pub cache: bool,
    pub metadata: toml::Table,
    pub shared_env: LayerEnv,
}

impl Layer {
    /// Path of the layer's `<name>.toml`
    pub fn descriptor_path(&self) -> &Path {
        &self.descriptor_path
    }

    /// Cache record from the prior build, if the metadata holds a complete one
    pub fn cache_record(&self) -> Option<CacheRecord> {
        CacheRecord::from_metadata(&self.metadata)
    }

    /// Mark the layer as available at build time, cached and launched
    pub fn set_all_types(&mut self) {
        self.build = true;
        self.cache = true;
        self.launch = true;
    }

    /// Empty the layer directory, remove the descriptor and clear metadata,
    /// flags and environment
    pub fn reset(&mut self) -> Result<()> {
        match fs::remove_dir_all(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(Error::layer_acquisition(&self.path, e)),
        }
        match fs::remove_file(&self.descriptor_path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(Error::layer_acquisition(&self.descriptor_path, e)),
        }
        fs::create_dir_all(&self.path).map_err(|e| Error::layer_acquisition(&self.path, e))?;

        self.build = false;
        self.launch = false;
        self.cache = false;
        self.metadata.clear();
        self.shared_env.clear();

        debug!("Reset layer {}", self.path.display());
        Ok(())
    }

    /// Persist the descriptor and the shared environment files
    pub fn write(&self) -> Result<()> {
        let descriptor = LayerDescriptor {
            types: LayerTypes {
                build: self.build,
                cache: self.cache,
                launch: self.launch,
            },
            metadata: self.metadata.clone(),
        };
        let content = toml::to_string(&descriptor)
            .map_err(|e| Error::layer_write(&self.descriptor_path, e))?;
        fs::write(&self.descriptor_path, content)
            .map_err(|e| Error::layer_write(&self.descriptor_path, e))?;

        if !self.shared_env.is_empty() {
            let env_dir = self.path.join(ENV_DIR);
            fs::create_dir_all(&env_dir).map_err(|e| Error::layer_write(&env_dir, e))?;
            for (file_name, value) in self.shared_env.files() {
                let file_path = env_dir.join(file_name);
                fs::write(&file_path, value).map_err(|e| Error::layer_write(&file_path, e))?;
            }
        }

        debug!("Wrote layer descriptor {}", self.descriptor_path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_creates_layer_directory() {
        let dir = tempfile::tempdir().unwrap();
        let layers = Layers::new(dir.path());

        let layer = layers.get("erlang").unwrap();
        assert!(dir.path().join("erlang").is_dir());
        assert_eq!(layer.descriptor_path(), dir.path().join("erlang.toml"));
        assert!(layer.metadata.is_empty());
        assert!(!layer.build && !layer.cache && !layer.launch);
    }

    #[test]
    fn test_get_loads_prior_metadata() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("erlang.toml"),
            "[types]\nbuild = true\ncache = true\nlaunch = true\n\n[metadata]\nversion = \"OTP-28.1.1\"\narch = \"amd64\"\nubuntu-version = \"ubuntu-22.04\"\n",
        )
        .unwrap();

        let layer = Layers::new(dir.path()).get("erlang").unwrap();
        let record = layer.cache_record().unwrap();
        assert_eq!(record.version, "OTP-28.1.1");
        assert_eq!(record.ubuntu_version, "ubuntu-22.04");
        assert!(!layer.build);
    }

    #[test]
    fn test_corrupt_descriptor_is_no_prior_state() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("erlang.toml"), "[metadata\nversion = ").unwrap();

        let layer = Layers::new(dir.path()).get("erlang").unwrap();
        assert!(layer.metadata.is_empty());
        assert!(layer.cache_record().is_none());
    }

    #[test]
    fn test_acquisition_failure() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("layers");
        fs::write(&blocker, "not a directory").unwrap();

        let err = Layers::new(&blocker).get("erlang").unwrap_err();
        assert!(matches!(err, Error::LayerAcquisition { .. }));
    }

    #[test]
    fn test_reset_empties_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut layer = Layers::new(dir.path()).get("erlang").unwrap();
        fs::create_dir_all(layer.path.join("bin")).unwrap();
        fs::write(layer.path.join("bin/erl"), "stale").unwrap();
        layer.metadata.insert("version".into(), "OTP-1.0".into());
        layer.shared_env.default_value("ERLANG_HOME", "/old");
        layer.set_all_types();

        layer.write().unwrap();
        assert!(layer.descriptor_path().exists());

        layer.reset().unwrap();

        assert!(layer.path.is_dir());
        assert!(!layer.descriptor_path().exists());
        assert_eq!(fs::read_dir(&layer.path).unwrap().count(), 0);
        assert!(layer.metadata.is_empty());
        assert!(layer.shared_env.is_empty());
        assert!(!layer.launch);
    }

    #[test]
    fn test_write_persists_descriptor_and_env() {
        let dir = tempfile::tempdir().unwrap();
        let mut layer = Layers::new(dir.path()).get("erlang").unwrap();
        let home = layer.path.display().to_string();
        layer.shared_env.default_value("ERLANG_HOME", home.clone());
        layer
            .shared_env
            .prepend("PATH", format!("{}/bin", home), ":");
        layer.metadata.insert("version".into(), "OTP-28.1.1".into());
        layer.set_all_types();

        layer.write().unwrap();

        let env_dir = layer.path.join("env");
        assert_eq!(fs::read_to_string(env_dir.join("ERLANG_HOME.default")).unwrap(), home);
        assert_eq!(
            fs::read_to_string(env_dir.join("PATH.prepend")).unwrap(),
            format!("{}/bin", home)
        );
        assert_eq!(fs::read_to_string(env_dir.join("PATH.delim")).unwrap(), ":");

        let descriptor: toml::Table =
            toml::from_str(&fs::read_to_string(dir.path().join("erlang.toml")).unwrap()).unwrap();
        assert_eq!(descriptor["types"]["launch"].as_bool(), Some(true));
        assert_eq!(descriptor["metadata"]["version"].as_str(), Some("OTP-28.1.1"));
    }

    #[test]
    fn test_write_without_env_creates_no_env_dir() {
        let dir = tempfile::tempdir().unwrap();
        let layer = Layers::new(dir.path()).get("erlang").unwrap();
        layer.write().unwrap();

        assert!(!layer.path.join("env").exists());
        let content = fs::read_to_string(dir.path().join("erlang.toml")).unwrap();
        assert!(!content.contains("metadata"));
    }

    #[test]
    fn test_env_files_are_sorted() {
        let mut env = LayerEnv::default();
        env.prepend("PATH", "/l/bin", ":");
        env.default_value("ERLANG_HOME", "/l");

        let names: Vec<&str> = env.files().map(|(name, _)| name).collect();
        assert_eq!(names, ["ERLANG_HOME.default", "PATH.delim", "PATH.prepend"]);
        assert_eq!(env.get("PATH.delim"), Some(":"));
    }
}
