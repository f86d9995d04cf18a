//! Recording fakes for the build's seams

use async_trait::async_trait;
use otp_core::types::{PlatformDescriptor, VersionTag};
use otp_core::{Error, Result};
use otp_layer::Installer;
use otp_resolver::{ManifestReader, ManifestTransport};
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Transport serving a fixed body, or failing when `body` is `None`
pub struct FakeTransport {
    body: Option<String>,
}

impl FakeTransport {
    pub fn serving(body: &str) -> Self {
        Self {
            body: Some(body.to_string()),
        }
    }

    pub fn unreachable() -> Self {
        Self { body: None }
    }
}

#[async_trait]
impl ManifestTransport for FakeTransport {
    async fn fetch_manifest(&self, url: &str) -> Result<ManifestReader> {
        let body = self
            .body
            .clone()
            .ok_or_else(|| Error::manifest_fetch(url, "connection refused"))?;
        Ok(Box::new(Cursor::new(body.into_bytes())))
    }
}

/// Installer that writes a marker `bin/erl` instead of downloading
pub struct FakeInstaller {
    fail: bool,
    pub installs: Mutex<Vec<(String, PathBuf)>>,
}

impl FakeInstaller {
    pub fn new() -> Self {
        Self {
            fail: false,
            installs: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            installs: Mutex::new(Vec::new()),
        }
    }

    pub fn install_count(&self) -> usize {
        self.installs.lock().unwrap().len()
    }
}

#[async_trait]
impl Installer for FakeInstaller {
    fn download_url(&self, platform: &PlatformDescriptor, version: &VersionTag) -> String {
        format!(
            "https://builds.test/{}/{}.tar.gz",
            platform.url_segment(),
            version
        )
    }

    async fn install(&self, url: &str, layer_path: &Path) -> Result<()> {
        self.installs
            .lock()
            .unwrap()
            .push((url.to_string(), layer_path.to_path_buf()));
        if self.fail {
            return Err(Error::download(url, "received status code 404"));
        }
        fs::create_dir_all(layer_path.join("bin")).unwrap();
        fs::write(layer_path.join("bin/erl"), url).unwrap();
        Ok(())
    }
}
