//! OTP archive installation
//!
//! Prebuilt OTP releases are published as
//! `{builds-url}/{arch}/{variant}/{OTP-tag}.tar.gz`. Every entry in the
//! archive sits under a single top-level directory, which is discarded on
//! unpack so the release lands directly in the layer.

use async_trait::async_trait;
use flate2::read::GzDecoder;
use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use otp_core::types::{NetworkConfig, PlatformDescriptor, VersionTag};
use otp_core::{Error, Result};
use reqwest::header::CONTENT_LENGTH;
use std::fs::{self, File};
use std::io::{BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Component, Path, PathBuf};
use std::time::Duration;
use tar::Archive;
use tracing::{debug, info};

/// Archive suffix of published builds
pub const ARCHIVE_EXTENSION: &str = ".tar.gz";

/// Downloads a runtime archive and unpacks it into a layer
#[async_trait]
pub trait Installer: Send + Sync {
    /// Archive URL for `version` on `platform`
    fn download_url(&self, platform: &PlatformDescriptor, version: &VersionTag) -> String;

    /// Fetch `url` and unpack it into `layer_path`, stripping the top-level
    /// directory of each entry
    async fn install(&self, url: &str, layer_path: &Path) -> Result<()>;
}

/// reqwest-backed installer for builds.hex.pm style mirrors
pub struct HttpArchiveInstaller {
    client: reqwest::Client,
    builds_url: String,
    show_progress: bool,
}

impl HttpArchiveInstaller {
    /// Installer downloading below `builds_url` with the configured timeouts
    pub fn new(builds_url: impl Into<String>, network: &NetworkConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&network.user_agent)
            .connect_timeout(Duration::from_secs(network.http_timeout_secs))
            .timeout(Duration::from_secs(network.download_timeout_secs))
            .build()
            .map_err(|e| Error::invalid_config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self::with_client(client, builds_url))
    }

    /// Use an existing client
    pub fn with_client(client: reqwest::Client, builds_url: impl Into<String>) -> Self {
        Self {
            client,
            builds_url: builds_url.into().trim_end_matches('/').to_string(),
            show_progress: true,
        }
    }

    /// Enable or disable the download progress bar
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    fn progress_bar(&self, total_size: Option<u64>, version: &str) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }

        let pb = match total_size {
            Some(len) => ProgressBar::new(len),
            None => ProgressBar::new_spinner(),
        };
        if let Ok(style) = ProgressStyle::default_bar().template(
            "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})",
        ) {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb.set_message(format!("Downloading {}", version));
        Some(pb)
    }

    /// Stream `url` into an anonymous temporary file, rewound for reading
    async fn download(&self, url: &str) -> Result<File> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::download(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::download(
                url,
                format!("received status code {}", status.as_u16()),
            ));
        }

        let total_size = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());
        let archive_name = url.rsplit('/').next().unwrap_or(url);
        let progress = self.progress_bar(total_size, archive_name);

        let mut file = tempfile::tempfile().map_err(|e| Error::download(url, e))?;
        let mut downloaded: u64 = 0;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk: bytes::Bytes = chunk.map_err(|e| Error::download(url, e))?;
            file.write_all(&chunk).map_err(|e| Error::download(url, e))?;
            downloaded += chunk.len() as u64;
            if let Some(pb) = &progress {
                pb.set_position(downloaded);
            }
        }

        if let Some(pb) = progress {
            pb.finish_and_clear();
        }

        file.flush().map_err(|e| Error::download(url, e))?;
        file.seek(SeekFrom::Start(0)).map_err(|e| Error::download(url, e))?;

        debug!("Downloaded {} bytes from {}", downloaded, url);
        Ok(file)
    }
}

#[async_trait]
impl Installer for HttpArchiveInstaller {
    fn download_url(&self, platform: &PlatformDescriptor, version: &VersionTag) -> String {
        let version = VersionTag::normalize(version.as_str());
        format!(
            "{}/{}/{}{}",
            self.builds_url,
            platform.url_segment(),
            version,
            ARCHIVE_EXTENSION
        )
    }

    async fn install(&self, url: &str, layer_path: &Path) -> Result<()> {
        info!("Installing from {}", url);
        let archive = self.download(url).await?;
        unpack_stripped(BufReader::new(archive), layer_path)
    }
}

/// Unpack a gzip-compressed tar stream into `dest`, dropping the first
/// path component of every entry.
///
/// Entries left with an empty path are skipped. Entries that would land
/// outside `dest`, and symlinks pointing outside it, are an error.
pub fn unpack_stripped<R: Read>(reader: R, dest: &Path) -> Result<()> {
    fs::create_dir_all(dest).map_err(|e| Error::extract(dest, e))?;
    let root = dest.canonicalize().map_err(|e| Error::extract(dest, e))?;

    let mut archive = Archive::new(GzDecoder::new(reader));
    archive.set_preserve_permissions(true);

    let entries = archive.entries().map_err(|e| Error::extract(dest, e))?;
    let mut unpacked = 0usize;

    for entry in entries {
        let mut entry = entry.map_err(|e| Error::extract(dest, e))?;
        let entry_path = entry
            .path()
            .map_err(|e| Error::extract(dest, e))?
            .into_owned();

        let Some(relative) = strip_first_component(&entry_path, dest)? else {
            continue;
        };
        let target = root.join(&relative);

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::extract(dest, e))?;
            let resolved = parent.canonicalize().map_err(|e| Error::extract(dest, e))?;
            if !resolved.starts_with(&root) {
                return Err(Error::extract(
                    dest,
                    format!("archive entry {} escapes the layer", entry_path.display()),
                ));
            }
        }

        let entry_type = entry.header().entry_type();
        if entry_type.is_hard_link() || entry_type.is_symlink() {
            let link_name = entry
                .link_name()
                .map_err(|e| Error::extract(dest, e))?
                .ok_or_else(|| missing_target(&entry_path, dest))?
                .into_owned();

            if entry_type.is_hard_link() {
                let link_source = strip_first_component(&link_name, dest)?
                    .ok_or_else(|| missing_target(&entry_path, dest))?;
                fs::hard_link(root.join(link_source), &target)
                    .map_err(|e| Error::extract(dest, e))?;
                unpacked += 1;
                continue;
            }
            check_symlink_target(&relative, &link_name, dest)?;
        }

        entry.unpack(&target).map_err(|e| Error::extract(dest, e))?;
        unpacked += 1;
    }

    debug!("Unpacked {} entries into {}", unpacked, dest.display());
    Ok(())
}

fn missing_target(entry_path: &Path, dest: &Path) -> Error {
    Error::extract(dest, format!("link {} has no target", entry_path.display()))
}

/// Reject a symlink at `relative` whose target leaves the layer.
///
/// The target is resolved lexically from the link's own directory.
fn check_symlink_target(relative: &Path, link_name: &Path, dest: &Path) -> Result<()> {
    let escapes = || {
        Error::extract(
            dest,
            format!(
                "symlink {} points outside the layer ({})",
                relative.display(),
                link_name.display()
            ),
        )
    };

    let mut depth = relative.components().count().saturating_sub(1);
    for component in link_name.components() {
        match component {
            Component::Normal(_) => depth += 1,
            Component::CurDir => {}
            Component::ParentDir => depth = depth.checked_sub(1).ok_or_else(escapes)?,
            Component::RootDir | Component::Prefix(_) => return Err(escapes()),
        }
    }
    Ok(())
}

/// `path` without its first normal component, `None` if nothing remains
fn strip_first_component(path: &Path, dest: &Path) -> Result<Option<PathBuf>> {
    let mut normal = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => normal.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(Error::extract(
                    dest,
                    format!("archive entry {} escapes the layer", path.display()),
                ));
            }
        }
    }

    if normal.len() < 2 {
        return Ok(None);
    }
    Ok(Some(normal[1..].iter().collect()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use otp_core::types::{Arch, PlatformVariant};

    fn strip(path: &str) -> Result<Option<PathBuf>> {
        strip_first_component(Path::new(path), Path::new("/layers/erlang"))
    }

    #[test]
    fn test_strip_first_component() {
        assert_eq!(strip("otp/bin/erl").unwrap(), Some(PathBuf::from("bin/erl")));
        assert_eq!(strip("./otp/lib").unwrap(), Some(PathBuf::from("lib")));
        assert_eq!(strip("otp/").unwrap(), None);
        assert_eq!(strip("otp").unwrap(), None);
    }

    #[test]
    fn test_strip_rejects_escaping_paths() {
        assert!(matches!(strip("otp/../../etc/passwd"), Err(Error::Extract { .. })));
        assert!(matches!(strip("/etc/passwd"), Err(Error::Extract { .. })));
    }

    #[test]
    fn test_symlink_targets_must_stay_in_layer() {
        let dest = Path::new("/layers/erlang");
        let check = |at: &str, to: &str| check_symlink_target(Path::new(at), Path::new(to), dest);

        assert!(check("bin/erl", "../lib/erts/bin/erl").is_ok());
        assert!(check("lib/current", "./erts-15.2").is_ok());
        assert!(matches!(check("lib", "/tmp"), Err(Error::Extract { .. })));
        assert!(matches!(check("bin/erl", "../../outside"), Err(Error::Extract { .. })));
        assert!(matches!(check("lib", ".."), Err(Error::Extract { .. })));
    }

    #[test]
    fn test_download_url() {
        let installer = HttpArchiveInstaller::with_client(
            reqwest::Client::new(),
            "https://builds.hex.pm/builds/otp/",
        );
        let platform = PlatformDescriptor::new(Arch::Amd64, PlatformVariant::Jammy);

        assert_eq!(
            installer.download_url(&platform, &VersionTag::normalize("28.1.1")),
            "https://builds.hex.pm/builds/otp/amd64/ubuntu-22.04/OTP-28.1.1.tar.gz"
        );
    }

    #[test]
    fn test_corrupt_gzip_is_extract_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = unpack_stripped(&b"definitely not gzip"[..], dir.path()).unwrap_err();
        assert!(matches!(err, Error::Extract { .. }));
        assert!(err.is_install_failure());
    }
}
