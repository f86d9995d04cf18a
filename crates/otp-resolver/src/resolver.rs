//! OTP version resolution
//!
//! An explicit request (environment override or `.tool-versions`) is used
//! as-is after normalisation and never touches the network. Without one,
//! the platform's builds manifest is fetched and the latest stable release
//! in it is selected.

use crate::manifest::select_latest_stable_from_reader;
use crate::transport::ManifestTransport;
use otp_core::types::{PlatformDescriptor, VersionTag};
use otp_core::Result;
use tracing::{debug, info};

/// Manifest file name under `{builds-url}/{arch}/{variant}/`
pub const MANIFEST_FILE: &str = "builds.txt";

/// Resolves the OTP release to install
pub struct VersionResolver<T> {
    transport: T,
    builds_url: String,
    requested: Option<VersionTag>,
}

impl<T: ManifestTransport> VersionResolver<T> {
    /// Resolver fetching manifests below `builds_url`
    pub fn new(transport: T, builds_url: impl Into<String>) -> Self {
        Self {
            transport,
            builds_url: builds_url.into().trim_end_matches('/').to_string(),
            requested: None,
        }
    }

    /// Short-circuit resolution with an explicit version request
    pub fn with_requested(mut self, requested: Option<VersionTag>) -> Self {
        self.requested = requested;
        self
    }

    /// URL of the builds manifest for `platform`
    pub fn manifest_url(&self, platform: &PlatformDescriptor) -> String {
        format!(
            "{}/{}/{}",
            self.builds_url,
            platform.url_segment(),
            MANIFEST_FILE
        )
    }

    /// Resolve the release tag for `platform`
    pub async fn resolve(&self, platform: &PlatformDescriptor) -> Result<VersionTag> {
        if let Some(requested) = &self.requested {
            debug!("Using requested version {}", requested);
            return Ok(requested.clone());
        }

        let url = self.manifest_url(platform);
        info!("Looking up latest stable release for {}", platform);
        let body = self.transport.fetch_manifest(&url).await?;

        select_latest_stable_from_reader(body)
    }
}
