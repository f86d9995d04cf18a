//! Builds manifest transport

use async_trait::async_trait;
use futures_util::StreamExt;
use otp_core::types::NetworkConfig;
use otp_core::{Error, Result};
use std::io::{BufRead, BufReader, Seek, SeekFrom, Write};
use std::time::Duration;
use tracing::debug;

/// Manifest body, read line by line
pub type ManifestReader = Box<dyn BufRead + Send>;

/// Fetches a builds manifest body
#[async_trait]
pub trait ManifestTransport: Send + Sync {
    /// Fetch the manifest at `url`.
    ///
    /// A non-success status is an error, never an empty body.
    async fn fetch_manifest(&self, url: &str) -> Result<ManifestReader>;
}

/// reqwest-backed transport
pub struct HttpManifestTransport {
    client: reqwest::Client,
}

impl HttpManifestTransport {
    /// Create a transport using the configured timeout and user agent
    pub fn new(network: &NetworkConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&network.user_agent)
            .timeout(Duration::from_secs(network.http_timeout_secs))
            .build()
            .map_err(|e| Error::invalid_config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Use an existing client
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ManifestTransport for HttpManifestTransport {
    async fn fetch_manifest(&self, url: &str) -> Result<ManifestReader> {
        debug!("Fetching builds manifest from: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::manifest_fetch(url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::manifest_fetch(
                url,
                format!("received status code {}", status.as_u16()),
            ));
        }

        // Spool the body to disk and scan it from there
        let mut body = tempfile::tempfile().map_err(Error::ManifestRead)?;
        let mut received: u64 = 0;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk: bytes::Bytes =
                chunk.map_err(|e| Error::manifest_fetch(url, e.to_string()))?;
            body.write_all(&chunk).map_err(Error::ManifestRead)?;
            received += chunk.len() as u64;
        }
        body.seek(SeekFrom::Start(0)).map_err(Error::ManifestRead)?;

        debug!("Received {} manifest bytes from {}", received, url);
        Ok(Box::new(BufReader::new(body)))
    }
}
