//! Runtime configuration types
//!
//! These types control where OTP builds are fetched from and how the HTTP
//! client behaves, plus the explicit version and log-level overrides.

use serde::{Deserialize, Serialize};

/// Complete buildpack configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BuildpackConfig {
    /// Base URL of the OTP builds mirror
    #[serde(default = "default_builds_url")]
    pub builds_url: String,

    /// Network and HTTP configuration
    #[serde(default)]
    pub network: NetworkConfig,

    /// Explicit version request, wins over `.tool-versions`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_override: Option<String>,

    /// Log level requested through `BP_LOG_LEVEL`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

impl Default for BuildpackConfig {
    fn default() -> Self {
        Self {
            builds_url: default_builds_url(),
            network: NetworkConfig::default(),
            version_override: None,
            log_level: None,
        }
    }
}

impl BuildpackConfig {
    /// Builds mirror base URL without a trailing slash
    pub fn builds_base(&self) -> &str {
        self.builds_url.trim_end_matches('/')
    }
}

/// Network and HTTP configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NetworkConfig {
    /// Timeout for the builds manifest request in seconds
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,

    /// Timeout for the archive download in seconds
    #[serde(default = "default_download_timeout")]
    pub download_timeout_secs: u64,

    /// User agent string for HTTP requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            http_timeout_secs: default_http_timeout(),
            download_timeout_secs: default_download_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_builds_url() -> String {
    "https://builds.hex.pm/builds/otp".to_string()
}
fn default_http_timeout() -> u64 {
    60
}
fn default_download_timeout() -> u64 {
    600 // 10 minutes
}
fn default_user_agent() -> String {
    format!(
        "otp-buildpack/{} ({}; {})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}
