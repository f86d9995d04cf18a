//! Build phase
//!
//! Classify the platform, resolve the release, then either reuse the cached
//! `erlang` layer or reset it and install the release from scratch.

use crate::cache::{CacheDecision, CacheRecord};
use crate::installer::Installer;
use crate::layer::{Layer, Layers};
use otp_core::types::{Arch, PlatformDescriptor, PlatformVariant, VersionTag};
use otp_core::{Result, RUNTIME_ID};
use otp_resolver::{ManifestTransport, VersionResolver};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Inputs to a build
#[derive(Debug, Clone)]
pub struct BuildContext {
    pub layers_dir: PathBuf,
    pub stack_id: String,
    pub arch: Arch,
}

impl BuildContext {
    pub fn new(layers_dir: impl Into<PathBuf>, stack_id: impl Into<String>, arch: Arch) -> Self {
        Self {
            layers_dir: layers_dir.into(),
            stack_id: stack_id.into(),
            arch,
        }
    }

    /// Context for the host architecture
    pub fn for_host(layers_dir: impl Into<PathBuf>, stack_id: impl Into<String>) -> Result<Self> {
        Ok(Self::new(layers_dir, stack_id, Arch::detect()?))
    }
}

/// What the build did with the layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOutcome {
    /// The cached layer matched and was kept
    Reused,
    /// The layer was reset and the release installed
    Installed { duration: Duration },
}

/// Result of a successful build
#[derive(Debug, Clone)]
pub struct BuildResult {
    pub layer: Layer,
    pub platform: PlatformDescriptor,
    pub version: VersionTag,
    pub outcome: BuildOutcome,
    /// Archive URL, set when an install happened
    pub source_url: Option<String>,
}

/// Run the build phase.
///
/// Nothing in the layer changes before the cache decision. An install
/// failure leaves the layer without a record, so the next build rebuilds.
pub async fn build<T, I>(
    context: &BuildContext,
    resolver: &VersionResolver<T>,
    installer: &I,
) -> Result<BuildResult>
where
    T: ManifestTransport,
    I: Installer,
{
    let variant = PlatformVariant::from_stack_id(&context.stack_id)?;
    let platform = PlatformDescriptor::new(context.arch, variant);

    info!("Resolving Erlang version");
    info!("  Architecture: {}", platform.arch);
    info!("  Stack: {} ({})", context.stack_id, platform.variant);

    let version = resolver.resolve(&platform).await?;
    info!("    Using Erlang version: {}", version);

    let mut layer = Layers::new(&context.layers_dir).get(RUNTIME_ID)?;
    let fresh = CacheRecord::fingerprint(&version, &platform);
    let prior = layer.cache_record();

    match CacheDecision::decide(&fresh, prior.as_ref()) {
        CacheDecision::Reuse => {
            info!("Reusing cached layer {}", layer.path.display());
            layer.set_all_types();
            layer.write()?;

            Ok(BuildResult {
                layer,
                platform,
                version,
                outcome: BuildOutcome::Reused,
                source_url: None,
            })
        }
        CacheDecision::Rebuild => {
            debug!("Cache record {:?} does not match {:?}", prior, fresh);
            info!("Executing build process");
            layer.reset()?;

            let url = installer.download_url(&platform, &version);
            info!("  Downloading Erlang {}", version);
            info!("    Source: {}", url);
            let started = Instant::now();
            installer.install(&url, &layer.path).await?;
            let duration = started.elapsed();
            info!("    Completed in {}", format_duration(duration));

            let home = layer.path.display().to_string();
            let bin = layer.path.join("bin").display().to_string();
            layer.shared_env.default_value("ERLANG_HOME", home);
            layer.shared_env.prepend("PATH", bin, ":");
            layer.metadata = fresh.to_metadata();
            layer.set_all_types();
            layer.write()?;

            Ok(BuildResult {
                layer,
                platform,
                version,
                outcome: BuildOutcome::Installed { duration },
                source_url: Some(url),
            })
        }
    }
}

/// Millisecond-rounded duration, e.g. `1.234s` or `87ms`
pub fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis < 1000 {
        format!("{}ms", millis)
    } else {
        format!("{}.{:03}s", millis / 1000, millis % 1000)
    }
}
