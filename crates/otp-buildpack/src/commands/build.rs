//! Build phase

use crate::cli::BuildArgs;
use crate::output;
use anyhow::{Context, Result};
use otp_core::{BuildpackConfig, TOOL_VERSIONS_FILE};
use otp_layer::{BuildContext, BuildOutcome, HttpArchiveInstaller};
use otp_resolver::{ConfigVersionSource, HttpManifestTransport, VersionResolver};

/// Display name printed in the title line
pub const BUILDPACK_NAME: &str = "Erlang/OTP Buildpack";

pub async fn run(args: BuildArgs, config: &BuildpackConfig, show_progress: bool) -> Result<()> {
    output::title(BUILDPACK_NAME, env!("CARGO_PKG_VERSION"));

    let source = ConfigVersionSource::new(config.version_override.as_deref());
    let requested = source
        .resolve_requested_version(&args.app_dir.join(TOOL_VERSIONS_FILE))
        .context("Failed to read requested Erlang version")?;

    let transport = HttpManifestTransport::new(&config.network)?;
    let resolver = VersionResolver::new(transport, config.builds_base()).with_requested(requested);
    let installer = HttpArchiveInstaller::new(config.builds_base(), &config.network)?
        .with_progress(show_progress);

    let context = BuildContext::for_host(&args.layers, &args.stack)?;
    let result = otp_layer::build(&context, &resolver, &installer)
        .await
        .context("Erlang build failed")?;

    match result.outcome {
        BuildOutcome::Reused => {
            output::info(&format!("Erlang {} restored from cache", result.version));
        }
        BuildOutcome::Installed { duration } => {
            output::environment(&result.layer.shared_env);
            output::success(&format!(
                "Installed Erlang {} in {}",
                result.version,
                otp_layer::format_duration(duration)
            ));
        }
    }
    output::kv("Platform", &result.platform.to_string());
    output::kv("Layer", &result.layer.path.display().to_string());

    Ok(())
}
