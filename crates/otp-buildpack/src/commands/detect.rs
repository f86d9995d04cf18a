//! Detect phase

use crate::cli::DetectArgs;
use anyhow::{Context, Result};
use otp_core::types::BuildPlan;
use otp_core::{BuildpackConfig, Error};
use otp_resolver::ConfigVersionSource;
use std::fs;
use std::path::Path;
use tracing::info;

pub fn run(args: DetectArgs, config: &BuildpackConfig) -> Result<()> {
    let source = ConfigVersionSource::new(config.version_override.as_deref());
    let plan = otp_resolver::detect(&args.app_dir, &source).context("Detection failed")?;

    for requirement in &plan.requires {
        info!(
            "Requested Erlang {} via {}",
            requirement.metadata.version,
            requirement.source().label()
        );
    }

    write_plan(&plan, &args.plan)?;
    Ok(())
}

/// Serialise `plan` as TOML to `path`
fn write_plan(plan: &BuildPlan, path: &Path) -> otp_core::Result<()> {
    let content = toml::to_string(plan).map_err(|e| Error::plan_write(path, e))?;
    fs::write(path, content).map_err(|e| Error::plan_write(path, e))
}
