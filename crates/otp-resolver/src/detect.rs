//! Detection: which requirements the application expresses

use crate::tool_versions::{ConfigVersionSource, VersionParser};
use otp_core::types::BuildPlan;
use otp_core::Result;
use std::path::Path;
use tracing::debug;

/// Build the plan for `app_dir`.
///
/// Detection always passes: the runtime is provided unconditionally and one
/// requirement is added per source that requests a version.
pub fn detect<P: VersionParser>(
    app_dir: &Path,
    source: &ConfigVersionSource<P>,
) -> Result<BuildPlan> {
    let requirements = source.requirements(app_dir)?;

    for requirement in &requirements {
        debug!(
            "Requirement {} {} from {}",
            requirement.name,
            requirement.metadata.version,
            requirement.source().label()
        );
    }

    Ok(BuildPlan::providing_runtime(requirements))
}
