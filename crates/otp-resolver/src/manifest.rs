//! Builds manifest scanning
//!
//! A builds manifest (`builds.txt`) is an append-only list with one build per
//! line: the release tag first, then build metadata (commit, date, digest)
//! that is ignored here. Alongside stable releases (`OTP-28.1.1`) it carries
//! release candidates (`OTP-28.0-rc1`) and branch builds (`master`, `maint`,
//! `maint-27`). Lines are not sorted.

use otp_core::types::{VersionTag, VersionVector, RELEASE_PREFIX};
use otp_core::{Error, Result};
use std::io::BufRead;
use tracing::{debug, trace};

/// Classification of a single manifest line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineClass<'a> {
    /// Blank line, no tag
    Blank,
    /// Tag that is not a stable release (branch build, pre-release, unprefixed)
    Unstable(&'a str),
    /// Stable release tag with its numeric vector
    Stable {
        tag: &'a str,
        vector: VersionVector,
    },
}

impl LineClass<'_> {
    pub fn is_stable(&self) -> bool {
        matches!(self, LineClass::Stable { .. })
    }

    /// Version vector of a stable line
    pub fn vector(&self) -> Option<&VersionVector> {
        match self {
            LineClass::Stable { vector, .. } => Some(vector),
            _ => None,
        }
    }
}

/// Classify one manifest line by its first whitespace-delimited token
pub fn classify(line: &str) -> LineClass<'_> {
    let Some(tag) = line.split_whitespace().next() else {
        return LineClass::Blank;
    };

    match tag
        .strip_prefix(RELEASE_PREFIX)
        .and_then(VersionVector::parse)
    {
        Some(vector) => LineClass::Stable { tag, vector },
        None => LineClass::Unstable(tag),
    }
}

/// Return the numerically greatest stable release in a manifest.
///
/// Consumes `lines` in a single pass without buffering the manifest. Equal
/// vectors keep the tag seen first (`OTP-26.2` wins over a later
/// `OTP-26.2.0`).
pub fn select_latest_stable<I, L>(lines: I) -> Result<VersionTag>
where
    I: IntoIterator<Item = std::io::Result<L>>,
    L: AsRef<str>,
{
    let mut latest: Option<(String, VersionVector)> = None;

    for line in lines {
        let line = line.map_err(Error::ManifestRead)?;

        match classify(line.as_ref()) {
            LineClass::Blank => continue,
            LineClass::Unstable(tag) => {
                trace!("Skipping non-stable build {}", tag);
            }
            LineClass::Stable { tag, vector } => {
                let newer = latest
                    .as_ref()
                    .map_or(true, |(_, current)| vector > *current);
                if newer {
                    latest = Some((tag.to_string(), vector));
                }
            }
        }
    }

    let (tag, _) = latest.ok_or(Error::NoStableVersionFound)?;
    debug!("Latest stable release in manifest: {}", tag);
    Ok(VersionTag::normalize(tag))
}

/// [`select_latest_stable`] over a buffered reader.
///
/// Lines are decoded lossily, so non-UTF-8 build metadata never fails the
/// scan.
pub fn select_latest_stable_from_reader<R: BufRead>(reader: R) -> Result<VersionTag> {
    select_latest_stable(
        reader
            .split(b'\n')
            .map(|line| line.map(|bytes| String::from_utf8_lossy(&bytes).into_owned())),
    )
}
