//! OTP release tags and numeric version vectors

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Prefix carried by every OTP release tag
pub const RELEASE_PREFIX: &str = "OTP-";

/// Canonical release tag, always of the form `OTP-<version>`.
///
/// Construct with [`VersionTag::normalize`], which prepends the prefix when
/// it is missing and leaves already-prefixed input untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionTag(String);

impl VersionTag {
    /// Normalize a raw version string into a release tag
    pub fn normalize(raw: impl AsRef<str>) -> Self {
        let raw = raw.as_ref();
        if raw.starts_with(RELEASE_PREFIX) {
            Self(raw.to_string())
        } else {
            Self(format!("{}{}", RELEASE_PREFIX, raw))
        }
    }

    /// The tag as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The tag with its release prefix removed
    pub fn version_part(&self) -> &str {
        self.0.strip_prefix(RELEASE_PREFIX).unwrap_or(&self.0)
    }

    /// Numeric vector of the tag, `None` for pre-releases and other
    /// non-numeric tags
    pub fn vector(&self) -> Option<VersionVector> {
        VersionVector::parse(self.version_part())
    }
}

impl fmt::Display for VersionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for VersionTag {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Dot-separated numeric components of a version, e.g. `28.1.1` -> `[28, 1, 1]`.
///
/// Ordering pads the shorter vector with zeros, so `26.2` and `26.2.0`
/// compare equal. Equality follows the same rule.
#[derive(Debug, Clone)]
pub struct VersionVector(Vec<u64>);

impl VersionVector {
    /// Parse a version string made only of digits and `.` separators.
    ///
    /// Returns `None` for empty input, empty components (`27..1`) and any
    /// other character (`27.0-rc1`, `maint`).
    pub fn parse(version: &str) -> Option<Self> {
        if version.is_empty() {
            return None;
        }

        let components = version
            .split('.')
            .map(|part| {
                if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                part.parse::<u64>().ok()
            })
            .collect::<Option<Vec<_>>>()?;

        Some(Self(components))
    }

    /// Numeric components
    pub fn components(&self) -> &[u64] {
        &self.0
    }
}

impl Ord for VersionVector {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.0.len().max(other.0.len());
        for i in 0..len {
            let a = self.0.get(i).copied().unwrap_or(0);
            let b = other.0.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for VersionVector {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for VersionVector {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for VersionVector {}
