//! Release tag parsing and version ordering.
//!
//! Tags are semantic versions with an optional leading `v` (`v0.17.5`).
//! The `vMAJOR` and `vMAJOR.MINOR` shorthands are accepted and padded with
//! zeros. Precedence ignores build metadata.

use super::{Error, Result};
use semver::Version;
use std::cmp::Ordering;
use std::fmt;

/// The major.minor prefix of a version.
///
/// Releases within one series are expected to be artifact-compatible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Series {
    pub major: u64,
    pub minor: u64,
}

impl Series {
    /// Series of an already parsed version.
    pub fn of(version: &Version) -> Self {
        Self {
            major: version.major,
            minor: version.minor,
        }
    }

    /// Parses `tag` and returns its series.
    pub fn from_tag(tag: &str) -> Result<Self> {
        parse_tag(tag).map(|v| Self::of(&v))
    }
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}", self.major, self.minor)
    }
}

/// Parses a release tag into a semantic version.
///
/// # Errors
///
/// Returns [`Error::MalformedVersion`] when the tag is not a semantic
/// version. Malformed tags never compare equal to anything.
pub fn parse_tag(tag: &str) -> Result<Version> {
    let trimmed = tag.strip_prefix('v').unwrap_or(tag);
    let malformed = |reason: String| Error::MalformedVersion {
        tag: tag.to_string(),
        reason,
    };

    // Split off pre-release/build suffixes before counting core components
    let core_end = trimmed.find(['-', '+']).unwrap_or(trimmed.len());
    let (core, suffix) = trimmed.split_at(core_end);
    let padded = match core.split('.').count() {
        1 if suffix.is_empty() => format!("{core}.0.0"),
        2 if suffix.is_empty() => format!("{core}.0"),
        _ => trimmed.to_string(),
    };

    Version::parse(&padded).map_err(|e| malformed(e.to_string()))
}

/// Compares only the major.minor series of two tags.
pub fn compare_series(a: &str, b: &str) -> Result<Ordering> {
    Ok(Series::from_tag(a)?.cmp(&Series::from_tag(b)?))
}

/// Compares the full semantic version precedence of two tags.
///
/// Ascending: `compare_full("v1.0.0", "v1.0.1")` is `Less`. Callers wanting
/// newest-first order sort with the arguments swapped.
pub fn compare_full(a: &str, b: &str) -> Result<Ordering> {
    Ok(parse_tag(a)?.cmp_precedence(&parse_tag(b)?))
}
