//! Release values and source identifiers.

use super::asset::Asset;
use super::version::{Series, parse_tag};
use super::Result;
use chrono::{DateTime, Utc};
use semver::Version;
use std::fmt;
use std::str::FromStr;

/// Identifies a release source as `org/repo`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId {
    pub org: String,
    pub repo: String,
}

impl SourceId {
    pub fn new(org: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            org: org.into(),
            repo: repo.into(),
        }
    }
}

impl FromStr for SourceId {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((org, repo))
                if !org.is_empty() && !repo.is_empty() && !repo.contains('/') =>
            {
                Ok(Self::new(org, repo))
            }
            _ => Err(format!("expected 'org/repo', got '{s}'")),
        }
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.org, self.repo)
    }
}

/// A tagged release of one source and the assets published with it.
///
/// Releases are immutable snapshots from a metadata provider. The core never
/// edits `assets` in place; filtering produces copies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    pub org: String,
    pub repo: String,
    /// Semantic version tag, e.g. `v0.17.5`
    pub tag: String,
    pub created: DateTime<Utc>,
    pub assets: Vec<Asset>,
}

impl Release {
    /// Parsed semantic version of the tag.
    pub fn version(&self) -> Result<Version> {
        parse_tag(&self.tag)
    }

    /// Major.minor series of the tag.
    pub fn series(&self) -> Result<Series> {
        Series::from_tag(&self.tag)
    }

    /// Tag without the leading `v`, used as the bundle directory name.
    pub fn short_tag(&self) -> &str {
        self.tag.strip_prefix('v').unwrap_or(&self.tag)
    }
}

impl fmt::Display for Release {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} {}", self.org, self.repo, self.tag)
    }
}

/// Parses every release's version once and returns the releases newest
/// first, paired with their versions.
///
/// Sorting is stable, so releases with equal precedence keep input order.
pub(crate) fn sorted_newest_first<'a, I>(releases: I) -> Result<Vec<(Version, &'a Release)>>
where
    I: IntoIterator<Item = &'a Release>,
{
    let mut keyed = releases
        .into_iter()
        .map(|r| Ok((r.version()?, r)))
        .collect::<Result<Vec<_>>>()?;
    keyed.sort_by(|(a, _), (b, _)| b.cmp_precedence(a));
    Ok(keyed)
}
