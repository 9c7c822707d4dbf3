//! Release collections stored as JSON.
//!
//! ```json
//! {
//!   "knative/serving": [
//!     {
//!       "tag": "v1.2.3",
//!       "created_at": "2024-03-01T12:00:00Z",
//!       "assets": [{ "name": "serving-core.yaml", "url": "https://..." }]
//!     }
//!   ]
//! }
//! ```

use super::ReleaseProvider;
use crate::error::{BundlerError, ErrorExt, Result};
use crate::release::{Asset, Release, ReleaseCollection, SourceId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotRelease {
    tag: String,
    created_at: DateTime<Utc>,
    #[serde(default)]
    assets: Vec<Asset>,
}

/// Serves releases from an in-memory collection loaded from disk.
#[derive(Debug, Clone, Default)]
pub struct SnapshotProvider {
    releases: ReleaseCollection,
}

impl SnapshotProvider {
    pub fn new(releases: ReleaseCollection) -> Self {
        Self { releases }
    }

    /// Reads a snapshot file written by [`write_snapshot`] or by hand.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).fs_context("reading release snapshot", path)?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let raw: BTreeMap<String, Vec<SnapshotRelease>> = serde_json::from_str(text)?;

        let mut releases = ReleaseCollection::with_capacity(raw.len());
        for (key, entries) in raw {
            let id: SourceId = key
                .parse()
                .map_err(|reason| BundlerError::Provider {
                    source_id: key.clone(),
                    reason,
                })?;
            let list = entries
                .into_iter()
                .map(|r| Release {
                    org: id.org.clone(),
                    repo: id.repo.clone(),
                    tag: r.tag,
                    created: r.created_at,
                    assets: r.assets,
                })
                .collect();
            releases.insert(id, list);
        }

        Ok(Self { releases })
    }
}

impl ReleaseProvider for SnapshotProvider {
    async fn releases(&self, source: &SourceId) -> Result<Vec<Release>> {
        Ok(self.releases.get(source).cloned().unwrap_or_default())
    }
}

/// Writes `releases` as a snapshot file, sources in name order.
pub fn write_snapshot(path: &Path, releases: &ReleaseCollection) -> Result<()> {
    let raw: BTreeMap<String, Vec<SnapshotRelease>> = releases
        .iter()
        .map(|(id, list)| {
            let entries = list
                .iter()
                .map(|r| SnapshotRelease {
                    tag: r.tag.clone(),
                    created_at: r.created,
                    assets: r.assets.clone(),
                })
                .collect();
            (id.to_string(), entries)
        })
        .collect();

    let json = serde_json::to_string_pretty(&raw)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).fs_context("creating snapshot directory", parent)?;
    }
    std::fs::write(path, json).fs_context("writing release snapshot", path)
}
