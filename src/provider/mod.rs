//! Release metadata providers.
//!
//! A provider lists every release of one source. Two are available:
//!
//! - [`GithubProvider`] - GitHub REST API release listings
//! - [`SnapshotProvider`] - a JSON release collection on disk

mod github;
mod snapshot;

pub use github::{DEFAULT_API_URL, GithubProvider};
pub use snapshot::{SnapshotProvider, write_snapshot};

use crate::error::Result;
use crate::release::{Package, Release, ReleaseCollection, SourceId};
use std::future::Future;

/// Lists the releases of a source.
pub trait ReleaseProvider {
    /// Every known release of `source`, in no particular order.
    ///
    /// An unknown source yields an empty list rather than an error; the core
    /// reports the missing history with the package context attached.
    fn releases(&self, source: &SourceId) -> impl Future<Output = Result<Vec<Release>>> + Send;
}

/// Provider selected at runtime from command line arguments.
#[derive(Debug)]
pub enum Provider {
    Github(GithubProvider),
    Snapshot(SnapshotProvider),
}

impl ReleaseProvider for Provider {
    async fn releases(&self, source: &SourceId) -> Result<Vec<Release>> {
        match self {
            Provider::Github(p) => p.releases(source).await,
            Provider::Snapshot(p) => p.releases(source).await,
        }
    }
}

/// Builds the release collection for a package's primary and additional
/// sources, querying each distinct source once.
pub async fn collect_releases<P, R>(provider: &P, pkg: &Package<R>) -> Result<ReleaseCollection>
where
    P: ReleaseProvider,
{
    let mut all = ReleaseCollection::new();
    let sources = std::iter::once(&pkg.primary).chain(&pkg.additional);
    for src in sources {
        if all.contains_key(&src.id) {
            continue;
        }
        let releases = provider.releases(&src.id).await?;
        log::debug!("Found {} releases of {}", releases.len(), src.id);
        all.insert(src.id.clone(), releases);
    }
    Ok(all)
}
