//! Listing the retained releases of a package.

use crate::config::PackageSet;
use crate::error::Result;
use crate::provider::ReleaseProvider;
use std::num::NonZeroUsize;

/// Tags of the package's primary releases within the last `minors` series,
/// newest first.
pub async fn last_n<P>(
    packages: &PackageSet,
    provider: &P,
    package: &str,
    minors: NonZeroUsize,
) -> Result<Vec<String>>
where
    P: ReleaseProvider,
{
    let pkg = packages.get(package)?;
    let releases = provider.releases(&pkg.primary.id).await?;
    let kept = super::window_primary(pkg, minors, &releases)?;
    log::debug!(
        "Keeping {} of {} releases of {}",
        kept.len(),
        releases.len(),
        pkg.primary.id
    );
    Ok(kept.into_iter().map(|r| r.tag).collect())
}
