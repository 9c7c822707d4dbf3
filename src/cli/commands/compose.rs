//! Composing and writing bundles for a package.

use crate::config::PackageSet;
use crate::error::{CliError, Result};
use crate::fetch::{ArtifactStore, Fetch, HttpFetcher};
use crate::provider::{ReleaseProvider, collect_releases};
use crate::release::{self, Package, Release};
use std::cmp::Ordering;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;

/// Parameters of one `compose` invocation.
#[derive(Debug, Clone, Copy)]
pub struct ComposeRequest<'a> {
    pub package: &'a str,
    /// Single target tag; when absent, every release in the last `minors` series
    pub tag: Option<&'a str>,
    pub minors: NonZeroUsize,
    pub dry_run: bool,
}

/// Composes bundles for the requested target releases and writes them
/// below `output`, cancelling the fetch loop on Ctrl-C.
pub async fn compose<P>(
    packages: &PackageSet,
    provider: &P,
    output: &Path,
    request: ComposeRequest<'_>,
) -> Result<Vec<PathBuf>>
where
    P: ReleaseProvider,
{
    let cancel = CancellationToken::new();
    let listener = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                log::warn!("Interrupted, abandoning the bundle in progress");
                cancel.cancel();
            }
        }
    });

    let fetcher = HttpFetcher::new()?;
    let result = compose_with(packages, provider, &fetcher, output, request, &cancel).await;
    listener.abort();
    result
}

/// [`compose`] with an explicit fetcher and cancellation token.
pub async fn compose_with<P, F>(
    packages: &PackageSet,
    provider: &P,
    fetcher: &F,
    output: &Path,
    request: ComposeRequest<'_>,
    cancel: &CancellationToken,
) -> Result<Vec<PathBuf>>
where
    P: ReleaseProvider,
    F: Fetch,
{
    let pkg = packages.get(request.package)?;
    let all = collect_releases(provider, pkg).await?;
    let primary = all
        .get(&pkg.primary.id)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let targets = select_targets(pkg, primary, &request)?;
    let store = ArtifactStore::new(output);
    let mut written = Vec::new();

    for target in &targets {
        let bundle = release::compose(target, pkg, &all)?;
        for record in &bundle.alignments {
            log::info!("Using {} {} with {}", record.source, record.chosen, target);
        }

        if request.dry_run {
            let dir = store.bundle_dir(&pkg.name, target);
            for name in bundle.file_names() {
                println!("{}", dir.join(name).display());
            }
            continue;
        }

        let paths = store
            .store_bundle(fetcher, &pkg.name, target, &bundle, cancel)
            .await?;
        log::info!(
            "Wrote {} files for {} to {}",
            paths.len(),
            target,
            store.bundle_dir(&pkg.name, target).display()
        );
        written.extend(paths);
    }

    Ok(written)
}

/// The requested tag, matched by version so `1.2.0` finds `v1.2.0`, or
/// every release in the last `minors` series.
fn select_targets<R>(
    pkg: &Package<R>,
    primary: &[Release],
    request: &ComposeRequest<'_>,
) -> Result<Vec<Release>> {
    let Some(tag) = request.tag else {
        return Ok(super::window_primary(pkg, request.minors, primary)?);
    };

    let wanted = release::parse_tag(tag)?;
    primary
        .iter()
        .find(|r| {
            r.version()
                .is_ok_and(|v| v.cmp_precedence(&wanted) == Ordering::Equal)
        })
        .cloned()
        .map(|r| vec![r])
        .ok_or_else(|| {
            CliError::InvalidArguments {
                reason: format!("{} has no release {tag}", pkg.primary.id),
            }
            .into()
        })
}
