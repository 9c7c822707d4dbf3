//! Writing composed bundles to disk.
//!
//! A bundle for `<package>` at tag `v1.2.3` lands in
//! `<root>/<package>/1.2.3/` as `1-<asset>`, `2-<asset>`, ... so that
//! directory order matches apply order. Files are written into a staging
//! directory beside the destination, which replaces the destination only
//! after every asset was fetched. A failed or cancelled run leaves the
//! previous bundle (if any) untouched.

use super::{Fetch, fs};
use crate::error::{BundlerError, Result};
use crate::release::{Bundle, Release};
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use url::Url;

/// Output tree of composed bundles.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory holding the bundle of `package` for `target`.
    pub fn bundle_dir(&self, package: &str, target: &Release) -> PathBuf {
        self.root.join(package).join(target.short_tag())
    }

    /// Fetches every asset of `bundle` in order and publishes the result.
    ///
    /// Returns the written paths in apply order.
    ///
    /// # Errors
    ///
    /// - [`BundlerError::Fetch`] naming the output file that failed
    /// - [`BundlerError::Cancelled`] if `cancel` fires before publication
    pub async fn store_bundle<F>(
        &self,
        fetcher: &F,
        package: &str,
        target: &Release,
        bundle: &Bundle,
        cancel: &CancellationToken,
    ) -> Result<Vec<PathBuf>>
    where
        F: Fetch,
    {
        let dest = self.bundle_dir(package, target);
        let parent = dest.parent().unwrap_or(self.root.as_path()).to_path_buf();
        fs::create_dir_all(&parent).await?;

        // Dropped on any early return, which deletes the partial bundle
        let staging = tempfile::Builder::new()
            .prefix(".staging-")
            .tempdir_in(&parent)
            .map_err(|e| BundlerError::Fs {
                action: "creating staging directory in",
                path: parent.clone(),
                source: e,
            })?;

        let file_names = bundle.file_names();
        for (asset, file) in bundle.assets.iter().zip(&file_names) {
            let fetch_error = |reason: String| BundlerError::Fetch {
                file: file.clone(),
                reason,
            };

            if asset.name.contains(['/', '\\']) {
                return Err(fetch_error(format!("unsafe asset name '{}'", asset.name)));
            }
            let url = Url::parse(&asset.url).map_err(|e| fetch_error(e.to_string()))?;

            log::info!("{} <- {}", file, url);
            let bytes = tokio::select! {
                _ = cancel.cancelled() => return Err(BundlerError::Cancelled(target.to_string())),
                fetched = fetcher.fetch(&url) => fetched.map_err(|e| fetch_error(e.to_string()))?,
            };

            tokio::fs::write(staging.path().join(file), &bytes)
                .await
                .map_err(|e| fetch_error(format!("unable to write: {e}")))?;
        }

        if cancel.is_cancelled() {
            return Err(BundlerError::Cancelled(target.to_string()));
        }
        fs::replace_dir(staging.path(), &dest).await?;

        Ok(file_names.iter().map(|f| dest.join(f)).collect())
    }
}
