//! File system utilities for publishing bundles.
//!
//! Removal and creation are idempotent so an interrupted run can simply be
//! repeated.

use crate::error::{ErrorExt, Result};
use std::{io, path::Path};
use tokio::fs;

/// Creates all of the directories of the specified path.
pub async fn create_dir_all(path: &Path) -> Result<()> {
    // create_dir_all is already idempotent - succeeds even if dir exists
    fs::create_dir_all(path)
        .await
        .fs_context("creating directory", path)
}

/// Removes the directory and its contents if it exists.
pub async fn remove_dir_all(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()), // Idempotent
        Err(e) => Err(e).fs_context("removing directory", path),
    }
}

/// Moves a fully written staging directory to `dest`, replacing whatever
/// was there before.
pub async fn replace_dir(staging: &Path, dest: &Path) -> Result<()> {
    remove_dir_all(dest).await?;
    fs::rename(staging, dest)
        .await
        .fs_context("publishing bundle directory", dest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn remove_missing_dir_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        remove_dir_all(&dir.path().join("absent")).await.unwrap();
    }

    #[tokio::test]
    async fn replace_dir_swaps_contents() {
        let dir = tempfile::tempdir().unwrap();
        let staging = dir.path().join("staging");
        let dest = dir.path().join("dest");
        create_dir_all(&staging).await.unwrap();
        create_dir_all(&dest).await.unwrap();
        std::fs::write(staging.join("new"), b"new").unwrap();
        std::fs::write(dest.join("old"), b"old").unwrap();

        replace_dir(&staging, &dest).await.unwrap();

        assert!(dest.join("new").exists());
        assert!(!dest.join("old").exists());
        assert!(!staging.exists());
    }
}
