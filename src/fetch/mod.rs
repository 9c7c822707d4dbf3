//! Fetching asset bytes and storing composed bundles.
//!
//! # Module Organization
//!
//! - [`store`] - [`ArtifactStore`], staged and atomically published bundles
//! - `fs` - Idempotent directory helpers

mod fs;
pub mod store;

pub use store::ArtifactStore;

use crate::error::{BundlerError, ErrorExt, Result};
use bytes::Bytes;
use std::future::Future;
use url::Url;

/// Retrieves the bytes behind an asset URL.
pub trait Fetch {
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<Bytes>> + Send;
}

/// Fetches `http(s)` URLs with reqwest and `file` URLs from local disk.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<Bytes> {
        match url.scheme() {
            "http" | "https" => {
                log::debug!("Downloading {}", url);
                let response = self.client.get(url.clone()).send().await?;
                Ok(response.error_for_status()?.bytes().await?)
            }
            "file" => {
                let path = url.to_file_path().map_err(|()| BundlerError::Fetch {
                    file: url.to_string(),
                    reason: "not a local file path".to_string(),
                })?;
                log::debug!("Reading {}", path.display());
                let data = tokio::fs::read(&path)
                    .await
                    .fs_context("reading asset", &path)?;
                Ok(Bytes::from(data))
            }
            scheme => Err(BundlerError::Fetch {
                file: url.to_string(),
                reason: format!("unsupported URL scheme '{scheme}'"),
            }),
        }
    }
}
