//! GitHub REST API release listings.

use super::ReleaseProvider;
use crate::error::{BundlerError, Result};
use crate::release::{Asset, Release, SourceId};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use url::Url;

/// Public GitHub API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com/";

/// Maximum page size accepted by the releases endpoint.
const PER_PAGE: usize = 100;

#[derive(Debug, Deserialize)]
struct GithubRelease {
    tag_name: String,
    created_at: DateTime<Utc>,
    #[serde(default)]
    draft: bool,
    #[serde(default)]
    assets: Vec<GithubAsset>,
}

#[derive(Debug, Deserialize)]
struct GithubAsset {
    name: String,
    browser_download_url: String,
}

/// Lists releases through `GET /repos/{org}/{repo}/releases`.
///
/// Requests are unauthenticated and never retried.
#[derive(Debug, Clone)]
pub struct GithubProvider {
    client: reqwest::Client,
    api_url: Url,
}

impl GithubProvider {
    /// Creates a provider against `api_url` (GitHub or GitHub Enterprise).
    pub fn new(api_url: &str) -> Result<Self> {
        let mut api_url = Url::parse(api_url)?;
        // Url::join drops the last path segment unless it ends with a slash
        if !api_url.path().ends_with('/') {
            let path = format!("{}/", api_url.path());
            api_url.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, api_url })
    }

    fn releases_url(&self, source: &SourceId) -> Result<Url> {
        Ok(self
            .api_url
            .join(&format!("repos/{}/{}/releases", source.org, source.repo))?)
    }
}

impl ReleaseProvider for GithubProvider {
    async fn releases(&self, source: &SourceId) -> Result<Vec<Release>> {
        let url = self.releases_url(source)?;
        let mut releases = Vec::new();

        for page in 1.. {
            log::debug!("Listing {} releases, page {}", source, page);
            let response = self
                .client
                .get(url.clone())
                .query(&[("per_page", PER_PAGE), ("page", page)])
                .header(reqwest::header::ACCEPT, "application/vnd.github+json")
                .send()
                .await?;

            if let Some(err) = status_error(source, response.status()) {
                return Err(err);
            }

            let batch: Vec<GithubRelease> = response.error_for_status()?.json().await?;
            let (page_releases, last_page) = read_page(source, batch);
            releases.extend(page_releases);
            if last_page {
                break;
            }
        }

        Ok(releases)
    }
}

/// Maps statuses that need a clearer message than reqwest's generic one.
fn status_error(source: &SourceId, status: reqwest::StatusCode) -> Option<BundlerError> {
    (status == reqwest::StatusCode::NOT_FOUND).then(|| BundlerError::Provider {
        source_id: source.to_string(),
        reason: "repository not found".to_string(),
    })
}

/// Converts one page of the listing, dropping drafts. The flag is true when
/// the page is short, i.e. no further page exists.
fn read_page(source: &SourceId, batch: Vec<GithubRelease>) -> (Vec<Release>, bool) {
    let last_page = batch.len() < PER_PAGE;
    let releases = batch
        .into_iter()
        .filter(|r| !r.draft)
        .map(|r| into_release(source, r))
        .collect();
    (releases, last_page)
}

fn into_release(source: &SourceId, release: GithubRelease) -> Release {
    Release {
        org: source.org.clone(),
        repo: source.repo.clone(),
        tag: release.tag_name,
        created: release.created_at,
        assets: release
            .assets
            .into_iter()
            .map(|a| Asset::new(a.name, a.browser_download_url))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_url_gains_trailing_slash() {
        let provider = GithubProvider::new("https://ghe.example.com/api/v3").unwrap();
        let url = provider
            .releases_url(&SourceId::new("knative", "serving"))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://ghe.example.com/api/v3/repos/knative/serving/releases"
        );
    }

    #[test]
    fn default_api_url() {
        let provider = GithubProvider::new(DEFAULT_API_URL).unwrap();
        let url = provider
            .releases_url(&SourceId::new("knative", "eventing"))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.github.com/repos/knative/eventing/releases"
        );
    }

    #[test]
    fn rejects_invalid_api_url() {
        assert!(matches!(
            GithubProvider::new("not a url"),
            Err(BundlerError::Url(_))
        ));
    }

    fn page(count: usize, draft_every: usize) -> Vec<GithubRelease> {
        (0..count)
            .map(|i| GithubRelease {
                tag_name: format!("v1.{i}.0"),
                created_at: "2024-03-01T12:00:00Z".parse().unwrap(),
                draft: draft_every > 0 && i % draft_every == 0,
                assets: Vec::new(),
            })
            .collect()
    }

    #[test]
    fn drafts_are_skipped() {
        let source = SourceId::new("knative", "serving");
        let (releases, _) = read_page(&source, page(4, 2));
        let tags: Vec<_> = releases.iter().map(|r| r.tag.as_str()).collect();
        assert_eq!(tags, ["v1.1.0", "v1.3.0"]);
    }

    #[test]
    fn full_page_continues_short_page_stops() {
        let source = SourceId::new("knative", "serving");

        let (releases, last) = read_page(&source, page(PER_PAGE, 0));
        assert_eq!(releases.len(), PER_PAGE);
        assert!(!last);

        // a full page of drafts still asks for the next page
        let (releases, last) = read_page(&source, page(PER_PAGE, 1));
        assert!(releases.is_empty());
        assert!(!last);

        let (_, last) = read_page(&source, page(PER_PAGE - 1, 0));
        assert!(last);
        let (_, last) = read_page(&source, Vec::new());
        assert!(last);
    }

    #[test]
    fn not_found_names_the_source() {
        let source = SourceId::new("knative", "missing");
        let err = status_error(&source, reqwest::StatusCode::NOT_FOUND).unwrap();
        assert_eq!(
            err.to_string(),
            "Release provider error for knative/missing: repository not found"
        );
        assert!(status_error(&source, reqwest::StatusCode::OK).is_none());
        // other failures are left to error_for_status
        assert!(status_error(&source, reqwest::StatusCode::FORBIDDEN).is_none());
    }

    #[test]
    fn maps_api_payload() {
        let payload = r#"[
            {
                "tag_name": "v1.2.3",
                "created_at": "2024-03-01T12:00:00Z",
                "draft": false,
                "assets": [
                    {
                        "name": "serving-core.yaml",
                        "browser_download_url": "https://github.com/knative/serving/releases/download/v1.2.3/serving-core.yaml",
                        "size": 1024
                    }
                ]
            }
        ]"#;
        let batch: Vec<GithubRelease> = serde_json::from_str(payload).unwrap();
        let source = SourceId::new("knative", "serving");
        let release = into_release(&source, batch.into_iter().next().unwrap());

        assert_eq!(release.to_string(), "knative/serving v1.2.3");
        assert_eq!(release.created.to_rfc3339(), "2024-03-01T12:00:00+00:00");
        assert_eq!(release.assets.len(), 1);
        assert_eq!(release.assets[0].name, "serving-core.yaml");
        assert!(!release.assets[0].secondary);
    }
}
