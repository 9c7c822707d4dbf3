//! Saving release metadata for offline runs.

use crate::config::PackageSet;
use crate::error::Result;
use crate::provider::{ReleaseProvider, collect_releases, write_snapshot};
use crate::release::ReleaseCollection;
use std::path::Path;

/// Collects the releases of `package` (or of every package) and writes
/// them to `out` in the format read by `--releases`.
pub async fn snapshot<P>(
    packages: &PackageSet,
    provider: &P,
    package: Option<&str>,
    out: &Path,
) -> Result<ReleaseCollection>
where
    P: ReleaseProvider,
{
    let selected = match package {
        Some(name) => vec![packages.get(name)?],
        None => packages.iter().collect(),
    };

    let mut all = ReleaseCollection::new();
    for pkg in selected {
        for (source, releases) in collect_releases(provider, pkg).await? {
            all.entry(source).or_insert(releases);
        }
    }

    write_snapshot(out, &all)?;
    log::info!("Saved releases of {} sources to {}", all.len(), out.display());
    Ok(all)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::SnapshotProvider;
    use crate::release::SourceId;

    const PACKAGES: &str = r#"
[[package]]
name = "serving"
primary = { source = "knative/serving" }
additional = [{ source = "knative/net-istio" }]

[[package]]
name = "eventing"
primary = { source = "knative/eventing" }
additional = [{ source = "knative/net-istio" }]
"#;

    const RELEASES: &str = r#"{
        "knative/serving": [{ "tag": "v1.0.0", "created_at": "2024-01-01T00:00:00Z" }],
        "knative/eventing": [{ "tag": "v1.0.1", "created_at": "2024-01-02T00:00:00Z" }],
        "knative/net-istio": [{ "tag": "v1.0.0", "created_at": "2024-01-01T00:00:00Z" }],
        "knative/unrelated": [{ "tag": "v0.1.0", "created_at": "2024-01-01T00:00:00Z" }]
    }"#;

    #[tokio::test]
    async fn saves_every_package_source() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("releases.json");
        let packages = PackageSet::parse(PACKAGES).unwrap();
        let provider = SnapshotProvider::parse(RELEASES).unwrap();

        let saved = snapshot(&packages, &provider, None, &out).await.unwrap();
        assert_eq!(saved.len(), 3);
        assert!(!saved.contains_key(&SourceId::new("knative", "unrelated")));

        let reloaded = SnapshotProvider::load(&out).unwrap();
        let eventing = reloaded
            .releases(&SourceId::new("knative", "eventing"))
            .await
            .unwrap();
        assert_eq!(eventing[0].tag, "v1.0.1");
    }

    #[tokio::test]
    async fn saves_single_package() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("releases.json");
        let packages = PackageSet::parse(PACKAGES).unwrap();
        let provider = SnapshotProvider::parse(RELEASES).unwrap();

        let saved = snapshot(&packages, &provider, Some("serving"), &out)
            .await
            .unwrap();
        let mut sources: Vec<_> = saved.keys().map(ToString::to_string).collect();
        sources.sort();
        assert_eq!(sources, ["knative/net-istio", "knative/serving"]);
    }
}
