//! Release and asset builders shared by unit tests.

use super::asset::Asset;
use super::model::Release;
use chrono::{DateTime, Duration, TimeZone, Utc};

/// Fixed reference instant; test timestamps are offsets in minutes from it.
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

pub fn at(minutes: i64) -> DateTime<Utc> {
    epoch() + Duration::minutes(minutes)
}

/// Builds a release of `source` ("org/repo") created `minutes` after the epoch.
pub fn release(source: &str, tag: &str, minutes: i64, assets: &[&str]) -> Release {
    let (org, repo) = source.split_once('/').unwrap();
    Release {
        org: org.to_string(),
        repo: repo.to_string(),
        tag: tag.to_string(),
        created: at(minutes),
        assets: assets
            .iter()
            .map(|name| {
                Asset::new(
                    *name,
                    format!("https://github.com/{source}/releases/download/{tag}/{name}"),
                )
            })
            .collect(),
    }
}

pub fn tags(releases: &[Release]) -> Vec<&str> {
    releases.iter().map(|r| r.tag.as_str()).collect()
}
