//! Composing the ordered asset bundle for one target release.

use super::align::align;
use super::asset::{AcceptRule, Asset, filter_assets, sort_assets};
use super::model::{Release, SourceId};
use super::{Error, Result};
use std::collections::HashMap;
use std::fmt;

/// Every known release, keyed by source.
pub type ReleaseCollection = HashMap<SourceId, Vec<Release>>;

/// A release source together with the rule selecting its assets.
#[derive(Debug, Clone)]
pub struct PackageSource<R> {
    pub id: SourceId,
    pub rule: R,
}

/// A package: one primary source and the dependency sources merged into it.
#[derive(Debug, Clone)]
pub struct Package<R> {
    pub name: String,
    pub primary: PackageSource<R>,
    pub additional: Vec<PackageSource<R>>,
}

/// Which dependency release was aligned with the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentRecord {
    pub source: SourceId,
    pub target: String,
    pub chosen: String,
}

impl fmt::Display for AlignmentRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} for target {}", self.source, self.chosen, self.target)
    }
}

/// The composed, apply-ordered asset list of a target release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundle {
    pub assets: Vec<Asset>,
    pub alignments: Vec<AlignmentRecord>,
}

impl Bundle {
    /// Output file names, `<1-based position>-<name>`, in apply order.
    pub fn file_names(&self) -> Vec<String> {
        self.assets
            .iter()
            .enumerate()
            .map(|(i, asset)| format!("{}-{}", i + 1, asset.name))
            .collect()
    }
}

/// Builds the bundle for `target` of package `pkg`.
///
/// The target's own assets pass through the primary rule. For each
/// additional source, in order, one release is aligned with the target, its
/// assets pass through that source's rule, and the results are marked
/// secondary. The concatenation is sorted into apply order.
///
/// Names are not deduplicated; rules must not produce colliding names.
///
/// # Errors
///
/// - [`Error::MalformedVersion`] if the target tag is malformed
/// - [`Error::Dependency`] wrapping any alignment failure of a dependency
pub fn compose<R>(target: &Release, pkg: &Package<R>, all: &ReleaseCollection) -> Result<Bundle>
where
    R: AcceptRule,
{
    target.version()?;

    let mut assets: Vec<Asset> = filter_assets(&target.assets, &pkg.primary.rule, &target.tag)
        .into_iter()
        .map(|asset| Asset {
            secondary: false,
            ..asset
        })
        .collect();
    let mut alignments = Vec::with_capacity(pkg.additional.len());

    for src in &pkg.additional {
        let candidates = all.get(&src.id).map(Vec::as_slice).unwrap_or_default();
        let chosen = align(target, candidates).map_err(|e| Error::Dependency {
            source_id: src.id.to_string(),
            target: target.tag.clone(),
            source: Box::new(e),
        })?;

        assets.extend(
            filter_assets(&chosen.assets, &src.rule, &chosen.tag)
                .into_iter()
                .map(|asset| Asset {
                    secondary: true,
                    ..asset
                }),
        );
        alignments.push(AlignmentRecord {
            source: src.id.clone(),
            target: target.tag.clone(),
            chosen: chosen.tag.clone(),
        });
    }

    sort_assets(&mut assets);
    Ok(Bundle { assets, alignments })
}
