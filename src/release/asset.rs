//! Release assets, accept rules, and apply-order placement.
//!
//! Assets are applied to a cluster in file order, so the order of a bundle
//! matters. [`Asset::apply_order`] encodes the placement policy as an
//! explicit list of suffix rules evaluated in priority order, followed by
//! primary-before-secondary and then name order.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A single artifact published with a release.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Asset {
    /// File name of the artifact (possibly renamed by an accept rule)
    pub name: String,

    /// Location the artifact bytes are fetched from
    pub url: String,

    /// True when the asset came from an aligned dependency release; set only
    /// by composition, never read from release metadata
    #[serde(skip)]
    pub secondary: bool,
}

impl Asset {
    /// Creates a primary asset.
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            secondary: false,
        }
    }

    /// Total apply order between two assets.
    ///
    /// Rules are tried in [`PLACEMENT_RULES`] order. A rule decides only when
    /// exactly one of the two names carries its marker; otherwise evaluation
    /// falls through. After the suffix rules, primary assets precede
    /// secondary ones, and finally names compare lexicographically.
    pub fn apply_order(&self, other: &Self) -> Ordering {
        for rule in PLACEMENT_RULES {
            match (rule.matches(&self.name), rule.matches(&other.name)) {
                (true, false) => return rule.placement.when_first_matches(),
                (false, true) => return rule.placement.when_first_matches().reverse(),
                _ => {}
            }
        }

        self.secondary
            .cmp(&other.secondary)
            .then_with(|| self.name.cmp(&other.name))
    }

    /// True when `self` must be applied before `other`.
    pub fn precedes(&self, other: &Self) -> bool {
        self.apply_order(other) == Ordering::Less
    }
}

/// Where an asset matching a placement rule goes relative to one that doesn't.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    First,
    Last,
}

impl Placement {
    fn when_first_matches(self) -> Ordering {
        match self {
            Placement::First => Ordering::Less,
            Placement::Last => Ordering::Greater,
        }
    }
}

/// A name-suffix rule that pins matching assets to the front or back.
#[derive(Debug, Clone, Copy)]
pub struct PlacementRule {
    pub suffix: &'static str,
    pub placement: Placement,
}

impl PlacementRule {
    pub fn matches(&self, name: &str) -> bool {
        name.ends_with(self.suffix)
    }
}

/// Suffix placement rules in priority order.
pub const PLACEMENT_RULES: &[PlacementRule] = &[
    // Pre-install jobs must run to completion, not just be submitted,
    // before anything else is applied.
    PlacementRule {
        suffix: "-pre-install-jobs.yaml",
        placement: Placement::First,
    },
    // CRDs must exist before resources that reference them.
    PlacementRule {
        suffix: "-crds.yaml",
        placement: Placement::First,
    },
    // Cleanup and migration jobs run last.
    PlacementRule {
        suffix: "-post-install-jobs.yaml",
        placement: Placement::Last,
    },
    // The sugar controller collates before the channel and broker manifests
    // it augments but has to be applied after them.
    PlacementRule {
        suffix: "-sugar-controller.yaml",
        placement: Placement::Last,
    },
];

/// Decides which raw asset names of a source become bundle assets.
///
/// Returns `None` to drop the asset, or the (possibly renamed) output name.
/// `tag` is the tag of the release the asset belongs to.
pub trait AcceptRule {
    fn accept(&self, name: &str, tag: &str) -> Option<String>;
}

impl<F> AcceptRule for F
where
    F: Fn(&str, &str) -> Option<String>,
{
    fn accept(&self, name: &str, tag: &str) -> Option<String> {
        self(name, tag)
    }
}

/// Copies the assets accepted by `rule`, applying any rename.
///
/// The input slice is left untouched.
pub fn filter_assets<R>(assets: &[Asset], rule: &R, tag: &str) -> Vec<Asset>
where
    R: AcceptRule + ?Sized,
{
    assets
        .iter()
        .filter_map(|asset| {
            rule.accept(&asset.name, tag)
                .filter(|name| !name.is_empty())
                .map(|name| Asset {
                    name,
                    ..asset.clone()
                })
        })
        .collect()
}

/// Sorts assets into apply order.
pub fn sort_assets(assets: &mut [Asset]) {
    assets.sort_by(Asset::apply_order);
}
