//! Release alignment and asset bundle composition.
//!
//! This module is the pure, synchronous core of the bundler. Given a target
//! release and every known release of each dependency source, it picks one
//! aligned dependency release per source, filters and renames assets, and
//! merges everything into a single strictly ordered asset list.
//!
//! # Module Organization
//!
//! - [`version`] - Tag parsing and series/full version comparison
//! - [`asset`] - Assets, accept rules, and the placement ordering
//! - [`model`] - Release values and source identifiers
//! - [`window`] - Retaining the last N minor series of a release history
//! - [`align`] - Picking the dependency release that matches a target
//! - [`compose`] - Merging primary and dependency assets into one bundle

pub mod align;
pub mod asset;
pub mod compose;
pub mod model;
pub mod version;
pub mod window;

#[cfg(test)]
pub(crate) mod test_support;

pub use align::align;
pub use asset::{AcceptRule, Asset, filter_assets, sort_assets};
pub use compose::{AlignmentRecord, Bundle, Package, PackageSource, ReleaseCollection, compose};
pub use model::{Release, SourceId};
pub use version::{Series, compare_full, compare_series, parse_tag};
pub use window::last_n;

use thiserror::Error;

/// Result type alias for release operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while comparing, windowing, aligning, or composing releases.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A tag could not be parsed as a semantic version
    #[error("malformed version '{tag}': {reason}")]
    MalformedVersion {
        /// Tag as found on the release
        tag: String,
        /// Parser message
        reason: String,
    },

    /// No candidate release shares the target's major.minor series
    #[error("no release in series {series} to align with {target}")]
    NoMatchingSeries {
        /// Target tag being aligned against
        target: String,
        /// The major.minor series that had no candidates
        series: String,
    },

    /// A release window was requested over an empty history
    #[error("cannot select releases from an empty release set")]
    EmptyReleaseSet,

    /// Failure while handling one dependency source of a package
    #[error("dependency {source_id} for {target}: {source}")]
    Dependency {
        /// Dependency source identifier (org/repo)
        source_id: String,
        /// Target tag the bundle is being composed for
        target: String,
        /// Underlying failure
        source: Box<Error>,
    },

    /// Failure while handling the release history of a package's own source
    #[error("releases of {source_id}: {source}")]
    History {
        /// Source identifier (org/repo)
        source_id: String,
        /// Underlying failure
        source: Box<Error>,
    },
}
