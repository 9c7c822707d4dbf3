//! Command execution functions for bundler operations.
//!
//! Each command takes its collaborators explicitly so it can run against a
//! snapshot provider in tests.

mod compose;
mod last_n;
mod snapshot;

pub use compose::{ComposeRequest, compose};
pub use last_n::last_n;
pub use snapshot::snapshot;

use crate::release::{self, Package, Release};
use std::num::NonZeroUsize;

/// Windows the primary releases of `pkg`, naming the source on failure.
fn window_primary<R>(
    pkg: &Package<R>,
    minors: NonZeroUsize,
    releases: &[Release],
) -> release::Result<Vec<Release>> {
    release::last_n(minors, releases).map_err(|e| release::Error::History {
        source_id: pkg.primary.id.to_string(),
        source: Box::new(e),
    })
}
