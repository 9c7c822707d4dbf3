//! Retaining the most recent minor series of a release history.

use super::model::{Release, sorted_newest_first};
use super::version::Series;
use super::{Error, Result};
use std::num::NonZeroUsize;

/// Selects the last `minors` major.minor series from `releases`, keeping
/// every patch release within each retained series.
///
/// `releases` need not be sorted. The result is ordered newest first. When
/// fewer than `minors` series exist, every release is returned.
///
/// # Errors
///
/// - [`Error::EmptyReleaseSet`] if `releases` is empty
/// - [`Error::MalformedVersion`] if any tag fails to parse
pub fn last_n(minors: NonZeroUsize, releases: &[Release]) -> Result<Vec<Release>> {
    let sorted = sorted_newest_first(releases)?;
    let Some((first, _)) = sorted.first() else {
        return Err(Error::EmptyReleaseSet);
    };

    let mut remaining = minors.get();
    let mut previous = Series::of(first);
    let mut cut = sorted.len();
    for (i, (version, _)) in sorted.iter().enumerate() {
        let series = Series::of(version);
        if series == previous {
            continue;
        }
        previous = series;
        remaining -= 1;
        if remaining == 0 {
            cut = i;
            break;
        }
    }

    Ok(sorted[..cut].iter().map(|(_, r)| (*r).clone()).collect())
}
