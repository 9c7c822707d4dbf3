//! Choosing the dependency release that matches a target release.

use super::model::{Release, sorted_newest_first};
use super::version::Series;
use super::{Error, Result};

/// Picks the candidate release aligned with `target`.
///
/// Candidates are sorted newest first and narrowed to the contiguous block
/// sharing the target's major.minor series. Within that block the newest
/// candidate created at or before the target wins. If the target predates
/// the whole block, the oldest candidate in the block is used.
///
/// # Errors
///
/// - [`Error::NoMatchingSeries`] if no candidate shares the target's series
/// - [`Error::MalformedVersion`] if the target or any candidate tag is malformed
pub fn align<'a>(target: &Release, candidates: &'a [Release]) -> Result<&'a Release> {
    let series = target.series()?;
    let sorted = sorted_newest_first(candidates)?;

    // [start, end) over the newest-first list: first match, then first older series
    let start = sorted
        .iter()
        .position(|(v, _)| Series::of(v) == series)
        .ok_or_else(|| Error::NoMatchingSeries {
            target: target.tag.clone(),
            series: series.to_string(),
        })?;
    let end = sorted[start..]
        .iter()
        .position(|(v, _)| Series::of(v) < series)
        .map_or(sorted.len(), |offset| start + offset);
    let block = &sorted[start..end];

    let chosen = block
        .iter()
        .find(|(_, r)| r.created <= target.created)
        .or_else(|| block.last())
        .map(|(_, r)| *r)
        .ok_or_else(|| Error::NoMatchingSeries {
            target: target.tag.clone(),
            series: series.to_string(),
        })?;

    Ok(chosen)
}
