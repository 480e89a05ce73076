//! Interval derivation
//!
//! Converts a tracker's ordered completion history into the sequence of
//! elapsed intervals the window statistics consume.

use crate::domain::CompletionRecord;
use chrono::Duration;

/// Derive the elapsed intervals between consecutive completions.
///
/// A history of `n` records yields `n - 1` intervals; fewer than two records
/// yield an empty sequence, not an error. Each interval runs from one
/// record's timestamp to the next record's adjusted timestamp, so the later
/// record's adjustment shifts the interval and the earlier one's does not.
/// Assumes the history is sorted ascending; ordering is the caller's
/// contract and is not validated here.
pub fn derive_intervals(history: &[CompletionRecord]) -> Vec<Duration> {
    history
        .windows(2)
        .map(|pair| pair[1].adjusted_at() - pair[0].completed_at)
        .collect()
}
