//! Tracker ranking
//!
//! Sort rules for listings of assessed trackers. Trackers that cannot be
//! forecast sort after every tracker that can, whether or not the order is
//! reversed, and identifier ties always resolve ascending.

use crate::domain::Tracker;
use crate::forecast::{Assessment, assess};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;

/// Primary sort key for tracker listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Forecast due instant, soonest first
    #[default]
    Due,
    /// Latest completion, oldest first
    LastCompleted,
    /// Display name
    Name,
    /// Identifier
    Id,
}

impl SortKey {
    /// Cycle to the next key, for the interactive sort toggle.
    pub fn next(self) -> Self {
        match self {
            SortKey::Due => SortKey::LastCompleted,
            SortKey::LastCompleted => SortKey::Name,
            SortKey::Name => SortKey::Id,
            SortKey::Id => SortKey::Due,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Due => "due",
            SortKey::LastCompleted => "last",
            SortKey::Name => "name",
            SortKey::Id => "id",
        }
    }

    /// Parse a sort argument as given on the command line.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "due" | "next" => Some(SortKey::Due),
            "last" | "completed" => Some(SortKey::LastCompleted),
            "name" => Some(SortKey::Name),
            "id" => Some(SortKey::Id),
            _ => None,
        }
    }
}

/// A tracker paired with its assessment, ready for listing.
#[derive(Debug, Clone)]
pub struct TrackerEntry {
    pub tracker: Tracker,
    pub assessment: Assessment,
}

impl TrackerEntry {
    /// Assess a tracker at `now` and bundle the result.
    pub fn assess(tracker: Tracker, now: DateTime<Utc>) -> Self {
        let assessment = assess(&tracker, now);
        Self { tracker, assessment }
    }
}

/// Sort entries in place by `key`.
///
/// `reverse` inverts the primary comparison only. Entries missing the
/// primary key (no forecast, or no completions) stay at the end either way,
/// and ties keep ascending identifier order.
pub fn sort_entries(entries: &mut [TrackerEntry], key: SortKey, reverse: bool) {
    entries.sort_by(|a, b| {
        let primary = match key {
            SortKey::Due => cmp_optional(
                a.assessment.forecast.map(|f| f.due_at),
                b.assessment.forecast.map(|f| f.due_at),
                reverse,
            ),
            SortKey::LastCompleted => {
                cmp_optional(a.tracker.last_completed(), b.tracker.last_completed(), reverse)
            }
            SortKey::Name => directed(a.tracker.name.cmp(&b.tracker.name), reverse),
            SortKey::Id => directed(a.tracker.id.cmp(&b.tracker.id), reverse),
        };
        primary.then_with(|| a.tracker.id.cmp(&b.tracker.id))
    });
}

/// Present keys compare directed; absent keys sort last regardless of
/// direction.
fn cmp_optional<K: Ord>(a: Option<K>, b: Option<K>, reverse: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => directed(a.cmp(&b), reverse),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn directed(ord: Ordering, reverse: bool) -> Ordering {
    if reverse { ord.reverse() } else { ord }
}
