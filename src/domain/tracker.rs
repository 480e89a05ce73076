//! Tracker records
//!
//! A tracker owns the completion history for one recurring task plus the
//! per-tracker settings the forecast engine reads. Everything derived from
//! the history (intervals, stats, forecast, urgency) is recomputed on
//! demand and never stored here.

use crate::domain::CompletionRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default confidence multiplier assigned to new trackers.
pub const DEFAULT_SIGMA: f64 = 2.0;

/// A tracked recurring task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tracker {
    //=== Identity ===
    /// Store-assigned identifier, stable and never reused
    pub id: i64,

    /// Display name (not required to be unique)
    pub name: String,

    //=== Settings ===
    /// Confidence multiplier for the forecast band
    pub sigma: f64,

    //=== History ===
    /// Completions sorted ascending by timestamp
    pub history: Vec<CompletionRecord>,

    //=== Timestamps ===
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl Tracker {
    /// Create an empty tracker.
    pub fn new(id: i64, name: &str, sigma: f64, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: name.to_string(),
            sigma,
            history: Vec::new(),
            created_at: now,
            modified_at: now,
        }
    }

    /// Insert a completion, keeping the history sorted ascending by
    /// timestamp.
    ///
    /// Records dated before the latest entry are backfilled into position;
    /// records with equal timestamps keep insertion order.
    pub fn record(&mut self, record: CompletionRecord) {
        let pos = self
            .history
            .partition_point(|r| r.completed_at <= record.completed_at);
        self.history.insert(pos, record);
    }

    /// Timestamp of the latest completion, if any.
    pub fn last_completed(&self) -> Option<DateTime<Utc>> {
        self.history.last().map(|r| r.completed_at)
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.modified_at = Utc::now();
    }
}
