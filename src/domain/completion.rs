//! Completion records
//!
//! A completion is one recorded instance of a tracked task being done:
//! an absolute timestamp plus an optional signed adjustment the user
//! supplies when the recorded time was earlier or later than ideal.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A single recorded completion of a tracked task.
///
/// Immutable once created; owned exclusively by a tracker's history list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRecord {
    /// When the task was done
    pub completed_at: DateTime<Utc>,

    /// Signed correction, default zero: how much earlier/later than ideal
    /// this completion happened
    #[serde(with = "duration_ms", default = "Duration::zero")]
    pub adjustment: Duration,
}

impl CompletionRecord {
    /// Create a record with an explicit adjustment.
    pub fn new(completed_at: DateTime<Utc>, adjustment: Duration) -> Self {
        Self {
            completed_at,
            adjustment,
        }
    }

    /// Create a record with zero adjustment.
    pub fn at(completed_at: DateTime<Utc>) -> Self {
        Self::new(completed_at, Duration::zero())
    }

    /// The completion instant with its adjustment applied.
    ///
    /// Interval derivation uses this as the endpoint of each interval: the
    /// later record's adjustment shifts the interval, the earlier one's does
    /// not. Shifts past either end of the representable time range clamp to
    /// that bound.
    pub fn adjusted_at(&self) -> DateTime<Utc> {
        match self.completed_at.checked_add_signed(self.adjustment) {
            Some(adjusted) => adjusted,
            None if self.adjustment < Duration::zero() => DateTime::<Utc>::MIN_UTC,
            None => DateTime::<Utc>::MAX_UTC,
        }
    }
}

/// Serialize durations as integer milliseconds so stored adjustments stay
/// exact across backup round-trips.
mod duration_ms {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(value.num_milliseconds())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let ms = i64::deserialize(deserializer)?;
        Ok(Duration::milliseconds(ms))
    }
}
