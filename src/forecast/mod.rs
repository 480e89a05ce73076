//! The forecasting engine.
//!
//! Four stateless passes run in order over one tracker's history: intervals,
//! window statistics, forecast, urgency. Data flows one way through the
//! pipeline and nothing is cached; every evaluation recomputes from the
//! history and the evaluation instant.

pub mod intervals;
pub mod rank;
pub mod urgency;
pub mod window;

pub use intervals::derive_intervals;
pub use rank::{SortKey, TrackerEntry, sort_entries};
pub use urgency::Urgency;
pub use window::{Trend, WINDOW_SIZE, WindowStats};

use crate::domain::Tracker;
use chrono::{DateTime, Duration, Utc};

/// Expected next completion with its confidence band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Forecast {
    /// Predicted next completion instant
    pub due_at: DateTime<Utc>,
    /// Earliest instant the task is expected to come due
    pub early: DateTime<Utc>,
    /// Latest instant before the task counts as overdue
    pub late: DateTime<Utc>,
}

impl Forecast {
    /// Project the next due instant from the last completion and the window
    /// statistics.
    ///
    /// `due_at` anchors on the last record's plain timestamp, not its
    /// adjusted one; adjustments only reshape intervals. The band spans
    /// `sigma * spread` to either side of `due_at`, rounded to the
    /// millisecond. By Chebyshev's inequality at least `1 - 1/sigma^2` of
    /// future intervals land inside the band whatever the interval
    /// distribution, 75% at the default sigma of 2. A zero spread collapses
    /// the band onto `due_at`. Instants that would land outside the
    /// representable time range clamp to its bounds.
    pub fn project(last_completed: DateTime<Utc>, stats: &WindowStats, sigma: f64) -> Self {
        let due_at = clamped_add(last_completed, stats.average);
        let band_ms = (sigma * stats.spread.num_milliseconds() as f64).round() as i64;
        let band = Duration::milliseconds(band_ms);
        Self {
            due_at,
            early: clamped_add(due_at, -band),
            late: clamped_add(due_at, band),
        }
    }
}

/// Shift an instant by a duration, clamping to the representable range
/// instead of overflowing.
fn clamped_add(instant: DateTime<Utc>, delta: Duration) -> DateTime<Utc> {
    match instant.checked_add_signed(delta) {
        Some(shifted) => shifted,
        None if delta < Duration::zero() => DateTime::<Utc>::MIN_UTC,
        None => DateTime::<Utc>::MAX_UTC,
    }
}

/// Everything derived from one tracker at one instant.
///
/// Statistics need at least one interval, so at least two completions; the
/// forecast and urgency need the statistics. Short histories leave the
/// fields `None` rather than producing errors.
#[derive(Debug, Clone, Copy)]
pub struct Assessment {
    pub stats: Option<WindowStats>,
    pub forecast: Option<Forecast>,
    pub urgency: Option<Urgency>,
}

/// Evaluate a tracker at `now`.
///
/// Pure function of the tracker's history and settings: derives intervals,
/// reduces them to window statistics, projects the forecast from the last
/// completion, and classifies urgency against `now`.
pub fn assess(tracker: &Tracker, now: DateTime<Utc>) -> Assessment {
    let intervals = derive_intervals(&tracker.history);
    let stats = WindowStats::from_intervals(&intervals);

    let forecast = match (&stats, tracker.last_completed()) {
        (Some(stats), Some(last)) => Some(Forecast::project(last, stats, tracker.sigma)),
        _ => None,
    };

    let urgency = forecast.map(|forecast| Urgency::classify(now, &forecast));

    Assessment { stats, forecast, urgency }
}
