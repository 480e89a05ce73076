//! Window statistics
//!
//! Reduces the trailing intervals to an average, a spread, and a trend
//! indicator. Only the most recent [`WINDOW_SIZE`] intervals count, so a
//! tracker whose cadence shifts settles onto the new cadence instead of
//! dragging its whole history along.

use chrono::Duration;
use std::cmp::Ordering;
use std::fmt;

/// Number of trailing intervals the statistics window holds.
pub const WINDOW_SIZE: usize = 12;

/// Direction of the most recent interval relative to the window average.
///
/// Informational only; the forecast itself never branches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Increasing,
    Decreasing,
    Flat,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Increasing => "increasing",
            Trend::Decreasing => "decreasing",
            Trend::Flat => "flat",
        }
    }

    /// Single-character indicator for list rows.
    pub fn arrow(&self) -> &'static str {
        match self {
            Trend::Increasing => "↑",
            Trend::Decreasing => "↓",
            Trend::Flat => "→",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Statistics over the trailing interval window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowStats {
    /// Arithmetic mean of the windowed intervals
    pub average: Duration,
    /// Mean absolute deviation from the average
    pub spread: Duration,
    /// Latest interval relative to the average
    pub trend: Trend,
}

impl WindowStats {
    /// Compute statistics over the trailing `min(WINDOW_SIZE, n)` intervals.
    ///
    /// Returns `None` for an empty sequence: with no intervals there is
    /// nothing to average, and callers treat the statistics as absent rather
    /// than as an error. All arithmetic happens on integer milliseconds, so
    /// results are exact to the millisecond with truncation toward zero.
    pub fn from_intervals(intervals: &[Duration]) -> Option<Self> {
        if intervals.is_empty() {
            return None;
        }
        let window = &intervals[intervals.len().saturating_sub(WINDOW_SIZE)..];
        let count = window.len() as i64;

        let sum_ms: i64 = window.iter().map(Duration::num_milliseconds).sum();
        let average_ms = sum_ms / count;

        let deviation_ms: i64 = window
            .iter()
            .map(|interval| (interval.num_milliseconds() - average_ms).abs())
            .sum();
        let spread_ms = deviation_ms / count;

        let last_ms = window[window.len() - 1].num_milliseconds();
        let trend = match last_ms.cmp(&average_ms) {
            Ordering::Greater => Trend::Increasing,
            Ordering::Less => Trend::Decreasing,
            Ordering::Equal => Trend::Flat,
        };

        Some(Self {
            average: Duration::milliseconds(average_ms),
            spread: Duration::milliseconds(spread_ms),
            trend,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_intervals_no_stats() {
        assert_eq!(WindowStats::from_intervals(&[]), None);
    }

    #[test]
    fn test_single_interval_is_its_own_average() {
        let stats = WindowStats::from_intervals(&[Duration::hours(48)]).unwrap();
        assert_eq!(stats.average, Duration::hours(48));
        assert_eq!(stats.spread, Duration::zero());
        assert_eq!(stats.trend, Trend::Flat);
    }

    #[test]
    fn test_irregular_cadence() {
        // 193h, 188h, 202h: sum 583h, average 194h20m exactly, spread
        // (4_800_000 + 22_800_000 + 27_600_000) / 3 ms = 5h6m40s exactly.
        let intervals = [
            Duration::hours(193),
            Duration::hours(188),
            Duration::hours(202),
        ];
        let stats = WindowStats::from_intervals(&intervals).unwrap();
        assert_eq!(stats.average, Duration::milliseconds(699_600_000));
        assert_eq!(stats.average, Duration::hours(194) + Duration::minutes(20));
        assert_eq!(stats.spread, Duration::milliseconds(18_400_000));
        assert_eq!(
            stats.spread,
            Duration::hours(5) + Duration::minutes(6) + Duration::seconds(40)
        );
        assert_eq!(stats.trend, Trend::Increasing);
    }

    #[test]
    fn test_window_drops_intervals_beyond_capacity() {
        // A 100h outlier older than the window must not influence anything.
        let mut intervals = vec![Duration::hours(100)];
        intervals.extend(std::iter::repeat_n(Duration::hours(10), WINDOW_SIZE));
        let stats = WindowStats::from_intervals(&intervals).unwrap();
        assert_eq!(stats.average, Duration::hours(10));
        assert_eq!(stats.spread, Duration::zero());
        assert_eq!(stats.trend, Trend::Flat);
    }

    #[test]
    fn test_trend_decreasing_when_latest_below_average() {
        let intervals = [Duration::hours(10), Duration::hours(20), Duration::hours(9)];
        let stats = WindowStats::from_intervals(&intervals).unwrap();
        assert_eq!(stats.trend, Trend::Decreasing);
    }

    #[test]
    fn test_trend_flat_when_latest_matches_average() {
        let intervals = [Duration::hours(9), Duration::hours(11), Duration::hours(10)];
        let stats = WindowStats::from_intervals(&intervals).unwrap();
        assert_eq!(stats.average, Duration::hours(10));
        assert_eq!(stats.trend, Trend::Flat);
    }

    #[test]
    fn test_spread_never_negative() {
        let intervals = [
            Duration::hours(1),
            Duration::hours(500),
            Duration::minutes(3),
            Duration::hours(72),
        ];
        let stats = WindowStats::from_intervals(&intervals).unwrap();
        assert!(stats.spread >= Duration::zero());
    }

    #[test]
    fn test_trend_strings() {
        assert_eq!(Trend::Increasing.to_string(), "increasing");
        assert_eq!(Trend::Decreasing.arrow(), "↓");
        assert_eq!(Trend::Flat.arrow(), "→");
    }
}
