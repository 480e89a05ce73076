//! Urgency classification
//!
//! Compares an evaluation instant against a forecast's expected band. There
//! is no persisted urgency state and no hysteresis; every evaluation
//! classifies from scratch.

use crate::forecast::Forecast;
use chrono::{DateTime, Utc};
use std::fmt;

/// Where "now" falls relative to a tracker's forecast band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    /// Before the early bound
    NotYet,
    /// Inside the band, boundaries included
    DueNow,
    /// Past the late bound
    Overdue,
}

impl Urgency {
    /// Classify `now` against the forecast band.
    ///
    /// Both bounds are inclusive, so `now == late` still classifies as
    /// `DueNow`. Only trackers with a forecast can be classified; callers
    /// carry `Option<Urgency>` alongside `Option<Forecast>`.
    pub fn classify(now: DateTime<Utc>, forecast: &Forecast) -> Self {
        if now > forecast.late {
            Urgency::Overdue
        } else if now >= forecast.early {
            Urgency::DueNow
        } else {
            Urgency::NotYet
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::NotYet => "not yet",
            Urgency::DueNow => "due",
            Urgency::Overdue => "overdue",
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDateTime};

    fn dt(s: &str) -> DateTime<Utc> {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap().and_utc()
    }

    fn band() -> Forecast {
        let due_at = dt("2025-06-15 12:00");
        Forecast {
            due_at,
            early: due_at - Duration::hours(6),
            late: due_at + Duration::hours(6),
        }
    }

    #[test]
    fn test_before_early_is_not_yet() {
        let urgency = Urgency::classify(dt("2025-06-15 05:59"), &band());
        assert_eq!(urgency, Urgency::NotYet);
    }

    #[test]
    fn test_early_bound_is_due() {
        let urgency = Urgency::classify(dt("2025-06-15 06:00"), &band());
        assert_eq!(urgency, Urgency::DueNow);
    }

    #[test]
    fn test_inside_band_is_due() {
        let urgency = Urgency::classify(dt("2025-06-15 12:00"), &band());
        assert_eq!(urgency, Urgency::DueNow);
    }

    #[test]
    fn test_late_bound_is_still_due() {
        let urgency = Urgency::classify(dt("2025-06-15 18:00"), &band());
        assert_eq!(urgency, Urgency::DueNow);
    }

    #[test]
    fn test_past_late_is_overdue() {
        let urgency = Urgency::classify(dt("2025-06-15 18:01"), &band());
        assert_eq!(urgency, Urgency::Overdue);
    }

    #[test]
    fn test_zero_width_band() {
        let due_at = dt("2025-06-15 12:00");
        let point = Forecast { due_at, early: due_at, late: due_at };
        assert_eq!(Urgency::classify(due_at, &point), Urgency::DueNow);
        assert_eq!(
            Urgency::classify(due_at + Duration::seconds(1), &point),
            Urgency::Overdue
        );
        assert_eq!(
            Urgency::classify(due_at - Duration::seconds(1), &point),
            Urgency::NotYet
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Urgency::Overdue.to_string(), "overdue");
        assert_eq!(Urgency::DueNow.as_str(), "due");
        assert_eq!(Urgency::NotYet.as_str(), "not yet");
    }
}
