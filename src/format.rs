//! Display formatting.
//!
//! Compact renderings for timestamps and durations. `format_datetime`
//! round-trips through `parse::parse_datetime`, so anything the UI shows can
//! be pasted back in.

use chrono::{DateTime, Duration, Utc};

use crate::parse::STAMP_FORMAT;

/// Render a timestamp as a compact stamp, e.g. `250614T0930`.
pub fn format_datetime(dt: DateTime<Utc>) -> String {
    dt.format(STAMP_FORMAT).to_string()
}

/// Render a duration magnitude compactly: `8d2h20m`, `45s`, `0m` for zero.
///
/// Zero components are skipped; negative durations carry a leading `-`.
/// Resolution is one second, so sub-second durations render as `0m`.
pub fn format_duration(td: Duration) -> String {
    let total_seconds = td.num_seconds();
    if total_seconds == 0 {
        return "0m".to_string();
    }

    let magnitude = total_seconds.abs();
    let days = magnitude / 86_400;
    let hours = magnitude % 86_400 / 3_600;
    let minutes = magnitude % 3_600 / 60;
    let seconds = magnitude % 60;

    let mut out = String::new();
    if total_seconds < 0 {
        out.push('-');
    }
    if days > 0 {
        out.push_str(&format!("{days}d"));
    }
    if hours > 0 {
        out.push_str(&format!("{hours}h"));
    }
    if minutes > 0 {
        out.push_str(&format!("{minutes}m"));
    }
    if seconds > 0 {
        out.push_str(&format!("{seconds}s"));
    }
    out
}

/// Like `format_duration` but with an explicit `+` on positive values.
///
/// Used for adjustments, where the sign is the point.
pub fn format_duration_signed(td: Duration) -> String {
    if td > Duration::zero() {
        format!("+{}", format_duration(td))
    } else {
        format_duration(td)
    }
}

/// Render `target` relative to `now` at minute resolution: `in 2d3h`,
/// `2d3h ago`, or `now` inside the same minute.
pub fn format_relative(target: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (target - now).num_minutes();
    if minutes == 0 {
        "now".to_string()
    } else if minutes > 0 {
        format!("in {}", format_duration(Duration::minutes(minutes)))
    } else {
        format!("{} ago", format_duration(Duration::minutes(-minutes)))
    }
}
