//! Free-text input parsing.
//!
//! Turns the date/time and period expressions users type into structured
//! values. All functions take an explicit `now` (and the relevant config
//! knobs) so parsing stays deterministic and testable; naive inputs are read
//! as UTC wall-clock times.

use crate::config::TimeConfig;
use crate::domain::CompletionRecord;
use crate::error::{Result, TrakrError};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};

/// Compact stamp emitted by `format::format_datetime`, e.g. `250614T0930`.
pub const STAMP_FORMAT: &str = "%y%m%dT%H%M";

/// Parse a date/time expression.
///
/// Accepted forms, tried in order: the literal `now`, compact stamps
/// (`250614T0930`), ISO-ish date-times (`2025-06-14 09:30[:00]`,
/// `2025-06-14T09:30`), slash date-times, date-only forms (midnight), and
/// time-only forms (today at that time). Slash dates follow the `yearfirst`
/// and `dayfirst` settings; 12-hour forms like `9:30am` need `ampm`.
pub fn parse_datetime(text: &str, time: &TimeConfig, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let text = text.trim();
    if text.eq_ignore_ascii_case("now") {
        return Ok(now);
    }

    for format in datetime_formats(time) {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(parsed.and_utc());
        }
    }
    for format in date_formats(time) {
        if let Ok(parsed) = NaiveDate::parse_from_str(text, format) {
            return Ok(parsed.and_time(NaiveTime::MIN).and_utc());
        }
    }
    for format in time_formats(time) {
        if let Ok(parsed) = NaiveTime::parse_from_str(text, format) {
            return Ok(now.date_naive().and_time(parsed).and_utc());
        }
    }

    Err(TrakrError::DateParse(text.to_string()))
}

fn datetime_formats(time: &TimeConfig) -> Vec<&'static str> {
    let mut formats = vec![
        STAMP_FORMAT,
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
    ];
    if time.yearfirst {
        formats.push("%Y/%m/%d %H:%M");
    }
    if time.dayfirst {
        formats.push("%d/%m/%Y %H:%M");
    } else {
        formats.push("%m/%d/%Y %H:%M");
    }
    if time.ampm {
        formats.push("%Y-%m-%d %I:%M%p");
        formats.push("%Y-%m-%d %I%p");
    }
    formats
}

fn date_formats(time: &TimeConfig) -> Vec<&'static str> {
    let mut formats = vec!["%Y-%m-%d"];
    if time.yearfirst {
        formats.push("%Y/%m/%d");
    }
    if time.dayfirst {
        formats.push("%d/%m/%Y");
    } else {
        formats.push("%m/%d/%Y");
    }
    formats
}

fn time_formats(time: &TimeConfig) -> Vec<&'static str> {
    let mut formats = vec!["%H:%M:%S", "%H:%M"];
    if time.ampm {
        formats.push("%I:%M%p");
        formats.push("%I%p");
    }
    formats
}

/// Parse a signed compact period like `2d3h`, `-45m`, or `+1w 2d`.
///
/// Components are `<integer><unit>` with units `w`, `d`, `h`, `m`, `s`;
/// whitespace between components is allowed. An optional leading `+`/`-`
/// signs the whole period. Totals past the representable millisecond range
/// are rejected.
pub fn parse_period(text: &str) -> Result<Duration> {
    let trimmed = text.trim();
    let (negative, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let mut total_ms: i64 = 0;
    let mut digits = String::new();
    let mut components = 0;
    for ch in body.chars() {
        if ch.is_ascii_digit() {
            digits.push(ch);
        } else if ch.is_whitespace() {
            // Whitespace may separate components, never split one
            if !digits.is_empty() {
                return Err(TrakrError::PeriodParse(text.to_string()));
            }
        } else {
            let unit_ms: i64 = match ch.to_ascii_lowercase() {
                'w' => 7 * 24 * 60 * 60 * 1000,
                'd' => 24 * 60 * 60 * 1000,
                'h' => 60 * 60 * 1000,
                'm' => 60 * 1000,
                's' => 1000,
                _ => return Err(TrakrError::PeriodParse(text.to_string())),
            };
            let value: i64 = digits.parse().map_err(|_| TrakrError::PeriodParse(text.to_string()))?;
            digits.clear();
            total_ms = value
                .checked_mul(unit_ms)
                .and_then(|ms| total_ms.checked_add(ms))
                .ok_or_else(|| TrakrError::PeriodParse(text.to_string()))?;
            components += 1;
        }
    }
    if !digits.is_empty() || components == 0 {
        return Err(TrakrError::PeriodParse(text.to_string()));
    }

    Ok(Duration::milliseconds(if negative { -total_ms } else { total_ms }))
}

/// Parse a completion expression: `<datetime>[, <period>]`.
///
/// The optional period after the comma becomes the record's adjustment and
/// defaults to zero.
pub fn parse_completion(text: &str, time: &TimeConfig, now: DateTime<Utc>) -> Result<CompletionRecord> {
    match text.split_once(',') {
        Some((stamp, adjustment)) => {
            let completed_at = parse_datetime(stamp, time, now)?;
            let adjustment = parse_period(adjustment)?;
            Ok(CompletionRecord::new(completed_at, adjustment))
        }
        None => Ok(CompletionRecord::at(parse_datetime(text, time, now)?)),
    }
}
