//! Normalization of the time representations providers send.
//!
//! Three shapes are recognized: Unix epoch seconds (as a number or numeric
//! string), compact `YYYYMMDDHHMMSS` strings, and `DD/MM/YYYY HH:MM:SS`
//! strings. Anything else resolves to the malformed sentinel.

use chrono::{DateTime, Local};
use serde_json::Value;

use crate::{model::TimeValue, units::safe_number};

/// Normalize a provider time value. Never fails.
pub fn normalize(input: &Value) -> TimeValue {
    if is_blank(input) {
        return TimeValue::not_available(input.clone());
    }

    if let Some(local) = safe_number(input).and_then(epoch_to_local) {
        return TimeValue {
            date: local.format("%d/%m/%Y").to_string(),
            time: local.format("%H:%M:%S").to_string(),
            original: input.clone(),
            malformed: false,
        };
    }

    let parsed = input
        .as_str()
        .map(str::trim)
        .and_then(|s| parse_compact(s).or_else(|| parse_delimited(s)));

    match parsed {
        Some((date, time)) => TimeValue { date, time, original: input.clone(), malformed: false },
        None => TimeValue::malformed(input.clone()),
    }
}

fn is_blank(input: &Value) -> bool {
    match input {
        Value::Null => true,
        Value::String(s) => {
            let s = s.trim();
            s.is_empty() || s == "N/A"
        }
        _ => false,
    }
}

/// Epoch seconds to local time. Out-of-range values (such as a compact
/// timestamp read as a number) yield `None` so the textual formats get a
/// chance.
fn epoch_to_local(seconds: f64) -> Option<DateTime<Local>> {
    let secs = seconds.trunc();
    if secs < i64::MIN as f64 || secs > i64::MAX as f64 {
        return None;
    }

    DateTime::from_timestamp(secs as i64, 0).map(|utc| utc.with_timezone(&Local))
}

/// `YYYYMMDDHHMMSS`, sliced positionally without calendar validation.
fn parse_compact(s: &str) -> Option<(String, String)> {
    if s.len() != 14 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let (year, month, day) = (&s[0..4], &s[4..6], &s[6..8]);
    let (hour, minute, second) = (&s[8..10], &s[10..12], &s[12..14]);

    Some((format!("{day}/{month}/{year}"), format!("{hour}:{minute}:{second}")))
}

/// `DD/MM/YYYY HH:MM:SS`, returned verbatim once each part has three
/// all-digit components.
fn parse_delimited(s: &str) -> Option<(String, String)> {
    if !(s.contains('/') && s.contains(' ') && s.contains(':')) {
        return None;
    }

    let (date, time) = s.split_once(' ')?;
    if !all_digit_parts(date, '/') || !all_digit_parts(time, ':') {
        return None;
    }

    Some((date.to_string(), time.to_string()))
}

fn all_digit_parts(s: &str, sep: char) -> bool {
    let parts: Vec<&str> = s.split(sep).collect();
    parts.len() == 3 && parts.iter().all(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()))
}
