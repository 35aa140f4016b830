//! Numeric coercion and unit conversion for provider-supplied values.
//!
//! Providers send numbers as JSON numbers, as strings (`"68.2"`), or as
//! placeholders such as `"-"` or `"--"`. Everything here collapses bad input
//! to `None` instead of failing.

use serde_json::Value;

/// Unit the dashboard displays temperatures in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DisplayUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl DisplayUnit {
    /// Parse a `units` request value. Only `"f"` (any case) selects
    /// Fahrenheit; anything else, including garbage, falls back to Celsius.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("f") {
            DisplayUnit::Fahrenheit
        } else {
            DisplayUnit::Celsius
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayUnit::Celsius => "c",
            DisplayUnit::Fahrenheit => "f",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            DisplayUnit::Celsius => "°C",
            DisplayUnit::Fahrenheit => "°F",
        }
    }
}

impl std::fmt::Display for DisplayUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coerce a JSON value to a finite `f64`.
///
/// Accepts JSON numbers and numeric strings (surrounding whitespace is
/// ignored). Returns `None` for null, booleans, arrays, objects,
/// non-numeric strings, and anything that would produce NaN or infinity.
pub fn safe_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };

    n.is_finite().then_some(n)
}

/// Convert a temperature to Celsius.
///
/// The value is treated as Fahrenheit when `unit` contains an `f` in any
/// case (`"F"`, `"ºF"`, `"fahrenheit"`); otherwise, or when the unit is
/// missing, it is assumed to already be Celsius.
pub fn to_celsius(value: &Value, unit: Option<&str>) -> Option<f64> {
    let n = safe_number(value)?;

    let is_fahrenheit = unit.is_some_and(|u| u.to_lowercase().contains('f'));
    if is_fahrenheit { finite((n - 32.0) * 5.0 / 9.0) } else { Some(n) }
}

/// Convert a Celsius reading to the requested display unit, rounded to one
/// decimal place. `target` selects Fahrenheit only when it equals `"f"`
/// case-insensitively. A conversion that overflows is reported as missing.
pub fn to_display_unit(celsius: Option<f64>, target: &str) -> Option<f64> {
    let c = celsius?;

    if target.eq_ignore_ascii_case("f") { round1(c * 9.0 / 5.0 + 32.0) } else { round1(c) }
}

/// Convert a wind speed to km/h from the unit the provider reported it in.
///
/// Recognizes `mph`, `m/s`, and knots; anything else (including `km/h` and a
/// missing unit) passes through unchanged.
pub fn to_kmh(value: &Value, unit: Option<&str>) -> Option<f64> {
    let n = safe_number(value)?;

    let factor = match unit.map(|u| u.trim().to_lowercase()).as_deref() {
        Some("mph") => 1.609_344,
        Some("m/s") | Some("mps") => 3.6,
        Some("knots") | Some("kn") | Some("kt") | Some("kts") => 1.852,
        _ => 1.0,
    };

    round1(n * factor)
}

/// Round to one decimal place, or `None` if the value is (or becomes) NaN
/// or infinite.
pub(crate) fn round1(n: f64) -> Option<f64> {
    finite((n * 10.0).round() / 10.0)
}

fn finite(n: f64) -> Option<f64> {
    n.is_finite().then_some(n)
}
