use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A provider time value, normalized to display strings.
///
/// `malformed` is set only when the input matched none of the recognized
/// formats; `date` and `time` are then both `"N/A"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeValue {
    pub date: String,
    pub time: String,
    pub original: Value,
    #[serde(default, skip_serializing_if = "is_false")]
    pub malformed: bool,
}

impl TimeValue {
    pub const NOT_AVAILABLE: &'static str = "N/A";

    pub fn not_available(original: Value) -> Self {
        Self {
            date: Self::NOT_AVAILABLE.to_string(),
            time: Self::NOT_AVAILABLE.to_string(),
            original,
            malformed: false,
        }
    }

    pub fn malformed(original: Value) -> Self {
        Self { malformed: true, ..Self::not_available(original) }
    }

    /// `"<date> <time>"`, or `"N/A"` when no date is known.
    pub fn label(&self) -> String {
        if self.date == Self::NOT_AVAILABLE {
            Self::NOT_AVAILABLE.to_string()
        } else {
            format!("{} {}", self.date, self.time)
        }
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// Canonical observation produced by a provider adapter. Every numeric field
/// is either a finite number or `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub time: TimeValue,
    pub air_temp: Option<f64>,
    pub apparent_temp: Option<f64>,
    pub humidity: Option<f64>,
    pub wind_speed_kmh: Option<f64>,
    pub gust_kmh: Option<f64>,
    pub pressure_value: Option<f64>,
    pub pressure_unit: String,
    pub rain_since_9am: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherResult {
    pub station_name: String,
    pub last_updated_label: String,
    pub observations: Vec<Observation>,
}
