//! Bureau of Meteorology observation feed (`IDx60901` product JSON).
//!
//! The feed lists half-hourly observations newest first under
//! `observations.data`, already in metric display units.

use serde_json::Value;

use crate::{
    error::FetchError,
    model::{Observation, TimeValue, WeatherResult},
    station::Station,
    timestamp,
    units::{DisplayUnit, safe_number},
};

use super::{ProviderAdapter, is_blank, lookup};

/// How many of the most recent observations to keep.
pub const MAX_OBSERVATIONS: usize = 5;

const PRESSURE_UNIT: &str = "hPa";

// Header label lookup order. The primary name is absent from most feeds.
const HEADER_LABEL_FIELDS: [&str; 2] = ["last_updated", "refresh_message"];

#[derive(Debug, Clone, Copy, Default)]
pub struct BomAdapter;

fn observation(entry: &Value) -> Observation {
    let pressure = match lookup(entry, "/press") {
        p if safe_number(p).is_some() => p,
        _ => lookup(entry, "/press_msl"),
    };

    Observation {
        time: timestamp::normalize(lookup(entry, "/local_date_time_full")),
        air_temp: safe_number(lookup(entry, "/air_temp")),
        apparent_temp: safe_number(lookup(entry, "/apparent_t")),
        humidity: safe_number(lookup(entry, "/rel_hum")),
        wind_speed_kmh: safe_number(lookup(entry, "/wind_spd_kmh")),
        gust_kmh: safe_number(lookup(entry, "/gust_kmh")),
        pressure_value: safe_number(pressure),
        pressure_unit: PRESSURE_UNIT.to_string(),
        rain_since_9am: safe_number(lookup(entry, "/rain_trace")),
    }
}

/// The header may be missing, a single object, or a list of objects.
fn header_label(header: &Value) -> String {
    let header = match header {
        Value::Array(items) => items.first(),
        Value::Object(_) => Some(header),
        _ => None,
    };

    header
        .and_then(|h| {
            HEADER_LABEL_FIELDS
                .iter()
                .map(|field| lookup(h, &format!("/{field}")))
                .find(|v| !is_blank(v))
        })
        .map(|v| match v {
            Value::String(s) => s.trim().to_string(),
            other => other.to_string(),
        })
        .unwrap_or_else(|| TimeValue::NOT_AVAILABLE.to_string())
}

impl ProviderAdapter for BomAdapter {
    /// Feed values are passed through in the feed's own units; `units` does
    /// not apply here.
    fn adapt(
        &self,
        station: &Station,
        payload: &Value,
        _units: DisplayUnit,
    ) -> Result<WeatherResult, FetchError> {
        let entries = lookup(payload, "/observations/data")
            .as_array()
            .filter(|list| !list.is_empty())
            .ok_or(FetchError::NoObservationData)?;

        let station_name = lookup(&entries[0], "/name")
            .as_str()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(station.name.as_str())
            .to_string();

        Ok(WeatherResult {
            station_name,
            last_updated_label: header_label(lookup(payload, "/observations/header")),
            observations: entries.iter().take(MAX_OBSERVATIONS).map(observation).collect(),
        })
    }
}
