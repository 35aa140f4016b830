//! Ecowitt device real-time API.
//!
//! Readings arrive as `{ "time": ..., "unit": ..., "value": ... }` objects
//! grouped by sensor, with values usually sent as strings in the device's
//! configured units.

use serde_json::Value;

use crate::{
    error::FetchError,
    model::{Observation, WeatherResult},
    station::Station,
    timestamp,
    units::{DisplayUnit, safe_number, to_celsius, to_display_unit, to_kmh},
};

use super::{NULL, ProviderAdapter, is_blank, lookup};

const DEFAULT_PRESSURE_UNIT: &str = "hPa";

#[derive(Debug, Clone, Copy, Default)]
pub struct EcowittAdapter;

/// A reading's value and its own unit. Bare values carry no unit.
fn reading<'a>(data: &'a Value, pointer: &str) -> (&'a Value, Option<&'a str>) {
    let node = lookup(data, pointer);
    if node.is_object() {
        (lookup(node, "/value"), lookup(node, "/unit").as_str())
    } else {
        (node, None)
    }
}

/// Like `reading`, trying each pointer until one is present.
fn first_reading<'a>(data: &'a Value, pointers: &[&str]) -> (&'a Value, Option<&'a str>) {
    pointers
        .iter()
        .map(|p| reading(data, p))
        .find(|(value, _)| !value.is_null())
        .unwrap_or((&NULL, None))
}

fn temperature(data: &Value, pointers: &[&str], units: DisplayUnit) -> Option<f64> {
    let (value, unit) = first_reading(data, pointers);
    to_display_unit(to_celsius(value, unit), units.as_str())
}

impl ProviderAdapter for EcowittAdapter {
    fn adapt(
        &self,
        station: &Station,
        payload: &Value,
        units: DisplayUnit,
    ) -> Result<WeatherResult, FetchError> {
        let data = lookup(payload, "/data");
        if is_blank(data) || !data.is_object() {
            return Err(FetchError::EmptyPayload);
        }

        let raw_time = match lookup(payload, "/time") {
            t if !is_blank(t) => t,
            _ => lookup(data, "/outdoor/temperature/time"),
        };
        let time = timestamp::normalize(raw_time);

        let (wind, wind_unit) = reading(data, "/wind/wind_speed");
        let (gust, gust_unit) = reading(data, "/wind/wind_gust");
        let (pressure, pressure_unit) = reading(data, "/pressure/absolute");

        let observation = Observation {
            air_temp: temperature(data, &["/outdoor/temperature"], units),
            apparent_temp: temperature(
                data,
                &["/feels_like/temperature", "/outdoor/feels_like"],
                units,
            ),
            humidity: safe_number(reading(data, "/outdoor/humidity").0),
            wind_speed_kmh: to_kmh(wind, wind_unit),
            gust_kmh: to_kmh(gust, gust_unit),
            pressure_value: safe_number(pressure),
            pressure_unit: pressure_unit.unwrap_or(DEFAULT_PRESSURE_UNIT).to_string(),
            rain_since_9am: safe_number(reading(data, "/rainfall/daily").0),
            time,
        };

        Ok(WeatherResult {
            station_name: station.name.clone(),
            last_updated_label: observation.time.label(),
            observations: vec![observation],
        })
    }
}
