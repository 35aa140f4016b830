//! Server-side HTML for the dashboard page.

use dashboard_core::{DisplayUnit, FetchError, Observation, ProviderKind, StationTable, WeatherResult};
use std::fmt::Write as _;

const NOT_AVAILABLE: &str = "N/A";

pub struct Page<'a> {
    pub stations: &'a StationTable,
    pub selected: &'a str,
    pub units: DisplayUnit,
    pub outcome: Result<&'a WeatherResult, &'a FetchError>,
}

/// Link to the dashboard page for a station and unit. The station id is
/// percent-encoded as a query component, then the whole URL is HTML-escaped.
fn page_href(station: &str, units: DisplayUnit) -> String {
    escape(&format!("/?station={}&units={units}", urlencoding::encode(station)))
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn value(v: Option<f64>, suffix: &str) -> String {
    match v {
        Some(n) => format!("{n:.1}{suffix}"),
        None => NOT_AVAILABLE.to_string(),
    }
}

impl Page<'_> {
    /// Feed stations report Celsius regardless of the requested unit.
    fn temperature_symbol(&self) -> &'static str {
        match self.stations.get(self.selected).map(|s| s.provider) {
            Some(ProviderKind::MeteorologicalFeed) => DisplayUnit::Celsius.symbol(),
            _ => self.units.symbol(),
        }
    }

    fn nav(&self, out: &mut String) {
        out.push_str("<nav class=\"stations\">");
        for station in self.stations.iter() {
            let class = if station.id == self.selected { " class=\"selected\"" } else { "" };
            let _ = write!(
                out,
                "<a{class} href=\"{href}\">{name}</a> ",
                href = page_href(&station.id, self.units),
                name = escape(&station.name),
            );
        }
        out.push_str("</nav>");

        let other = match self.units {
            DisplayUnit::Celsius => DisplayUnit::Fahrenheit,
            DisplayUnit::Fahrenheit => DisplayUnit::Celsius,
        };
        let _ = write!(
            out,
            "<p class=\"units\"><a href=\"{href}\">Show {symbol}</a></p>",
            href = page_href(self.selected, other),
            symbol = other.symbol(),
        );
    }

    fn row(&self, out: &mut String, obs: &Observation) {
        let temp = self.temperature_symbol();
        let _ = write!(
            out,
            "<tr><td>{date} {time}</td><td>{air}</td><td>{apparent}</td><td>{humidity}</td>\
             <td>{wind}</td><td>{gust}</td><td>{pressure}</td><td>{rain}</td></tr>",
            date = escape(&obs.time.date),
            time = escape(&obs.time.time),
            air = value(obs.air_temp, temp),
            apparent = value(obs.apparent_temp, temp),
            humidity = value(obs.humidity, "%"),
            wind = value(obs.wind_speed_kmh, " km/h"),
            gust = value(obs.gust_kmh, " km/h"),
            pressure = value(obs.pressure_value, &format!(" {}", escape(&obs.pressure_unit))),
            rain = value(obs.rain_since_9am, ""),
        );
    }

    fn table(&self, out: &mut String, result: &WeatherResult) {
        let _ = write!(
            out,
            "<h2>{name}</h2><p class=\"updated\">Last updated: {label}</p>",
            name = escape(&result.station_name),
            label = escape(&result.last_updated_label),
        );
        out.push_str(
            "<table><thead><tr><th>Time</th><th>Temp</th><th>Feels like</th><th>Humidity</th>\
             <th>Wind</th><th>Gust</th><th>Pressure</th><th>Rain since 9am</th></tr></thead><tbody>",
        );
        for obs in &result.observations {
            self.row(out, obs);
        }
        out.push_str("</tbody></table>");
    }

    pub fn render(&self) -> String {
        let mut out = String::from(
            "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">\
             <title>Weather Dashboard</title></head><body><h1>Weather Dashboard</h1>",
        );

        self.nav(&mut out);

        match self.outcome {
            Ok(result) => self.table(&mut out, result),
            Err(err) => {
                let _ = write!(out, "<p class=\"error\">{}</p>", escape(&err.to_string()));
            }
        }

        out.push_str("</body></html>");
        out
    }
}
