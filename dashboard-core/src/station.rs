use serde::Serialize;
use std::{collections::HashMap, convert::TryFrom};

/// Which payload shape a station's endpoint returns. Serializes to the same
/// name the config file uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ProviderKind {
    /// Ecowitt device real-time API.
    #[serde(rename = "ecowitt")]
    DeviceTelemetry,
    /// Bureau of Meteorology observation feed.
    #[serde(rename = "bom")]
    MeteorologicalFeed,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::DeviceTelemetry => "ecowitt",
            ProviderKind::MeteorologicalFeed => "bom",
        }
    }

    pub const fn all() -> &'static [ProviderKind] {
        &[ProviderKind::DeviceTelemetry, ProviderKind::MeteorologicalFeed]
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderKind {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.trim().to_lowercase();

        match lower.as_str() {
            "ecowitt" | "device-telemetry" => Ok(ProviderKind::DeviceTelemetry),
            "bom" | "meteorological-feed" => Ok(ProviderKind::MeteorologicalFeed),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: ecowitt, bom."
            )),
        }
    }
}

/// A configured weather station. Immutable once the table is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Station {
    pub id: String,
    pub name: String,
    pub provider: ProviderKind,
    /// Full request URL, credentials included. Never log this.
    #[serde(skip)]
    pub endpoint: String,
}

/// Read-only lookup of stations by identifier, in configuration order.
#[derive(Debug, Clone, Default)]
pub struct StationTable {
    stations: Vec<Station>,
    index: HashMap<String, usize>,
}

impl StationTable {
    pub fn new(stations: Vec<Station>) -> anyhow::Result<Self> {
        let mut index = HashMap::with_capacity(stations.len());

        for (i, station) in stations.iter().enumerate() {
            if index.insert(station.id.clone(), i).is_some() {
                return Err(anyhow::anyhow!(
                    "Duplicate station id '{}' in configuration",
                    station.id
                ));
            }
        }

        Ok(Self { stations, index })
    }

    pub fn get(&self, id: &str) -> Option<&Station> {
        self.index.get(id).map(|&i| &self.stations[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Station> {
        self.stations.iter()
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station(id: &str, provider: ProviderKind) -> Station {
        Station {
            id: id.to_string(),
            name: format!("Station {id}"),
            provider,
            endpoint: format!("https://example.invalid/{id}"),
        }
    }

    #[test]
    fn provider_kind_as_str_roundtrip() {
        for kind in ProviderKind::all() {
            let parsed = ProviderKind::try_from(kind.as_str()).expect("roundtrip should succeed");
            assert_eq!(*kind, parsed);
        }
    }

    #[test]
    fn provider_kind_serializes_to_its_config_name() {
        for kind in ProviderKind::all() {
            let json = serde_json::to_value(kind).expect("serializes");
            assert_eq!(json, kind.as_str());

            let name = json.as_str().expect("string");
            assert_eq!(ProviderKind::try_from(name).expect("config accepts it"), *kind);
        }
    }

    #[test]
    fn provider_kind_accepts_long_aliases_in_any_case() {
        assert_eq!(
            ProviderKind::try_from("Device-Telemetry").expect("alias"),
            ProviderKind::DeviceTelemetry
        );
        assert_eq!(
            ProviderKind::try_from("METEOROLOGICAL-FEED").expect("alias"),
            ProviderKind::MeteorologicalFeed
        );
    }

    #[test]
    fn unknown_provider_error() {
        let err = ProviderKind::try_from("openweather").unwrap_err();
        assert!(err.to_string().contains("Unknown provider"));
    }

    #[test]
    fn lookup_by_id_preserves_order() {
        let table = StationTable::new(vec![
            station("b", ProviderKind::MeteorologicalFeed),
            station("a", ProviderKind::DeviceTelemetry),
        ])
        .expect("valid table");

        assert_eq!(table.len(), 2);
        assert_eq!(table.get("a").map(|s| s.provider), Some(ProviderKind::DeviceTelemetry));
        assert!(table.get("missing").is_none());

        let ids: Vec<&str> = table.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = StationTable::new(vec![
            station("a", ProviderKind::DeviceTelemetry),
            station("a", ProviderKind::MeteorologicalFeed),
        ])
        .unwrap_err();

        assert!(err.to_string().contains("Duplicate station id 'a'"));
    }
}
