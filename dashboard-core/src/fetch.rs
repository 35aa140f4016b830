use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::{sync::Arc, time::Duration};

use crate::{
    config::Config,
    error::{FetchError, TransportKind},
    model::WeatherResult,
    provider::adapter_for,
    station::{Station, StationTable},
    units::DisplayUnit,
};

const USER_AGENT: &str = concat!("weather-dashboard/", env!("CARGO_PKG_VERSION"));

/// Something that can produce a [`WeatherResult`] for a station id.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    fn stations(&self) -> &StationTable;

    async fn fetch(
        &self,
        station_id: &str,
        units: DisplayUnit,
    ) -> Result<WeatherResult, FetchError>;
}

/// Fetches a station's endpoint over HTTP and runs the matching adapter.
///
/// One GET per call, no retries and no caching.
#[derive(Debug, Clone)]
pub struct Fetcher {
    stations: Arc<StationTable>,
    http: Client,
}

impl Fetcher {
    pub fn new(
        stations: StationTable,
        timeout: Duration,
        accept_invalid_certs: bool,
    ) -> anyhow::Result<Self> {
        if accept_invalid_certs {
            tracing::warn!("TLS certificate verification is disabled for provider requests");
        }

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()?;

        Ok(Self { stations: Arc::new(stations), http })
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Self::new(config.station_table()?, config.timeout(), config.accept_invalid_certs)
    }

    async fn fetch_payload(&self, station: &Station) -> Result<Value, FetchError> {
        let res = self
            .http
            .get(&station.endpoint)
            .send()
            .await
            .map_err(FetchError::from_transport)?;

        let status = res.status();
        let body = res.text().await.map_err(FetchError::from_transport)?;

        if !status.is_success() {
            return Err(FetchError::Transport {
                kind: TransportKind::Status(status.as_u16()),
                message: format!(
                    "provider responded with status {}: {}",
                    status,
                    truncate_body(&body),
                ),
            });
        }

        serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))
    }

    async fn fetch_station(
        &self,
        station_id: &str,
        units: DisplayUnit,
    ) -> Result<WeatherResult, FetchError> {
        let station = self
            .stations
            .get(station_id)
            .ok_or_else(|| FetchError::StationNotFound(station_id.to_string()))?;

        tracing::debug!(station = %station.id, provider = %station.provider, "fetching observations");

        let payload = self.fetch_payload(station).await?;
        adapter_for(station.provider).adapt(station, &payload, units)
    }
}

#[async_trait]
impl WeatherSource for Fetcher {
    fn stations(&self) -> &StationTable {
        &self.stations
    }

    async fn fetch(
        &self,
        station_id: &str,
        units: DisplayUnit,
    ) -> Result<WeatherResult, FetchError> {
        let result = self.fetch_station(station_id, units).await;

        if let Err(err) = &result {
            tracing::warn!(station = station_id, error = %err, "fetch failed");
        }

        result
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
