//! HTTP front-end: the dashboard page and its JSON API.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use dashboard_core::{DisplayUnit, FetchError, Observation, Station, WeatherResult, WeatherSource};
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, sync::Arc};

use crate::render::Page;

/// Shared state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn WeatherSource>,
    pub default_station: String,
}

/// Query params for `/` and `/api/weather`
#[derive(Debug, Deserialize)]
pub struct WeatherQuery {
    pub station: Option<String>,
    pub units: Option<String>,
}

/// JSON body of a successful `/api/weather`
#[derive(Debug, Serialize)]
pub struct WeatherResponse {
    pub station_name: String,
    pub last_updated_product: String,
    pub observations: Vec<Observation>,
    pub units: &'static str,
}

impl WeatherResponse {
    pub fn new(result: WeatherResult, units: DisplayUnit) -> Self {
        Self {
            station_name: result.station_name,
            last_updated_product: result.last_updated_label,
            observations: result.observations,
            units: units.as_str(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub struct ApiError(FetchError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        (status, Json(ErrorResponse { error: self.0.to_string() })).into_response()
    }
}

fn status_for(err: &FetchError) -> StatusCode {
    if err.is_not_found() { StatusCode::NOT_FOUND } else { StatusCode::INTERNAL_SERVER_ERROR }
}

impl AppState {
    fn resolve(&self, query: &WeatherQuery) -> (String, DisplayUnit) {
        let station = query
            .station
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(self.default_station.as_str())
            .to_string();
        let units = query.units.as_deref().map(DisplayUnit::parse).unwrap_or_default();
        (station, units)
    }

    async fn load(&self, station: &str, units: DisplayUnit) -> Result<WeatherResult, FetchError> {
        let result = self.source.fetch(station, units).await?;
        if result.observations.is_empty() {
            return Err(FetchError::NoObservationData);
        }
        Ok(result)
    }
}

/// GET / - Dashboard page
async fn index(State(state): State<AppState>, Query(query): Query<WeatherQuery>) -> Response {
    let (station, units) = state.resolve(&query);
    let outcome = state.load(&station, units).await;

    let status = match &outcome {
        Ok(_) => StatusCode::OK,
        Err(err) => status_for(err),
    };

    let html = Page {
        stations: state.source.stations(),
        selected: &station,
        units,
        outcome: outcome.as_ref(),
    }
    .render();

    (status, Html(html)).into_response()
}

/// GET /api/weather - Observations for one station
async fn api_weather(
    State(state): State<AppState>,
    Query(query): Query<WeatherQuery>,
) -> Result<Json<WeatherResponse>, ApiError> {
    let (station, units) = state.resolve(&query);
    let result = state.load(&station, units).await.map_err(ApiError)?;
    Ok(Json(WeatherResponse::new(result, units)))
}

/// GET /api/stations - Configured stations
async fn list_stations(State(state): State<AppState>) -> Json<Vec<Station>> {
    Json(state.source.stations().iter().cloned().collect())
}

/// GET /health - Health check endpoint
async fn health_check() -> &'static str {
    "ok"
}

/// Create the HTTP router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/weather", get(api_weather))
        .route("/api/stations", get(list_stations))
        .route("/health", get(health_check))
        .with_state(state)
}

/// Run the HTTP server
pub async fn run_server(state: AppState, bind: SocketAddr) -> anyhow::Result<()> {
    let station_count = state.source.stations().len();
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!(address = %listener.local_addr()?, stations = station_count, "dashboard listening");

    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use dashboard_core::{ProviderKind, StationTable, TimeValue, TransportKind};
    use serde_json::{Value, json};

    struct StubSource {
        stations: StationTable,
    }

    fn station(id: &str, provider: ProviderKind) -> Station {
        Station {
            id: id.into(),
            name: format!("Station {id}"),
            provider,
            endpoint: "https://example.invalid".into(),
        }
    }

    #[async_trait]
    impl WeatherSource for StubSource {
        fn stations(&self) -> &StationTable {
            &self.stations
        }

        async fn fetch(
            &self,
            station_id: &str,
            units: DisplayUnit,
        ) -> Result<WeatherResult, FetchError> {
            let temp = match units {
                DisplayUnit::Celsius => 20.0,
                DisplayUnit::Fahrenheit => 68.0,
            };

            match station_id {
                "station1" => Ok(WeatherResult {
                    station_name: "Station station1".into(),
                    last_updated_label: "15/01/2024 10:30:45".into(),
                    observations: vec![Observation {
                        time: TimeValue::malformed(json!("garbage")),
                        air_temp: Some(temp),
                        apparent_temp: None,
                        humidity: Some(40.0),
                        wind_speed_kmh: None,
                        gust_kmh: None,
                        pressure_value: None,
                        pressure_unit: "hPa".into(),
                        rain_since_9am: None,
                    }],
                }),
                "empty" => Ok(WeatherResult {
                    station_name: "Empty".into(),
                    last_updated_label: "N/A".into(),
                    observations: vec![],
                }),
                "broken" => Err(FetchError::Transport {
                    kind: TransportKind::Connect,
                    message: "connection refused".into(),
                }),
                other => Err(FetchError::StationNotFound(other.to_string())),
            }
        }
    }

    async fn spawn() -> String {
        let stations = StationTable::new(vec![
            station("station1", ProviderKind::DeviceTelemetry),
            station("empty", ProviderKind::MeteorologicalFeed),
            station("broken", ProviderKind::DeviceTelemetry),
        ])
        .expect("valid table");

        let state = AppState {
            source: Arc::new(StubSource { stations }),
            default_station: "station1".into(),
        };

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, create_router(state)).await.expect("server runs");
        });

        format!("http://{addr}")
    }

    async fn get_json(url: &str) -> (u16, Value) {
        let res = reqwest::get(url).await.expect("request succeeds");
        let status = res.status().as_u16();
        (status, res.json().await.expect("json body"))
    }

    #[tokio::test]
    async fn api_weather_defaults_to_station1_in_celsius() {
        let base = spawn().await;
        let (status, body) = get_json(&format!("{base}/api/weather")).await;

        assert_eq!(status, 200);
        assert_eq!(body["station_name"], "Station station1");
        assert_eq!(body["last_updated_product"], "15/01/2024 10:30:45");
        assert_eq!(body["units"], "c");
        assert_eq!(body["observations"][0]["air_temp"], 20.0);
        assert_eq!(body["observations"][0]["apparent_temp"], Value::Null);
        assert_eq!(body["observations"][0]["time"]["malformed"], true);
    }

    #[tokio::test]
    async fn api_weather_honours_units() {
        let base = spawn().await;
        let (status, body) = get_json(&format!("{base}/api/weather?station=station1&units=F")).await;

        assert_eq!(status, 200);
        assert_eq!(body["units"], "f");
        assert_eq!(body["observations"][0]["air_temp"], 68.0);
    }

    #[tokio::test]
    async fn unknown_station_is_404() {
        let base = spawn().await;
        let (status, body) = get_json(&format!("{base}/api/weather?station=mars")).await;

        assert_eq!(status, 404);
        assert_eq!(body["error"], "Station 'mars' not found");
    }

    #[tokio::test]
    async fn empty_result_is_404() {
        let base = spawn().await;
        let (status, body) = get_json(&format!("{base}/api/weather?station=empty")).await;

        assert_eq!(status, 404);
        assert_eq!(body["error"], "No observation data available");
    }

    #[tokio::test]
    async fn fetch_failure_is_500() {
        let base = spawn().await;
        let (status, body) = get_json(&format!("{base}/api/weather?station=broken")).await;

        assert_eq!(status, 500);
        assert_eq!(body["error"], "Error fetching data: connection refused");
    }

    #[tokio::test]
    async fn stations_are_listed_without_endpoints() {
        let base = spawn().await;
        let (status, body) = get_json(&format!("{base}/api/stations")).await;

        assert_eq!(status, 200);
        let stations = body.as_array().expect("array");
        assert_eq!(stations.len(), 3);
        assert_eq!(stations[0]["id"], "station1");
        assert_eq!(stations[0]["provider"], "ecowitt");
        assert_eq!(stations[1]["provider"], "bom");
        assert!(stations[0].get("endpoint").is_none());
    }

    #[tokio::test]
    async fn index_renders_page_and_error_status() {
        let base = spawn().await;

        let ok = reqwest::get(format!("{base}/?units=f")).await.expect("request succeeds");
        assert_eq!(ok.status().as_u16(), 200);
        let html = ok.text().await.expect("body");
        assert!(html.contains("<td>68.0°F</td>"));

        let missing = reqwest::get(format!("{base}/?station=mars")).await.expect("request succeeds");
        assert_eq!(missing.status().as_u16(), 404);
        assert!(missing.text().await.expect("body").contains("not found"));
    }

    #[tokio::test]
    async fn health() {
        let base = spawn().await;
        let body = reqwest::get(format!("{base}/health"))
            .await
            .expect("request succeeds")
            .text()
            .await
            .expect("body");
        assert_eq!(body, "ok");
    }
}
