use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::station::{ProviderKind, Station, StationTable};

pub const DEFAULT_STATION: &str = "station1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

const ECOWITT_REAL_TIME: &str = "https://api.ecowitt.net/api/v3/device/real_time";

/// One station entry as written in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationConfig {
    pub id: String,
    pub name: String,
    /// "ecowitt" or "bom".
    pub provider: String,
    pub endpoint: String,
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// default_station = "station1"
/// accept_invalid_certs = true
///
/// [[stations]]
/// id = "station1"
/// name = "Backyard"
/// provider = "ecowitt"
/// endpoint = "https://api.ecowitt.net/api/v3/device/real_time?..."
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_station")]
    pub default_station: String,

    /// Skip TLS certificate verification. Some device endpoints present
    /// self-signed certificates.
    #[serde(default = "default_accept_invalid_certs")]
    pub accept_invalid_certs: bool,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Empty means "use the built-in stations".
    #[serde(default)]
    pub stations: Vec<StationConfig>,
}

fn default_station() -> String {
    DEFAULT_STATION.to_string()
}

fn default_accept_invalid_certs() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_station: default_station(),
            accept_invalid_certs: default_accept_invalid_certs(),
            timeout_secs: default_timeout_secs(),
            stations: builtin_stations(),
        }
    }
}

/// Stations used when no config file lists any. The Ecowitt keys are
/// placeholders; requests against them come back with an empty payload.
pub fn builtin_stations() -> Vec<StationConfig> {
    let ecowitt = |mac: &str| {
        format!(
            "{ECOWITT_REAL_TIME}?application_key=YOUR_APPLICATION_KEY&api_key=YOUR_API_KEY&mac={mac}&call_back=all"
        )
    };

    vec![
        StationConfig {
            id: "station1".into(),
            name: "Ecowitt D8:BC:38:AA:EF:E1".into(),
            provider: ProviderKind::DeviceTelemetry.as_str().into(),
            endpoint: ecowitt("D8:BC:38:AA:EF:E1"),
        },
        StationConfig {
            id: "station2".into(),
            name: "Ecowitt D8:BC:38:AA:96:AF".into(),
            provider: ProviderKind::DeviceTelemetry.as_str().into(),
            endpoint: ecowitt("D8:BC:38:AA:96:AF"),
        },
        StationConfig {
            id: "station3".into(),
            name: "Melbourne (Olympic Park)".into(),
            provider: ProviderKind::MeteorologicalFeed.as_str().into(),
            endpoint: "https://reg.bom.gov.au/fwo/IDV60901/IDV60901.95936.json".into(),
        },
    ]
}

impl Config {
    /// Load config from the platform config directory, or return the
    /// built-in defaults if the file doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load config from an explicit path. The file must exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-dashboard", "weather-dashboard")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Resolve the configured stations into a lookup table, checking
    /// provider names and id uniqueness once up front.
    pub fn station_table(&self) -> Result<StationTable> {
        let entries = if self.stations.is_empty() { builtin_stations() } else { self.stations.clone() };

        let stations = entries
            .into_iter()
            .map(|entry| {
                let provider = ProviderKind::try_from(entry.provider.as_str())
                    .with_context(|| format!("Invalid provider for station '{}'", entry.id))?;

                Ok(Station { id: entry.id, name: entry.name, provider, endpoint: entry.endpoint })
            })
            .collect::<Result<Vec<_>>>()?;

        StationTable::new(stations)
    }
}
