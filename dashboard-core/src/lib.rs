//! Core library for the weather dashboard.
//!
//! This crate defines:
//! - Station configuration and lookup
//! - Unit conversion and timestamp normalization
//! - Adapters from provider JSON to canonical observations
//! - The fetcher that ties a station to its provider
//!
//! It is used by `dashboard-web`, but has no dependency on any web framework.

pub mod config;
pub mod error;
pub mod fetch;
pub mod model;
pub mod provider;
pub mod station;
pub mod timestamp;
pub mod units;

pub use config::{Config, StationConfig};
pub use error::{FetchError, TransportKind};
pub use fetch::{Fetcher, WeatherSource};
pub use model::{Observation, TimeValue, WeatherResult};
pub use provider::{ProviderAdapter, adapter_for};
pub use station::{ProviderKind, Station, StationTable};
pub use units::DisplayUnit;
