use serde_json::Value;
use std::fmt::Debug;

use crate::{
    error::FetchError,
    model::WeatherResult,
    provider::{bom::BomAdapter, ecowitt::EcowittAdapter},
    station::{ProviderKind, Station},
    units::DisplayUnit,
};

pub mod bom;
pub mod ecowitt;

/// Turns one provider's raw JSON into the canonical result.
///
/// Adapters are pure: the payload has already been fetched and decoded.
/// Missing fields become `None`; only a payload with nothing usable in it
/// is an error.
pub trait ProviderAdapter: Send + Sync + Debug {
    fn adapt(
        &self,
        station: &Station,
        payload: &Value,
        units: DisplayUnit,
    ) -> Result<WeatherResult, FetchError>;
}

/// The adapter for a provider kind.
pub fn adapter_for(kind: ProviderKind) -> &'static dyn ProviderAdapter {
    match kind {
        ProviderKind::DeviceTelemetry => &EcowittAdapter,
        ProviderKind::MeteorologicalFeed => &BomAdapter,
    }
}

static NULL: Value = Value::Null;

/// Nested lookup by JSON pointer; missing keys at any depth give `null`.
fn lookup<'a>(root: &'a Value, pointer: &str) -> &'a Value {
    root.pointer(pointer).unwrap_or(&NULL)
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn adapter_dispatch_follows_provider_kind() {
        let ecowitt = format!("{:?}", adapter_for(ProviderKind::DeviceTelemetry));
        let bom = format!("{:?}", adapter_for(ProviderKind::MeteorologicalFeed));
        assert_eq!(ecowitt, "EcowittAdapter");
        assert_eq!(bom, "BomAdapter");
    }

    #[test]
    fn lookup_missing_paths_are_null() {
        let v = json!({"a": {"b": 1}});
        assert_eq!(lookup(&v, "/a/b"), &json!(1));
        assert!(lookup(&v, "/a/c").is_null());
        assert!(lookup(&v, "/x/y/z").is_null());
    }

    #[test]
    fn blank_values() {
        assert!(is_blank(&json!(null)));
        assert!(is_blank(&json!([])));
        assert!(is_blank(&json!({})));
        assert!(is_blank(&json!(" ")));
        assert!(!is_blank(&json!(0)));
        assert!(!is_blank(&json!({"k": 1})));
    }
}
