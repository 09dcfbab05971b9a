//! Capability flags reported by `/api/app_status` and `/api/health`.

use serde::Serialize;
use serde_json::{Map, Value};

/// Local capabilities that do not depend on any external provider.
pub const ALWAYS_AVAILABLE: [&str; 2] = ["Report generation", "Local backup"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Capability {
    pub name: String,
    pub available: bool,
}

/// Advisory status panel contents. Never gates submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CapabilityStatus {
    pub healthy: Option<bool>,
    pub providers: Vec<Capability>,
    pub local: Vec<Capability>,
}

impl CapabilityStatus {
    /// Extracts per-provider availability from the app status document.
    ///
    /// Accepts `{"ai_providers": {...}}` and `{"systems": {"ai_providers": {...}}}`,
    /// where the provider block is either a map of providers or wraps one under
    /// `providers`. Each provider is a boolean or an object with `available`.
    pub fn from_app_status(value: &Value) -> Self {
        let block = value
            .get("ai_providers")
            .or_else(|| value.get("systems").and_then(|s| s.get("ai_providers")))
            .and_then(Value::as_object);

        let providers = block
            .map(|block| match block.get("providers").and_then(Value::as_object) {
                Some(inner) => provider_flags(inner),
                None => provider_flags(block),
            })
            .unwrap_or_default();

        Self {
            healthy: None,
            providers,
            local: ALWAYS_AVAILABLE
                .iter()
                .map(|name| Capability {
                    name: (*name).to_string(),
                    available: true,
                })
                .collect(),
        }
    }

    /// Records the `/api/health` answer.
    pub fn with_health(mut self, health: &Value) -> Self {
        self.healthy = health
            .get("status")
            .and_then(Value::as_str)
            .map(|status| status == "healthy");
        self
    }

    pub fn available_provider_count(&self) -> usize {
        self.providers.iter().filter(|p| p.available).count()
    }
}

fn provider_flags(map: &Map<String, Value>) -> Vec<Capability> {
    map.iter()
        .filter_map(|(name, value)| {
            let available = match value {
                Value::Bool(b) => *b,
                Value::Object(details) => details.get("available").and_then(Value::as_bool)?,
                _ => return None,
            };
            Some(Capability {
                name: name.clone(),
                available,
            })
        })
        .collect()
}
