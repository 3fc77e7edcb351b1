use std::env;

use crate::upstream::{UpstreamConfig, DEFAULT_MODEL, DEFAULT_URL};

pub const DEFAULT_PORT: u16 = 4700;
pub const DEFAULT_TIMEOUT_MS: u64 = 60_000;

/// Service settings read from the process environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    /// Browser origin allowed to call the relay with credentials.
    pub cors_origin: Option<String>,
    pub upstream: UpstreamConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unparsable numbers fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = lookup("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let cors_origin = lookup("CORS_ORIGIN").filter(|value| !value.trim().is_empty());

        let timeout_ms = lookup("UPSTREAM_TIMEOUT_MS")
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_MS);

        Self {
            port,
            cors_origin,
            upstream: UpstreamConfig {
                url: lookup("UPSTREAM_URL").unwrap_or_else(|| DEFAULT_URL.to_string()),
                api_key: lookup("API_KEY").unwrap_or_default(),
                model: lookup("UPSTREAM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                timeout_ms,
            },
        }
    }
}
