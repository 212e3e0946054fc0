//! Settings schema and compiled defaults.

use serde::{Deserialize, Serialize};

/// Root settings object (`~/.dailies/settings.json`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DailiesSettings {
    /// Tracker API location.
    pub api: ApiSettings,
    /// HTTP client tuning.
    pub http: HttpSettings,
    /// Log output.
    pub logging: LoggingSettings,
}

/// Tracker API location. Both values are required before any request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiSettings {
    /// Scheme + host (+ optional port), e.g. `https://tracker.example.com`.
    pub base_url: Option<String>,
    /// Path prefix prepended to every endpoint, e.g. `/api`.
    pub prefix: Option<String>,
}

/// HTTP client tuning.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HttpSettings {
    /// TCP/TLS connect timeout.
    pub connect_timeout_ms: u64,
    /// Whole-request timeout.
    pub request_timeout_ms: u64,
    /// `User-Agent` header value.
    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            connect_timeout_ms: 10_000,
            request_timeout_ms: 30_000,
            user_agent: concat!("dailies/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}

/// Log output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_owned(),
        }
    }
}
