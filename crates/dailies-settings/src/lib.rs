//! # dailies-settings
//!
//! Configuration for the dailies client.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults** — [`DailiesSettings::default()`]
//! 2. **User file** — `~/.dailies/settings.json` (deep-merged over defaults)
//! 3. **Environment variables** — `DAILIES_*` overrides (highest priority)
//!
//! The API base URL and path prefix have no defaults: both must come from
//! the file or the environment, otherwise [`ApiConfig::from_settings`] fails
//! with [`ConfigError::MissingApiConfig`].

#![deny(unsafe_code)]

pub mod api;
pub mod errors;
pub mod loader;
pub mod types;

pub use api::ApiConfig;
pub use errors::{ConfigError, Result};
pub use loader::{deep_merge, load_settings, load_settings_from_path, load_settings_with, settings_path};
pub use types::{ApiSettings, DailiesSettings, HttpSettings, LoggingSettings};

/// Load settings and resolve the API location in one step.
///
/// A malformed settings file is reported as-is; a missing base URL or prefix
/// is [`ConfigError::MissingApiConfig`].
pub fn load_api_config() -> Result<(DailiesSettings, ApiConfig)> {
    let settings = load_settings()?;
    let api = ApiConfig::from_settings(&settings)?;
    Ok((settings, api))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn re_exports_work() {
        let _settings = DailiesSettings::default();
        let _path = settings_path();
        let merged = deep_merge(serde_json::json!({"x": 1}), serde_json::json!({"y": 2}));
        assert_eq!(merged["x"], 1);
        assert_eq!(merged["y"], 2);
    }
}
