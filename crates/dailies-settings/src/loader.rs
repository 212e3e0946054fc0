//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`DailiesSettings::default()`]
//! 2. If the settings file exists, deep-merge user values over defaults
//! 3. Apply environment variable overrides (highest priority)
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::Result;
use crate::types::DailiesSettings;

/// Env var naming the API base URL.
pub const ENV_API_BASE_URL: &str = "DAILIES_API_BASE_URL";
/// Env var naming the API path prefix.
pub const ENV_API_PREFIX: &str = "DAILIES_API_PREFIX";
/// Env var overriding the settings file location.
pub const ENV_SETTINGS_PATH: &str = "DAILIES_SETTINGS";
/// Env var overriding the request timeout (milliseconds).
pub const ENV_REQUEST_TIMEOUT_MS: &str = "DAILIES_REQUEST_TIMEOUT_MS";
/// Env var overriding the default log level.
pub const ENV_LOG_LEVEL: &str = "DAILIES_LOG_LEVEL";

/// Resolve the settings file path.
///
/// `DAILIES_SETTINGS` wins; otherwise `~/.dailies/settings.json`.
pub fn settings_path() -> PathBuf {
    if let Some(explicit) = read_env_string(ENV_SETTINGS_PATH) {
        return PathBuf::from(explicit);
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".dailies").join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<DailiesSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with process env var overrides.
pub fn load_settings_from_path(path: &Path) -> Result<DailiesSettings> {
    load_settings_with(path, read_env_string)
}

/// Load settings from `path`, resolving overrides through `lookup`.
///
/// If the file does not exist, defaults are used. If the file contains
/// invalid JSON, returns an error.
pub fn load_settings_with<F>(path: &Path, lookup: F) -> Result<DailiesSettings>
where
    F: Fn(&str) -> Option<String>,
{
    let defaults = serde_json::to_value(DailiesSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    let mut settings: DailiesSettings = serde_json::from_value(merged)?;
    apply_overrides(&mut settings, lookup);
    Ok(settings)
}

/// Recursive deep merge of two JSON values.
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply overrides resolved through `lookup` (normally the process env).
///
/// Blank values are treated as unset. Invalid numbers are ignored with a
/// warning and the file/default value is kept.
pub fn apply_overrides<F>(settings: &mut DailiesSettings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let lookup = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    // ── API location ────────────────────────────────────────────────
    if let Some(v) = lookup(ENV_API_BASE_URL) {
        settings.api.base_url = Some(v);
    }
    if let Some(v) = lookup(ENV_API_PREFIX) {
        settings.api.prefix = Some(v);
    }

    // ── HTTP ────────────────────────────────────────────────────────
    if let Some(v) = lookup(ENV_REQUEST_TIMEOUT_MS) {
        match parse_u64_range(&v, 100, 600_000) {
            Some(ms) => settings.http.request_timeout_ms = ms,
            None => warn!(key = ENV_REQUEST_TIMEOUT_MS, value = %v, "invalid timeout env var, ignoring"),
        }
    }

    // ── Logging ─────────────────────────────────────────────────────
    if let Some(v) = lookup(ENV_LOG_LEVEL) {
        settings.logging.level = v;
    }
}

/// Parse a string as a `u64` within a range.
pub fn parse_u64_range(val: &str, min: u64, max: u64) -> Option<u64> {
    let n: u64 = val.trim().parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

fn read_env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn deep_merge_nested_objects() {
        let merged = deep_merge(
            json!({"http": {"connectTimeoutMs": 1, "requestTimeoutMs": 2}}),
            json!({"http": {"requestTimeoutMs": 9}}),
        );
        assert_eq!(merged, json!({"http": {"connectTimeoutMs": 1, "requestTimeoutMs": 9}}));
    }

    #[test]
    fn deep_merge_skips_nulls_and_replaces_arrays() {
        let merged = deep_merge(json!({"a": 1, "b": [1, 2]}), json!({"a": null, "b": [3]}));
        assert_eq!(merged, json!({"a": 1, "b": [3]}));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings_with(&dir.path().join("nope.json"), env(&[])).unwrap();
        assert_eq!(settings, DailiesSettings::default());
    }

    #[test]
    fn file_values_merge_over_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{"api": {"baseUrl": "https://tracker.test", "prefix": "/api"}, "logging": {"level": "debug"}}"#,
        )
        .unwrap();

        let settings = load_settings_with(&path, env(&[])).unwrap();
        assert_eq!(settings.api.base_url.as_deref(), Some("https://tracker.test"));
        assert_eq!(settings.api.prefix.as_deref(), Some("/api"));
        assert_eq!(settings.logging.level, "debug");
        assert_eq!(settings.http.request_timeout_ms, 30_000);
    }

    #[test]
    fn env_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"api": {"baseUrl": "https://file.test"}}"#).unwrap();

        let settings = load_settings_with(
            &path,
            env(&[
                (ENV_API_BASE_URL, "https://env.test"),
                (ENV_API_PREFIX, "v1"),
                (ENV_REQUEST_TIMEOUT_MS, "2500"),
            ]),
        )
        .unwrap();
        assert_eq!(settings.api.base_url.as_deref(), Some("https://env.test"));
        assert_eq!(settings.api.prefix.as_deref(), Some("v1"));
        assert_eq!(settings.http.request_timeout_ms, 2500);
    }

    #[test]
    fn blank_and_invalid_env_values_are_ignored() {
        let mut settings = DailiesSettings::default();
        apply_overrides(
            &mut settings,
            env(&[(ENV_API_BASE_URL, "   "), (ENV_REQUEST_TIMEOUT_MS, "soon")]),
        );
        assert!(settings.api.base_url.is_none());
        assert_eq!(settings.http.request_timeout_ms, 30_000);
    }

    #[test]
    fn invalid_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(load_settings_with(&path, env(&[])).is_err());
    }

    #[test]
    fn parse_u64_range_bounds() {
        assert_eq!(parse_u64_range("100", 100, 200), Some(100));
        assert_eq!(parse_u64_range("201", 100, 200), None);
        assert_eq!(parse_u64_range("-1", 0, 10), None);
    }
}
