//! Resolved tracker API location.

use url::Url;

use crate::errors::{ConfigError, Result};
use crate::types::DailiesSettings;

/// Normalized API base URL and path prefix.
///
/// The base never ends in `/`; the prefix always starts with `/` and never
/// ends with one (a bare `/` prefix normalizes to empty).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
    prefix: String,
}

impl ApiConfig {
    /// Validate and normalize a base URL and prefix.
    ///
    /// Blank values are [`ConfigError::MissingApiConfig`]; a base that is not
    /// an absolute URL is [`ConfigError::InvalidBaseUrl`].
    pub fn new(base_url: &str, prefix: &str) -> Result<Self> {
        let base_url = base_url.trim();
        let prefix = prefix.trim();
        if base_url.is_empty() || prefix.is_empty() {
            return Err(ConfigError::MissingApiConfig);
        }

        let base_url = base_url.trim_end_matches('/');
        let _ = Url::parse(base_url).map_err(|e| ConfigError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        let trimmed = prefix.trim_matches('/');
        let prefix = if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{trimmed}")
        };

        Ok(Self {
            base_url: base_url.to_owned(),
            prefix,
        })
    }

    /// Resolve from loaded settings (env overrides already applied).
    pub fn from_settings(settings: &DailiesSettings) -> Result<Self> {
        match (&settings.api.base_url, &settings.api.prefix) {
            (Some(base), Some(prefix)) => Self::new(base, prefix),
            _ => Err(ConfigError::MissingApiConfig),
        }
    }

    /// Base URL without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Path prefix with leading slash (or empty).
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Absolute URL string for an endpoint path. A missing leading `/` on
    /// `path` is added.
    pub fn endpoint(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}{path}", self.base_url, self.prefix)
        } else {
            format!("{}{}/{path}", self.base_url, self.prefix)
        }
    }
}
