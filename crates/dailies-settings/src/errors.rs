//! Settings error types.

use thiserror::Error;

/// Errors that can occur when resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The API base URL or path prefix is missing or blank.
    #[error("missing API configuration: set DAILIES_API_BASE_URL and DAILIES_API_PREFIX")]
    MissingApiConfig,
    /// The API base URL is not an absolute URL.
    #[error("invalid API base URL {url:?}: {reason}")]
    InvalidBaseUrl {
        /// The offending value.
        url: String,
        /// Parser message.
        reason: String,
    },
    /// Failed to read the settings file from disk.
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    /// Failed to parse JSON in the settings file.
    #[error("failed to parse settings JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for settings operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
