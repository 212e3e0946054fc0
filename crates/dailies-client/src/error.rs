//! Transport and API error types.

/// Errors produced by the transport or while decoding a response.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    ///
    /// `message` is the response body, or `request failed: <status>` when the
    /// body was blank.
    #[error("{message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Body text or fallback.
        message: String,
    },

    /// The request could not be sent or the body could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A JSON body did not match the expected shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The endpoint URL could not be built.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A typed call expected JSON but the server sent something else.
    #[error("expected a JSON response, got {0}")]
    UnexpectedPayload(&'static str),

    /// Transport-specific failure (used by non-reqwest transports).
    #[error("{message}")]
    Other {
        /// Error description.
        message: String,
    },
}

impl ApiError {
    /// Build the error for a non-2xx response.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = if body.trim().is_empty() {
            format!("request failed: {status}")
        } else {
            body.to_owned()
        };
        Self::Status { status, message }
    }

    /// HTTP status when the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Text suitable for showing to a user, `None` when there is nothing
    /// meaningful to show.
    pub fn user_message(&self) -> Option<String> {
        let text = self.to_string();
        let trimmed = text.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_owned())
    }

    /// Short classification string for logging.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Status { status: 401 | 403, .. } => "auth",
            Self::Status { .. } => "status",
            Self::Http(_) => "network",
            Self::Json(_) | Self::UnexpectedPayload(_) => "parse",
            Self::InvalidUrl(_) => "url",
            Self::Other { .. } => "other",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
