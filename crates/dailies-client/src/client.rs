//! Generic request helper.
//!
//! [`ApiClient::request`] resolves an endpoint path against the configured
//! base URL and prefix, attaches query parameters, sends through the
//! [`Transport`], and decodes the response:
//!
//! - non-2xx → [`ApiError::Status`] with the body text (or a fallback)
//! - `204` → [`Payload::Empty`]
//! - JSON content type → [`Payload::Json`]
//! - anything else → [`Payload::Text`]

use std::sync::Arc;

use dailies_settings::ApiConfig;
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::ApiError;
use crate::transport::{ApiRequest, Transport};

/// Query parameters. Pairs whose value is empty are dropped.
pub type Query<'a> = &'a [(&'a str, &'a str)];

/// Per-request options.
#[derive(Clone, Debug)]
pub struct RequestOptions {
    /// HTTP method.
    pub method: Method,
    /// Raw body. A JSON content type is added if none is set.
    pub body: Option<String>,
    /// Extra headers.
    pub headers: Vec<(String, String)>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            body: None,
            headers: Vec::new(),
        }
    }
}

impl RequestOptions {
    /// `POST` without a body.
    pub fn post() -> Self {
        Self {
            method: Method::POST,
            ..Self::default()
        }
    }

    /// `POST` with `value` serialized as the JSON body.
    pub fn post_json<T: Serialize + ?Sized>(value: &T) -> Result<Self, ApiError> {
        Ok(Self {
            method: Method::POST,
            body: Some(serde_json::to_string(value)?),
            headers: Vec::new(),
        })
    }

    /// Add a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// A decoded successful response.
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    /// `204 No Content`.
    Empty,
    /// Parsed JSON body.
    Json(serde_json::Value),
    /// Raw body of a non-JSON response.
    Text(String),
}

impl Payload {
    /// Deserialize a JSON payload into `T`.
    pub fn into_json<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        match self {
            Self::Json(value) => Ok(serde_json::from_value(value)?),
            Self::Empty => Err(ApiError::UnexpectedPayload("no content")),
            Self::Text(_) => Err(ApiError::UnexpectedPayload("text")),
        }
    }
}

/// Typed access to the tracker API over a [`Transport`].
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    config: ApiConfig,
}

impl ApiClient {
    /// Create a client for the given API location.
    pub fn new(transport: Arc<dyn Transport>, config: ApiConfig) -> Self {
        Self { transport, config }
    }

    /// The API location this client targets.
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Absolute URL for `path` with non-empty `query` pairs appended.
    pub fn build_url(&self, path: &str, query: Query<'_>) -> Result<Url, ApiError> {
        let mut url = Url::parse(&self.config.endpoint(path))?;
        let mut pairs = query.iter().filter(|(_, v)| !v.is_empty()).peekable();
        if pairs.peek().is_some() {
            let mut serializer = url.query_pairs_mut();
            for (key, value) in pairs {
                let _ = serializer.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// Send a request and decode the response.
    pub async fn request(
        &self,
        path: &str,
        options: RequestOptions,
        query: Query<'_>,
    ) -> Result<Payload, ApiError> {
        let url = self.build_url(path, query)?;

        let mut headers = options.headers;
        let has_content_type = headers
            .iter()
            .any(|(k, _)| k.eq_ignore_ascii_case("content-type"));
        if options.body.is_some() && !has_content_type {
            headers.push(("Content-Type".into(), "application/json".into()));
        }

        let response = self
            .transport
            .send(ApiRequest {
                method: options.method,
                url,
                headers,
                body: options.body,
            })
            .await?;

        if !response.is_success() {
            return Err(ApiError::from_status(response.status, &response.body));
        }
        if response.status == 204 {
            return Ok(Payload::Empty);
        }
        if response.is_json() {
            return Ok(Payload::Json(serde_json::from_str(&response.body)?));
        }
        Ok(Payload::Text(response.body))
    }

    /// `GET` a JSON resource and deserialize it.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Query<'_>,
    ) -> Result<T, ApiError> {
        self.request(path, RequestOptions::default(), query)
            .await?
            .into_json()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
