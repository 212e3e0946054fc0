//! Transport seam.
//!
//! [`Transport`] moves one fully-built request over the wire and hands back
//! the raw status, content type and body. Everything above it (URL building,
//! status handling, JSON decoding) lives in [`crate::client::ApiClient`], so
//! alternative transports only have to do I/O.

use std::time::Duration;

use async_trait::async_trait;
use dailies_settings::HttpSettings;
use reqwest::Method;
use tracing::debug;
use url::Url;

use crate::error::ApiError;

/// A request ready to send.
#[derive(Clone, Debug)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute URL including query string.
    pub url: Url,
    /// Header name/value pairs.
    pub headers: Vec<(String, String)>,
    /// Raw body.
    pub body: Option<String>,
}

impl ApiRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A response as received, before any status or content handling.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// `Content-Type` header, if any.
    pub content_type: Option<String>,
    /// Body text.
    pub body: String,
}

impl ApiResponse {
    /// A `200` response carrying a JSON body.
    pub fn json(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            content_type: Some("application/json".into()),
            body: body.into(),
        }
    }

    /// A `204` response.
    pub fn no_content() -> Self {
        Self {
            status: 204,
            content_type: None,
            body: String::new(),
        }
    }

    /// A response with the given status and plain-text body.
    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: Some("text/plain; charset=utf-8".into()),
            body: body.into(),
        }
    }

    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Whether the content type declares JSON.
    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.to_ascii_lowercase().contains("application/json"))
    }
}

/// Sends requests. Implementations must be `Send + Sync`.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request` and return the raw response.
    ///
    /// Only I/O failures are errors; non-2xx statuses are returned as
    /// ordinary responses.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError>;
}

/// Transport backed by `reqwest`, with a cookie store so the session cookie
/// set by login is sent on every later request.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a transport from HTTP settings.
    pub fn new(settings: &HttpSettings) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .connect_timeout(Duration::from_millis(settings.connect_timeout_ms))
            .timeout(Duration::from_millis(settings.request_timeout_ms))
            .user_agent(settings.user_agent.clone())
            .build()?;
        Ok(Self { client })
    }

    /// Wrap an existing client (its cookie and timeout policy is kept).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        debug!(method = %request.method, url = %request.url, "sending request");

        let mut builder = self.client.request(request.method, request.url);
        for (name, value) in request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let body = response.text().await?;

        debug!(status, "response received");
        Ok(ApiResponse {
            status,
            content_type,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_detection_ignores_case_and_params() {
        let mut resp = ApiResponse::json("{}");
        assert!(resp.is_json());
        resp.content_type = Some("Application/JSON; charset=utf-8".into());
        assert!(resp.is_json());
        resp.content_type = Some("text/html".into());
        assert!(!resp.is_json());
        resp.content_type = None;
        assert!(!resp.is_json());
    }

    #[test]
    fn success_range() {
        assert!(ApiResponse::no_content().is_success());
        assert!(!ApiResponse::text(302, "").is_success());
        assert!(!ApiResponse::text(404, "").is_success());
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let req = ApiRequest {
            method: Method::POST,
            url: Url::parse("https://tracker.test/api/auth/login").unwrap(),
            headers: vec![("content-type".into(), "text/plain".into())],
            body: None,
        };
        assert_eq!(req.header("Content-Type"), Some("text/plain"));
        assert!(req.header("Accept").is_none());
    }

    #[test]
    fn builds_from_default_settings() {
        let transport = ReqwestTransport::new(&HttpSettings::default());
        assert!(transport.is_ok());
    }
}
