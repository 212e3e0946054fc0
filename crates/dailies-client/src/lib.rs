//! # dailies-client
//!
//! HTTP access to the tracker API.
//!
//! - [`Transport`] is the I/O seam; [`ReqwestTransport`] is the production
//!   implementation (cookie store, timeouts from settings).
//! - [`ApiClient`] builds URLs from the configured base and prefix, applies the
//!   status/content-type rules and exposes one typed method per endpoint.

#![deny(unsafe_code)]

pub mod client;
pub mod endpoints;
pub mod error;
pub mod transport;

use std::sync::Arc;

pub use client::{ApiClient, Payload, Query, RequestOptions};
pub use endpoints::{Credentials, TaskFilters};
pub use error::ApiError;
pub use transport::{ApiRequest, ApiResponse, ReqwestTransport, Transport};

use dailies_settings::{ApiConfig, HttpSettings};

/// Build an [`ApiClient`] over a fresh [`ReqwestTransport`].
pub fn connect(http: &HttpSettings, api: ApiConfig) -> Result<ApiClient, ApiError> {
    let transport = ReqwestTransport::new(http)?;
    Ok(ApiClient::new(Arc::new(transport), api))
}
