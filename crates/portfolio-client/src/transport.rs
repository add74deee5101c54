//! Transport seam and its reqwest-backed implementation.
//!
//! The transport owns wire details only: cookies, JSON bodies, and reading
//! the response. Status interpretation and retries live in the client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, header::CONTENT_TYPE};
use url::Url;

use crate::request::ApiRequest;

/// Status and raw body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body bytes.
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Build a response from a status and body.
    #[must_use]
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is in the 2xx range.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Failures that prevented a response from being received.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// No response arrived within the configured timeout.
    #[error("request timed out: {message}")]
    Timeout {
        /// Underlying error description.
        message: String,
    },
    /// Connecting, sending, or reading the body failed.
    #[error("request failed: {message}")]
    Connection {
        /// Underlying error description.
        message: String,
    },
}

/// Sends a single request and returns whatever the server answered.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue `request` against the absolute `url`.
    async fn send(&self, url: Url, request: &ApiRequest) -> Result<RawResponse, TransportError>;
}

/// Reqwest transport with a cookie store, so session cookies set by the
/// backend are attached to every later request.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build a transport with a per-request timeout.
    ///
    /// # Errors
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, url: Url, request: &ApiRequest) -> Result<RawResponse, TransportError> {
        let mut builder = self.client.request(request.method().clone(), url);
        for (name, value) in request.headers() {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body() {
            builder = builder.header(CONTENT_TYPE, "application/json").json(body);
        } else if request.method() != Method::GET {
            builder = builder.header(CONTENT_TYPE, "application/json");
        }

        let response = builder.send().await.map_err(map_transport_error)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(map_transport_error)?;
        Ok(RawResponse::new(status, body.to_vec()))
    }
}

fn map_transport_error(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout {
            message: error.to_string(),
        }
    } else {
        TransportError::Connection {
            message: error.to_string(),
        }
    }
}
