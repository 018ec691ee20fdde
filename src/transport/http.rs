use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum TransportError {
    /// The HTTP client could not be constructed
    #[error("failed to build HTTP client: {0}")]
    Client(String),

    /// No response was obtained (connection refused, DNS, timeout, ...)
    #[error("network error: {0}")]
    Network(String),

    /// A response arrived but its body could not be read
    #[error("failed to read response body: {0}")]
    Body(String),
}

/// A response as seen by the coordinator: status plus raw body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Issues exactly one JSON POST per call.
pub trait Transport {
    fn post_json(&self, endpoint: &str, body: &Value) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn post_json(&self, endpoint: &str, body: &Value) -> Result<HttpResponse, TransportError> {
        (**self).post_json(endpoint, body)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn post_json(&self, endpoint: &str, body: &Value) -> Result<HttpResponse, TransportError> {
        (**self).post_json(endpoint, body)
    }
}

// ============================================================================
// reqwest-backed transport
// ============================================================================

/// Sends requests to `base_url` + endpoint with a blocking reqwest client.
pub struct HttpTransport {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    /// Build a transport. `timeout` of `None` lets a request stay pending
    /// until the server answers or the connection fails.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, TransportError> {
        let mut builder = reqwest::blocking::Client::builder();
        // reqwest's blocking client defaults to a 30s timeout; clear it unless configured
        builder = builder.timeout(timeout);

        let client = builder
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Full URL for an endpoint path.
    pub fn url_for(&self, endpoint: &str) -> String {
        if endpoint.starts_with('/') {
            format!("{}{}", self.base_url, endpoint)
        } else {
            format!("{}/{}", self.base_url, endpoint)
        }
    }
}

impl Transport for HttpTransport {
    fn post_json(&self, endpoint: &str, body: &Value) -> Result<HttpResponse, TransportError> {
        let url = self.url_for(endpoint);
        debug!(%url, "POST");

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .json(body)
            .send()
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| TransportError::Body(e.to_string()))?;

        debug!(%url, status, bytes = body.len(), "response received");
        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joining_strips_trailing_slash() {
        let t = HttpTransport::new("http://localhost:5000/", None).unwrap();
        assert_eq!(t.url_for("/create_guide"), "http://localhost:5000/create_guide");
        assert_eq!(t.url_for("explain_topic"), "http://localhost:5000/explain_topic");
    }

    #[test]
    fn success_range() {
        assert!(HttpResponse::new(200, "").is_success());
        assert!(HttpResponse::new(204, "").is_success());
        assert!(!HttpResponse::new(302, "").is_success());
        assert!(!HttpResponse::new(500, "").is_success());
    }
}
