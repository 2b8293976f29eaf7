//! HTTP transport seam
//!
//! The fetcher drives a [`Transport`]; production code uses
//! [`HttpTransport`] (reqwest), tests substitute scripted transports.
//! Timeouts are enforced by the fetcher around `get`, not by the transport.

use crate::error::FetchError;
use async_trait::async_trait;
use reqwest::header::RETRY_AFTER;
use reqwest::{Client, Url};
use std::time::Duration;

/// A complete response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Decoded body text
    pub body: String,
    /// Retry-After header, when given in seconds
    pub retry_after: Option<Duration>,
}

impl RawResponse {
    /// Response without a Retry-After hint
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            retry_after: None,
        }
    }

    /// True for 2xx statuses
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Issues one GET and reads the full body
///
/// Errors are transport-level failure descriptions (connect, TLS, body
/// read). HTTP error statuses are not errors at this level.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &Url) -> Result<RawResponse, String>;
}

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Build the HTTP client
    pub fn new(user_agent: &str, connect_timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &Url) -> Result<RawResponse, String> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_retry_after);
        let body = response.text().await.map_err(|e| e.to_string())?;

        Ok(RawResponse {
            status,
            body,
            retry_after,
        })
    }
}

/// Retry-After in delta-seconds form; HTTP dates are ignored
fn parse_retry_after(value: &str) -> Option<Duration> {
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}
