//! HTTP transport seam for the search API
//!
//! The pagination protocol only needs "send this body, give me status and
//! text back"; everything HTTP-specific sits behind [`SearchTransport`] so
//! the fetch loop can be exercised with a scripted transport in tests.

use async_trait::async_trait;
use patentscope_config::ApiConfig;
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Header carrying the API key
pub const API_KEY_HEADER: &str = "X-Api-Key";

/// Raw response from one request attempt
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status of the attempt
    pub status: StatusCode,

    /// Response body as text (parsed by the caller)
    pub body: String,
}

/// Transient transport failure (connection, TLS, timeout)
///
/// Opaque by design: the fetch loop only retries or logs it, never matches
/// on the cause.
#[derive(Debug, Error)]
#[error("transport error: {message}")]
pub struct TransportError {
    message: String,
}

impl TransportError {
    /// Create a transport error with the given message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// One-shot request execution against the search endpoint
#[async_trait]
pub trait SearchTransport: Send + Sync {
    /// Execute a single request attempt with the given JSON body
    async fn execute(&self, body: &Value) -> Result<HttpResponse, TransportError>;
}

/// Production transport backed by reqwest
///
/// The per-attempt timeout is enforced by the underlying client; connection
/// pooling is left to reqwest.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpTransport {
    /// Build a transport from the API configuration
    pub fn from_config(config: &ApiConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key().unwrap_or_default().to_string(),
        }
    }
}

#[async_trait]
impl SearchTransport for HttpTransport {
    async fn execute(&self, body: &Value) -> Result<HttpResponse, TransportError> {
        let response = self
            .client
            .post(&self.base_url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        Ok(HttpResponse { status, body })
    }
}
