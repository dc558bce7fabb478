//! HTTP client for the chat backend.
//!
//! Client-side (csr): real HTTP calls via `gloo-net`.
//! Natively only the trait and request helpers exist; tests supply their own
//! [`ChatBackend`] implementations.
//!
//! ERROR HANDLING
//! ==============
//! Every failure mode (transport, non-2xx status, undecodable body) surfaces
//! as an [`ApiError`]. There is no retry and no timeout beyond the browser's
//! own; the session controller turns any error into an apology message.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use serde_json::Value;

use super::types::ChatRequest;
#[cfg(feature = "csr")]
use crate::config::ApiConfig;

/// Errors produced by a chat exchange.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request could not be built or the network call failed.
    #[error("chat request failed: {0}")]
    Request(String),

    /// The backend answered with a non-success HTTP status.
    #[error("chat backend returned status {status}")]
    Status { status: u16 },

    /// The response body was not valid JSON.
    #[error("chat response decode failed: {0}")]
    Decode(String),
}

/// Full URL of the chat endpoint under `base_url`.
#[must_use]
pub fn chat_endpoint(base_url: &str) -> String {
    format!("{}/chat", base_url.trim_end_matches('/'))
}

/// Whether `status` is a 2xx success code.
#[must_use]
pub fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// One request/response exchange with a chat backend.
#[async_trait::async_trait(?Send)]
pub trait ChatBackend {
    /// Send `request` and return the decoded reply body as-is.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, non-success status, or an
    /// undecodable body.
    async fn send_message(&self, request: &ChatRequest) -> Result<Value, ApiError>;
}

#[async_trait::async_trait(?Send)]
impl<T: ChatBackend + ?Sized> ChatBackend for &T {
    async fn send_message(&self, request: &ChatRequest) -> Result<Value, ApiError> {
        (**self).send_message(request).await
    }
}

/// `POST {base}/chat` over the browser's fetch API.
#[cfg(feature = "csr")]
#[derive(Clone, Debug)]
pub struct HttpChatBackend {
    endpoint: String,
}

#[cfg(feature = "csr")]
impl HttpChatBackend {
    #[must_use]
    pub fn new(config: &ApiConfig) -> Self {
        Self { endpoint: chat_endpoint(&config.base_url) }
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[cfg(feature = "csr")]
#[async_trait::async_trait(?Send)]
impl ChatBackend for HttpChatBackend {
    async fn send_message(&self, request: &ChatRequest) -> Result<Value, ApiError> {
        let resp = gloo_net::http::Request::post(&self.endpoint)
            .json(request)
            .map_err(|e| ApiError::Request(e.to_string()))?
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;
        let status = resp.status();
        if !is_success(status) {
            return Err(ApiError::Status { status });
        }
        resp.json::<Value>().await.map_err(|e| ApiError::Decode(e.to_string()))
    }
}
