//! Outbound transport abstraction.
//!
//! The gateway sees the downstream service as a single stateless call:
//! post a JSON body to a URL with some headers and a timeout, get back a
//! status code and a body. Implementations hold no per-call mutable state.

use ragassist_core::AppResult;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

const JSON_MEDIA_TYPE: &str = "application/json";

/// A fully built outbound request.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundRequest {
    /// Target endpoint
    pub url: String,

    /// Serialized JSON body
    pub body: String,

    /// Request headers, in send order
    pub headers: Vec<(String, String)>,

    /// Ceiling for the whole exchange
    pub timeout: Duration,
}

impl OutboundRequest {
    /// Build a JSON POST with `Content-Type` and `Accept` set to
    /// `application/json`.
    pub fn json<T: Serialize>(
        url: impl Into<String>,
        payload: &T,
        timeout: Duration,
    ) -> AppResult<Self> {
        Ok(Self {
            url: url.into(),
            body: serde_json::to_string(payload)?,
            headers: vec![
                ("Content-Type".to_string(), JSON_MEDIA_TYPE.to_string()),
                ("Accept".to_string(), JSON_MEDIA_TYPE.to_string()),
            ],
            timeout,
        })
    }

    /// Look up a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Status and body of a downstream reply.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// The request never produced a complete reply.
///
/// The message is the underlying client error text.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    #[error("{0}")]
    Timeout(String),

    #[error("{0}")]
    Connect(String),

    #[error("{0}")]
    Request(String),
}

/// Sends outbound requests to the downstream service.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// POST `request.body` to `request.url`.
    ///
    /// Any status code is a successful exchange; only failures to obtain a
    /// complete reply are errors.
    async fn post_json(&self, request: OutboundRequest) -> Result<RawResponse, TransportError>;
}
