//! reqwest-backed transport.
//!
//! A single `reqwest::Client` is shared by every call. It carries no
//! per-request options: URL, headers, body and timeout all come from the
//! [`OutboundRequest`], so concurrent calls never see each other's settings.

use crate::client::{OutboundRequest, RawResponse, Transport, TransportError};
use ragassist_core::{AppError, AppResult};
use std::error::Error as StdError;

/// HTTP transport for the downstream RAG service.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport with its own connection pool.
    pub fn new() -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("ragassist/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

/// Classify a reqwest failure, keeping the full cause chain in the message.
fn transport_error(err: reqwest::Error) -> TransportError {
    let message = error_chain(&err);

    if err.is_timeout() {
        TransportError::Timeout(message)
    } else if err.is_connect() {
        TransportError::Connect(message)
    } else {
        TransportError::Request(message)
    }
}

fn error_chain(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();

    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }

    message
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn post_json(&self, request: OutboundRequest) -> Result<RawResponse, TransportError> {
        tracing::debug!(url = %request.url, timeout = ?request.timeout, "POST to RAG service");

        let mut builder = self
            .client
            .post(&request.url)
            .timeout(request.timeout)
            .body(request.body);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status().as_u16();

        // The timeout covers reading the body as well.
        let body = response.text().await.map_err(transport_error)?;

        tracing::debug!(status, bytes = body.len(), "RAG service replied");

        Ok(RawResponse { status, body })
    }
}
