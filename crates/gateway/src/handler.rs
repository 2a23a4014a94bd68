//! The gateway handler.
//!
//! One invocation is one pipeline run:
//! 1. feature flag for the scope
//! 2. question check, provider default
//! 3. downstream base URL for the scope
//! 4. `{base}/query` endpoint
//! 5. JSON POST
//! 6. reply interpretation
//!
//! Each step returns `Result<_, GatewayError>`; [`GatewayHandler::handle`]
//! turns the error into `GatewayResult::Failure` in one place.

use crate::client::{OutboundRequest, RawResponse, Transport};
use crate::error::GatewayError;
use crate::types::{
    Answer, AskRequest, GatewayResult, QueryRequest, SourceRecord, DEFAULT_PROVIDER,
    ENABLED_PATH, NO_ANSWER, SERVICE_URL_PATH,
};
use ragassist_core::{ConfigReader, Scope};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Ceiling for one downstream call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Forwards questions to the downstream RAG service.
///
/// The handler holds no per-request state; settings are read from the
/// store on every call.
#[derive(Clone)]
pub struct GatewayHandler {
    settings: Arc<dyn ConfigReader>,
    transport: Arc<dyn Transport>,
    timeout: Duration,
}

impl GatewayHandler {
    pub fn new(settings: Arc<dyn ConfigReader>, transport: Arc<dyn Transport>) -> Self {
        Self {
            settings,
            transport,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the downstream timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Answer `request` for `scope`. Never fails; errors become
    /// `GatewayResult::Failure`.
    pub async fn handle(&self, request: &AskRequest, scope: &Scope) -> GatewayResult {
        match self.forward(request, scope).await {
            Ok(answer) => {
                tracing::info!(
                    %scope,
                    sources = answer.sources.len(),
                    confidence = answer.confidence,
                    "RAG answer received"
                );
                GatewayResult::Success(answer)
            }
            Err(err) => {
                tracing::debug!(%scope, kind = err.kind(), "RAG request not answered");
                GatewayResult::Failure {
                    message: err.to_string(),
                }
            }
        }
    }

    async fn forward(&self, request: &AskRequest, scope: &Scope) -> Result<Answer, GatewayError> {
        if !self.is_enabled(scope)? {
            return Err(GatewayError::Disabled);
        }

        let question = request.question.as_deref().unwrap_or_default();
        if question.trim().is_empty() {
            return Err(GatewayError::MissingQuestion);
        }
        let provider = request.provider.as_deref().unwrap_or(DEFAULT_PROVIDER);

        let base_url = self.service_url(scope)?.ok_or(GatewayError::NotConfigured)?;
        let endpoint = query_endpoint(&base_url);

        let outbound =
            OutboundRequest::json(endpoint, &QueryRequest { question, provider }, self.timeout)?;

        tracing::debug!(url = %outbound.url, provider, "forwarding question");

        let response = self.transport.post_json(outbound).await?;
        interpret_response(response)
    }

    fn is_enabled(&self, scope: &Scope) -> Result<bool, GatewayError> {
        Ok(self
            .settings
            .get_value(ENABLED_PATH, scope)?
            .is_some_and(|value| value.as_flag()))
    }

    fn service_url(&self, scope: &Scope) -> Result<Option<String>, GatewayError> {
        let url = self
            .settings
            .get_value(SERVICE_URL_PATH, scope)?
            .map(|value| value.as_text().trim().to_string())
            .filter(|url| !url.is_empty());
        Ok(url)
    }
}

/// Build the downstream endpoint from the configured base URL.
///
/// ```
/// use ragassist_gateway::query_endpoint;
///
/// assert_eq!(query_endpoint("http://svc.example/"), "http://svc.example/query");
/// assert_eq!(query_endpoint("http://svc.example"), "http://svc.example/query");
/// ```
pub fn query_endpoint(base_url: &str) -> String {
    format!("{}/query", base_url.trim_end_matches('/'))
}

/// Turn a downstream reply into an answer.
///
/// Only status 200 is a success. Missing or `null` fields take their
/// defaults; a body that is not an object yields an all-default answer.
/// Source records are relayed as sent.
fn interpret_response(response: RawResponse) -> Result<Answer, GatewayError> {
    if response.status != 200 {
        return Err(GatewayError::HttpStatus {
            status: response.status,
            body: response.body,
        });
    }

    let body: Value = serde_json::from_str(&response.body).map_err(invalid_reply)?;
    let Some(fields) = body.as_object() else {
        return Ok(Answer::default());
    };

    let answer = match fields.get("answer") {
        None | Some(Value::Null) => NO_ANSWER.to_string(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    };

    let sources = match fields.get("sources") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(records)) => records.iter().cloned().map(SourceRecord::from).collect(),
        Some(_) => return Err(invalid_reply("`sources` is not an array")),
    };

    let confidence = fields
        .get("confidence")
        .and_then(Value::as_f64)
        .unwrap_or(0.0);

    Ok(Answer {
        answer,
        sources,
        confidence,
    })
}

// The reply is read and decoded in the same step as the call itself, so a
// malformed reply is reported like a failed connection.
fn invalid_reply(err: impl std::fmt::Display) -> GatewayError {
    GatewayError::Transport(format!("Invalid JSON response: {}", err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AskResponse;
    use serde_json::json;

    fn ok(body: Value) -> RawResponse {
        RawResponse::new(200, body.to_string())
    }

    #[test]
    fn test_query_endpoint_strips_every_trailing_slash() {
        assert_eq!(query_endpoint("http://svc.example///"), "http://svc.example/query");
        assert_eq!(
            query_endpoint("http://svc.example/rag/"),
            "http://svc.example/rag/query"
        );
    }

    #[test]
    fn test_interpret_full_reply() {
        let answer = interpret_response(ok(json!({
            "answer": "42",
            "sources": [{"title": "T", "url": "http://x", "similarity": 0.9}],
            "confidence": 0.8
        })))
        .unwrap();

        assert_eq!(answer.answer, "42");
        assert_eq!(
            answer.sources,
            vec![SourceRecord::from(json!({"title": "T", "url": "http://x", "similarity": 0.9}))]
        );
        assert_eq!(answer.confidence, 0.8);
    }

    #[test]
    fn test_interpret_empty_object_uses_defaults() {
        assert_eq!(interpret_response(ok(json!({}))).unwrap(), Answer::default());
    }

    #[test]
    fn test_interpret_nulls_use_defaults() {
        let answer = interpret_response(ok(json!({
            "answer": null,
            "sources": null,
            "confidence": null
        })))
        .unwrap();
        assert_eq!(answer, Answer::default());
    }

    #[test]
    fn test_interpret_non_object_uses_defaults() {
        assert_eq!(interpret_response(ok(json!([]))).unwrap(), Answer::default());
    }

    #[test]
    fn test_interpret_odd_field_types() {
        let answer = interpret_response(ok(json!({
            "answer": 42,
            "confidence": "high"
        })))
        .unwrap();
        assert_eq!(answer.answer, "42");
        assert_eq!(answer.confidence, 0.0);
    }

    #[test]
    fn test_interpret_error_status() {
        let err = interpret_response(RawResponse::new(500, "server error")).unwrap_err();
        assert_eq!(err.to_string(), "HTTP Error 500: server error");

        // Only exactly 200 counts as success.
        let err = interpret_response(RawResponse::new(201, "{}")).unwrap_err();
        assert_eq!(err.to_string(), "HTTP Error 201: {}");
    }

    #[test]
    fn test_interpret_invalid_json() {
        let err = interpret_response(RawResponse::new(200, "<html>")).unwrap_err();
        assert!(err
            .to_string()
            .starts_with("Failed to connect to RAG service: Invalid JSON response:"));
    }

    #[test]
    fn test_interpret_malformed_sources() {
        let err = interpret_response(ok(json!({"sources": "none"}))).unwrap_err();
        assert_eq!(err.kind(), "transport");
        assert_eq!(
            err.to_string(),
            "Failed to connect to RAG service: Invalid JSON response: `sources` is not an array"
        );
    }

    #[test]
    fn test_interpret_relays_sources_verbatim() {
        let sources = json!([
            {"title": "T", "url": null, "similarity": 1},
            {"title": "U", "url": "http://x", "similarity": "0.9", "chunk": {"page": 2}},
            {"title": 5},
            "bare"
        ]);

        let answer = interpret_response(ok(json!({"answer": "42", "sources": sources.clone()})))
            .unwrap();
        assert_eq!(answer.sources.len(), 4);
        assert_eq!(answer.sources[1].similarity(), None);

        let body = serde_json::to_value(AskResponse::from(GatewayResult::Success(answer))).unwrap();
        assert_eq!(body["sources"], sources);
        assert_eq!(body["sources"].to_string(), sources.to_string());
    }
}
