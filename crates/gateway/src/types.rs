//! Gateway request, response and result types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Settings key of the feature flag.
pub const ENABLED_PATH: &str = "rag_assistant/general/enabled";

/// Settings key of the downstream service base URL.
pub const SERVICE_URL_PATH: &str = "rag_assistant/general/rag_service_url";

/// Provider used when the caller does not name one.
pub const DEFAULT_PROVIDER: &str = "gemini";

/// Answer text used when the downstream reply carries none.
pub const NO_ANSWER: &str = "No answer received";

/// Inbound parameters as submitted by the caller.
///
/// Both fields are optional on the wire; the handler applies the
/// question check and the provider default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AskRequest {
    /// The natural-language question
    #[serde(default)]
    pub question: Option<String>,

    /// Backend model/provider identifier, passed through unmodified
    #[serde(default)]
    pub provider: Option<String>,
}

impl AskRequest {
    /// Create a request for `question` with the default provider.
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: Some(question.into()),
            provider: None,
        }
    }

    /// Select the provider.
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Fill fields missing from `self` with the ones from `fallback`.
    pub fn or(self, fallback: AskRequest) -> Self {
        Self {
            question: self.question.or(fallback.question),
            provider: self.provider.or(fallback.provider),
        }
    }
}

/// Body of the outbound `POST {base}/query` call.
#[derive(Debug, Clone, Serialize)]
pub struct QueryRequest<'a> {
    pub question: &'a str,
    pub provider: &'a str,
}

/// One citation returned by the downstream service.
///
/// The record is kept as the JSON the service sent and serialized back
/// verbatim. The accessors are a read-only view for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceRecord(Value);

impl SourceRecord {
    pub fn title(&self) -> Option<&str> {
        self.0.get("title").and_then(Value::as_str)
    }

    pub fn url(&self) -> Option<&str> {
        self.0.get("url").and_then(Value::as_str)
    }

    /// Relevance in 0.0-1.0, when the service sent a number.
    pub fn similarity(&self) -> Option<f64> {
        self.0.get("similarity").and_then(Value::as_f64)
    }
}

impl From<Value> for SourceRecord {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// A normalized answer from the downstream service.
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    pub answer: String,
    pub sources: Vec<SourceRecord>,
    pub confidence: f64,
}

impl Default for Answer {
    fn default() -> Self {
        Self {
            answer: NO_ANSWER.to_string(),
            sources: Vec::new(),
            confidence: 0.0,
        }
    }
}

/// Outcome of one gateway invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayResult {
    Success(Answer),
    Failure { message: String },
}

impl GatewayResult {
    pub fn is_success(&self) -> bool {
        matches!(self, GatewayResult::Success(_))
    }

    /// The failure message, if this is a failure.
    pub fn message(&self) -> Option<&str> {
        match self {
            GatewayResult::Success(_) => None,
            GatewayResult::Failure { message } => Some(message),
        }
    }
}

/// JSON body returned to the web client.
///
/// ```text
/// Success: { "success": true, "response": ..., "sources": [...], "confidence": ... }
/// Failure: { "success": false, "message": ... }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AskResponse {
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<SourceRecord>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<GatewayResult> for AskResponse {
    fn from(result: GatewayResult) -> Self {
        match result {
            GatewayResult::Success(answer) => Self {
                success: true,
                response: Some(answer.answer),
                sources: Some(answer.sources),
                confidence: Some(answer.confidence),
                message: None,
            },
            GatewayResult::Failure { message } => Self {
                success: false,
                response: None,
                sources: None,
                confidence: None,
                message: Some(message),
            },
        }
    }
}
