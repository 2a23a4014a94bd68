//! Gateway failure taxonomy.
//!
//! Every variant renders as the user-visible message returned to the caller
//! in `GatewayResult::Failure`.

use crate::client::TransportError;
use ragassist_core::AppError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    /// The feature flag is off for the scope
    #[error("RAG Assistant is currently disabled. Please contact the administrator.")]
    Disabled,

    /// Empty or whitespace-only question
    #[error("Question is required")]
    MissingQuestion,

    /// No downstream base URL configured for the scope
    #[error("RAG Service URL is not configured. Please configure it in Admin > Stores > Configuration > RAG Assistant.")]
    NotConfigured,

    /// Network, timeout or TLS failure, or an unreadable reply
    #[error("Failed to connect to RAG service: {0}")]
    Transport(String),

    /// Downstream answered with a status other than 200
    #[error("HTTP Error {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// Anything else
    #[error("Error: {0}")]
    Unexpected(String),
}

impl GatewayError {
    /// Short label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::Disabled => "disabled",
            GatewayError::MissingQuestion => "missing_question",
            GatewayError::NotConfigured => "not_configured",
            GatewayError::Transport(_) => "transport",
            GatewayError::HttpStatus { .. } => "http_status",
            GatewayError::Unexpected(_) => "unexpected",
        }
    }
}

impl From<TransportError> for GatewayError {
    fn from(err: TransportError) -> Self {
        GatewayError::Transport(err.to_string())
    }
}

impl From<AppError> for GatewayError {
    fn from(err: AppError) -> Self {
        GatewayError::Unexpected(err.to_string())
    }
}
