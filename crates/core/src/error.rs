//! Error types for the RAG Assistant gateway.
//!
//! This module defines the unified error enum for the ambient layers of the
//! application: configuration, the settings store, the HTTP server and
//! serialization.
//! Gateway outcomes have their own taxonomy in `ragassist-gateway`.

use thiserror::Error;

/// Unified error type for the RAG Assistant infrastructure.
///
/// Fallible functions return `Result<T, AppError>`. We never panic;
/// errors must be represented and propagated.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Settings store errors (unreadable or malformed settings)
    #[error("Settings error: {0}")]
    Settings(String),

    /// HTTP server errors
    #[error("Server error: {0}")]
    Server(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
