//! RAG Assistant Core Library
//!
//! This crate provides the foundational utilities for the RAG Assistant gateway:
//! - Error handling (`AppError`, `AppResult`)
//! - Logging infrastructure
//! - Process configuration (`AppConfig`)
//! - The scoped settings store read by the gateway on every request

pub mod config;
pub mod error;
pub mod logging;
pub mod settings;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use settings::{ConfigReader, FileSettings, MemorySettings, Scope, SettingValue};
