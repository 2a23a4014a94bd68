//! RAG service gateway for the RAG Assistant.
//!
//! This crate forwards a caller's question to an external question-answering
//! service and normalizes its reply. The [`GatewayHandler`] is the whole
//! pipeline: feature-flag gating, settings resolution, outbound request
//! construction, response interpretation and error classification.
//!
//! Both collaborators are injected as traits:
//! - [`ragassist_core::ConfigReader`] for the scoped settings store
//! - [`Transport`] for the outbound HTTP call
//!
//! # Example
//! ```no_run
//! use ragassist_core::Scope;
//! use ragassist_gateway::{create_handler, AskRequest, GatewayResult};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let handler = create_handler(Path::new("rag_assistant.yaml"))?;
//! let request = AskRequest::new("What is the return policy?");
//! match handler.handle(&request, &Scope::Default).await {
//!     GatewayResult::Success(answer) => println!("{}", answer.answer),
//!     GatewayResult::Failure { message } => eprintln!("{}", message),
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod factory;
pub mod handler;
pub mod providers;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export main types
pub use client::{OutboundRequest, RawResponse, Transport, TransportError};
pub use error::GatewayError;
pub use factory::create_handler;
pub use handler::{query_endpoint, GatewayHandler, DEFAULT_TIMEOUT};
pub use providers::HttpTransport;
pub use types::{Answer, AskRequest, AskResponse, GatewayResult, QueryRequest, SourceRecord};
