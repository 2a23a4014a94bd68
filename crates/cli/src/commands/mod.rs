//! Command handlers for the RAG Assistant CLI.

pub mod ask;
pub mod serve;

// Re-export command types for convenience
pub use ask::AskCommand;
pub use serve::ServeCommand;
