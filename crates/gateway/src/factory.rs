//! Gateway handler factory.
//!
//! Wires a [`GatewayHandler`] to its production collaborators: the YAML
//! settings store and the reqwest transport.

use crate::handler::GatewayHandler;
use crate::providers::HttpTransport;
use ragassist_core::{AppResult, FileSettings};
use std::path::Path;
use std::sync::Arc;

/// Create a handler reading its settings from the YAML file at `settings_file`.
///
/// The file is not opened here. It is read on every request, so a missing
/// file surfaces as a per-request failure rather than a startup error.
pub fn create_handler(settings_file: &Path) -> AppResult<GatewayHandler> {
    if !settings_file.exists() {
        tracing::warn!(
            "Settings file {:?} does not exist yet; requests will fail until it is created",
            settings_file
        );
    }

    let settings = Arc::new(FileSettings::new(settings_file));
    let transport = Arc::new(HttpTransport::new()?);

    Ok(GatewayHandler::new(settings, transport))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::DEFAULT_TIMEOUT;
    use crate::types::AskRequest;
    use ragassist_core::Scope;

    #[test]
    fn test_create_handler_uses_default_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let handler = create_handler(&dir.path().join("settings.yaml")).unwrap();
        assert_eq!(handler.timeout(), DEFAULT_TIMEOUT);
    }

    #[tokio::test]
    async fn test_missing_settings_file_is_a_failure_result() {
        let dir = tempfile::tempdir().unwrap();
        let handler = create_handler(&dir.path().join("settings.yaml")).unwrap();

        let result = handler
            .handle(&AskRequest::new("hello"), &Scope::Default)
            .await;
        let message = result.message().unwrap();
        assert!(message.starts_with("Error: Settings error:"), "{message}");
    }

    #[tokio::test]
    async fn test_disabled_in_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.yaml");
        std::fs::write(
            &path,
            "default:\n  rag_assistant/general/enabled: \"0\"\n  rag_assistant/general/rag_service_url: http://127.0.0.1:9\n",
        )
        .unwrap();

        let result = create_handler(&path)
            .unwrap()
            .handle(&AskRequest::new("hello"), &Scope::Default)
            .await;
        assert_eq!(
            result.message(),
            Some("RAG Assistant is currently disabled. Please contact the administrator.")
        );
    }
}
