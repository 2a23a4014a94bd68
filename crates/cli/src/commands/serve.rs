//! Serve command handler.
//!
//! Runs the HTTP endpoint until Ctrl-C.

use crate::server::{build_router, AppState, ASK_PATH};
use clap::Args;
use ragassist_core::{config::AppConfig, AppError, AppResult, Scope};
use ragassist_gateway::create_handler;

/// Serve the ask endpoint over HTTP
#[derive(Args, Debug)]
pub struct ServeCommand {
    /// Listen address, overrides RAGASSIST_BIND and the config file (default: 127.0.0.1:8080)
    #[arg(short, long)]
    pub bind: Option<String>,
}

impl ServeCommand {
    /// Execute the serve command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing serve command");

        let config = config.clone().with_bind(self.bind.clone());
        config.validate()?;
        let addr = config.bind_addr()?;

        let handler = create_handler(&config.settings_file)?;
        let scope = Scope::from_store(config.store.as_deref());
        let app = build_router(AppState::new(handler, scope.clone()));

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| AppError::Server(format!("Failed to bind {}: {}", addr, e)))?;

        tracing::info!(
            addr = %addr,
            path = ASK_PATH,
            %scope,
            settings = ?config.settings_file,
            "RAG Assistant gateway listening"
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| AppError::Server(e.to_string()))?;

        tracing::info!("RAG Assistant gateway stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        // Without a signal the server runs until the process is killed.
        std::future::pending::<()>().await;
    }
}
