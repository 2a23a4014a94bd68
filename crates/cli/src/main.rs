//! RAG Assistant CLI
//!
//! Main entry point for the `ragassist` command-line tool.
//! Serves the ask endpoint that forwards questions to the RAG service,
//! or asks a single question from the terminal.

mod commands;
mod server;

use clap::{Parser, Subcommand};
use commands::{AskCommand, ServeCommand};
use ragassist_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;

/// RAG Assistant - forwards questions to a retrieval-augmented answering service
#[derive(Parser, Debug)]
#[command(name = "ragassist")]
#[command(about = "Question gateway for a RAG answering service", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the settings store (default: rag_assistant.yaml)
    #[arg(short, long, global = true, env = "RAGASSIST_SETTINGS")]
    settings: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "RAGASSIST_CONFIG")]
    config: Option<PathBuf>,

    /// Store code whose settings apply (default scope when unset)
    #[arg(long, global = true, env = "RAGASSIST_STORE")]
    store: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the ask endpoint over HTTP
    Serve(ServeCommand),

    /// Ask a single question
    Ask(AskCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Load base configuration from the config file and environment
    let config = AppConfig::load_from(cli.config)?;

    // Apply CLI overrides
    let config = config.with_overrides(
        cli.settings,
        cli.store,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    // Initialize logging with final configuration
    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::info!("RAG Assistant starting");
    tracing::debug!("Settings: {:?}", config.settings_file);
    tracing::debug!("Store: {:?}", config.store);

    let command_name = match &cli.command {
        Commands::Serve(_) => "serve",
        Commands::Ask(_) => "ask",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    // Route to command handlers
    let result = match cli.command {
        Commands::Serve(cmd) => cmd.execute(&config).await,
        Commands::Ask(cmd) => cmd.execute(&config).await,
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_ask() {
        let cli = Cli::try_parse_from([
            "ragassist",
            "--store",
            "french",
            "ask",
            "Where is my order?",
            "--provider",
            "openai",
            "--timeout",
            "5",
        ])
        .unwrap();

        assert_eq!(cli.store.as_deref(), Some("french"));
        match cli.command {
            Commands::Ask(cmd) => {
                assert_eq!(cmd.question, "Where is my order?");
                assert_eq!(cmd.provider.as_deref(), Some("openai"));
                assert_eq!(cmd.timeout, 5);
                assert!(!cmd.json);
            }
            other => panic!("expected ask, got {other:?}"),
        }
    }

    #[test]
    fn test_bind_flag_has_no_env_fallback() {
        // RAGASSIST_BIND is read once, by AppConfig.
        let command = Cli::command();
        let serve = command
            .find_subcommand("serve")
            .expect("serve subcommand");
        let bind = serve
            .get_arguments()
            .find(|arg| arg.get_id() == "bind")
            .expect("bind argument");
        assert!(bind.get_env().is_none());
    }

    #[test]
    fn test_parse_serve() {
        let cli = Cli::try_parse_from(["ragassist", "serve", "--bind", "0.0.0.0:9000"]).unwrap();
        match cli.command {
            Commands::Serve(cmd) => assert_eq!(cmd.bind.as_deref(), Some("0.0.0.0:9000")),
            other => panic!("expected serve, got {other:?}"),
        }
    }
}
