//! Ask command handler.
//!
//! Sends one question through the gateway and prints the answer.

use clap::Args;
use ragassist_core::{config::AppConfig, AppError, AppResult, Scope};
use ragassist_gateway::{create_handler, AskRequest, AskResponse, GatewayResult};
use std::time::Duration;

/// Ask the configured RAG service a question
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub question: String,

    /// Backend provider passed to the RAG service (default: gemini)
    #[arg(short, long)]
    pub provider: Option<String>,

    /// Downstream timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,

    /// Output the endpoint's JSON response instead of plain text
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");
        tracing::debug!("Ask command options: {:?}", self);

        let handler =
            create_handler(&config.settings_file)?.with_timeout(Duration::from_secs(self.timeout));

        let mut request = AskRequest::new(self.question.as_str());
        if let Some(ref provider) = self.provider {
            request = request.with_provider(provider.as_str());
        }

        let scope = Scope::from_store(config.store.as_deref());
        let result = handler.handle(&request, &scope).await;

        if self.json {
            let failed = !result.is_success();
            let response = AskResponse::from(result);
            println!("{}", serde_json::to_string_pretty(&response)?);
            if failed {
                return Err(AppError::Other(
                    response.message.unwrap_or_default(),
                ));
            }
            return Ok(());
        }

        match result {
            GatewayResult::Success(answer) => {
                println!("{}", answer.answer);

                if !answer.sources.is_empty() {
                    println!();
                    println!("Sources:");
                    for source in &answer.sources {
                        let title = source.title().unwrap_or("untitled");
                        let url = source.url().unwrap_or_default();
                        let similarity = source.similarity().unwrap_or(0.0);
                        println!("  - {} <{}> ({:.0}% match)", title, url, similarity * 100.0);
                    }
                }

                tracing::debug!("Confidence: {:.0}%", answer.confidence * 100.0);
                Ok(())
            }
            GatewayResult::Failure { message } => Err(AppError::Other(message)),
        }
    }
}
