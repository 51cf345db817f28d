//! Ask command handler.

use clap::Args;
use medask_core::{config::AppConfig, AppResult};
use medask_router::{classify, Assistant};

/// Ask a question against the available tables and documents
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    #[arg(required = true)]
    pub question: Vec<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let question = self.question.join(" ");
        tracing::info!("Executing ask command");
        tracing::debug!("Question: {}", question);

        let assistant = Assistant::new(config)?;
        let answer = assistant.handle_task(&question).await;

        if self.json {
            let output = serde_json::json!({
                "question": question,
                "intent": format!("{:?}", classify(&question)),
                "answer": answer,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("{}", answer);
        }

        Ok(())
    }
}
