//! Index command handler.
//!
//! Builds passage indexes ahead of time so the first semantic query does
//! not pay the embedding cost.

use clap::Args;
use medask_core::{config::AppConfig, AppError, AppResult};
use medask_router::Assistant;

/// Build passage indexes for documents
#[derive(Args, Debug)]
pub struct IndexCommand {
    /// Document name (file stem) to index; all documents when omitted
    pub name: Option<String>,

    /// Delete an existing index first and build it again
    #[arg(long)]
    pub rebuild: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl IndexCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing index command");

        let assistant = Assistant::new(config)?;
        let catalog = assistant.catalog();

        let selected: Vec<_> = catalog
            .documents
            .iter()
            .filter(|doc| match &self.name {
                Some(name) => doc
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .is_some_and(|stem| stem == name),
                None => true,
            })
            .collect();

        if selected.is_empty() {
            return Err(AppError::Config(match &self.name {
                Some(name) => format!("No document named '{}' found", name),
                None => "No documents found to index".to_string(),
            }));
        }

        let store = assistant.store();
        let mut indexed = Vec::new();

        for document in selected {
            if self.rebuild {
                let db_path = store.index_path(document);
                if db_path.exists() {
                    std::fs::remove_file(&db_path).map_err(|e| {
                        AppError::Documents(format!("Failed to remove old index: {}", e))
                    })?;
                    tracing::info!("Removed existing index for {}", document.display());
                }
            }

            store.ensure_index(document).await?;
            let passages = store.indexed_passages(document)?.unwrap_or(0);
            indexed.push((document.clone(), passages));
        }

        if self.json {
            let output = serde_json::json!({
                "indexed": indexed
                    .iter()
                    .map(|(doc, passages)| serde_json::json!({
                        "document": doc.file_name().and_then(|n| n.to_str()),
                        "passages": passages,
                    }))
                    .collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            for (doc, passages) in &indexed {
                println!(
                    "{}: {} passages",
                    doc.file_name().and_then(|n| n.to_str()).unwrap_or("?"),
                    passages
                );
            }
        }

        Ok(())
    }
}
