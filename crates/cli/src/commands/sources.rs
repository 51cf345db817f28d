//! Sources command handler.
//!
//! Lists the tables and documents the router would consider right now.

use clap::Args;
use medask_core::{config::AppConfig, AppResult};
use medask_records::loader;
use medask_router::Assistant;

/// List the available tables and documents
#[derive(Args, Debug)]
pub struct SourcesCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl SourcesCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing sources command");

        let assistant = Assistant::new(config)?;
        let catalog = assistant.catalog();
        let store = assistant.store();

        let mut tables = Vec::new();
        for path in &catalog.tables {
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("?")
                .to_string();
            match loader::load_table(path) {
                Ok(table) => {
                    let mut columns: Vec<_> =
                        table.columns().iter().map(|c| c.as_str()).collect();
                    columns.sort();
                    tables.push((name, Some((table.len(), columns))));
                }
                Err(e) => {
                    tracing::warn!("Could not load {}: {}", path.display(), e);
                    tables.push((name, None));
                }
            }
        }

        let mut documents = Vec::new();
        for path in &catalog.documents {
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("?")
                .to_string();
            documents.push((name, store.indexed_passages(path)?));
        }

        if self.json {
            let output = serde_json::json!({
                "tables": tables
                    .iter()
                    .map(|(name, info)| serde_json::json!({
                        "name": name,
                        "rows": info.as_ref().map(|(rows, _)| rows),
                        "columns": info.as_ref().map(|(_, columns)| columns),
                    }))
                    .collect::<Vec<_>>(),
                "documents": documents
                    .iter()
                    .map(|(name, passages)| serde_json::json!({
                        "name": name,
                        "indexedPassages": passages,
                    }))
                    .collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
            return Ok(());
        }

        println!("Tables ({}):", tables.len());
        for (name, info) in &tables {
            match info {
                Some((rows, columns)) => {
                    println!("  {} - {} rows [{}]", name, rows, columns.join(", "))
                }
                None => println!("  {} - unreadable", name),
            }
        }

        println!("Documents ({}):", documents.len());
        for (name, passages) in &documents {
            match passages {
                Some(count) => println!("  {} - indexed ({} passages)", name, count),
                None => println!("  {} - not indexed", name),
            }
        }

        Ok(())
    }
}
