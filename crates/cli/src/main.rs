//! Medask CLI
//!
//! Main entry point for the medask command-line tool. Answers natural
//! language questions about health program data from local record tables
//! and documents.

mod commands;

use clap::{Parser, Subcommand};
use commands::{AskCommand, IndexCommand, SourcesCommand};
use medask_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;

/// Medask - question answering over health program records and documents
#[derive(Parser, Debug)]
#[command(name = "medask")]
#[command(about = "Question answering over health program records and documents", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory holding record tables (default: records)
    #[arg(long, global = true, env = "MEDASK_RECORDS_DIR")]
    records_dir: Option<PathBuf>,

    /// Directory holding documents (default: documents)
    #[arg(long, global = true, env = "MEDASK_DOCUMENTS_DIR")]
    documents_dir: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "MEDASK_CONFIG")]
    config: Option<PathBuf>,

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
    /// Ask a question against the available tables and documents
    Ask(AskCommand),

    /// Build passage indexes for documents ahead of time
    Index(IndexCommand),

    /// List the available tables and documents
    Sources(SourcesCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    let cli = Cli::parse();

    let config = AppConfig::load()?;
    let config = config.with_overrides(
        cli.records_dir,
        cli.documents_dir,
        cli.config,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::info!("Medask CLI starting");
    tracing::debug!("Records dir: {:?}", config.records_dir);
    tracing::debug!("Documents dir: {:?}", config.documents_dir);
    tracing::debug!("Embedding provider: {}", config.embed_provider);

    config.ensure_state_dir()?;

    let command_name = match &cli.command {
        Commands::Ask(_) => "ask",
        Commands::Index(_) => "index",
        Commands::Sources(_) => "sources",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let result = match cli.command {
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Index(cmd) => cmd.execute(&config).await,
        Commands::Sources(cmd) => cmd.execute(&config).await,
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
