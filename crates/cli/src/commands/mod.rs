//! Command handlers for the medask CLI.

pub mod ask;
pub mod index;
pub mod sources;

// Re-export command types for convenience
pub use ask::AskCommand;
pub use index::IndexCommand;
pub use sources::SourcesCommand;
