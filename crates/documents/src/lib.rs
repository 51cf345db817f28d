//! Document side of medask.
//!
//! Extracts plain text from stored documents and answers questions with
//! three strategies in order: printed-total extraction, indicator code
//! lookup, and semantic passage retrieval backed by a durable per-document
//! index.

pub mod embeddings;
pub mod extract;
pub mod index;
pub mod indicator;
pub mod matcher;
pub mod passage;
pub mod store;
pub mod totals;

// Re-export commonly used items
pub use embeddings::{create_provider, EmbeddingProvider};
pub use matcher::match_document;
pub use passage::DEFAULT_PASSAGE_SIZE;
pub use store::PassageStore;
