//! Tabular side of medask.
//!
//! Loads health program record tables from CSV storage and answers
//! structured questions against them with an ordered set of lexical
//! patterns. No embeddings are involved on this side.

pub mod loader;
pub mod matcher;
pub mod types;

// Re-export commonly used items
pub use loader::load_table;
pub use matcher::match_table;
pub use types::{Column, RecordRow, RecordTable};
