//! Error types for medask.
//!
//! This module defines a unified error enum covering all internal error
//! categories: configuration, I/O, record storage, document storage,
//! embedding backends, and serialization.

use thiserror::Error;

/// Unified error type for medask.
///
/// Internal collaborators return `Result<T, AppError>`. Matcher-level
/// outcomes (match / no-match / missing source) are not errors and are
/// carried by [`crate::answer::Answer`] instead.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Record table storage and parsing errors
    #[error("Records error: {0}")]
    Records(String),

    /// Document storage, extraction, and passage index errors
    #[error("Documents error: {0}")]
    Documents(String),

    /// Embedding backend errors
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
