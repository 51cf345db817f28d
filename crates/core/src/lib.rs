//! Medask Core Library
//!
//! Foundational utilities shared by the medask crates:
//! - Error handling (`AppError`, `AppResult`)
//! - The tagged matcher outcome type (`Answer`)
//! - Logging infrastructure
//! - Configuration management

pub mod answer;
pub mod config;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use answer::Answer;
pub use config::AppConfig;
pub use error::{AppError, AppResult};
