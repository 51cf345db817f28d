//! Configuration management for medask.
//!
//! Configuration is merged from three sources, later ones winning:
//! built-in defaults, an optional YAML config file (`.medask/config.yaml`
//! or `--config`), and environment variables / CLI flags.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{AppError, AppResult};

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory holding record tables (*.csv)
    pub records_dir: PathBuf,

    /// Directory holding documents (*.pdf, *.txt, *.md)
    pub documents_dir: PathBuf,

    /// State directory; passage indexes live under `<state_dir>/index`
    pub state_dir: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Embedding provider name ("ollama" or "mock")
    pub embed_provider: String,

    /// Embedding model identifier
    pub embed_model: String,

    /// Embedding vector dimensions
    pub embed_dimensions: usize,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// Full configuration file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFile {
    storage: Option<StorageConfig>,
    embedding: Option<EmbeddingFileConfig>,
    logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StorageConfig {
    records_dir: Option<String>,
    documents_dir: Option<String>,
    state_dir: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct EmbeddingFileConfig {
    provider: Option<String>,
    model: Option<String>,
    dimensions: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            records_dir: PathBuf::from("records"),
            documents_dir: PathBuf::from("documents"),
            state_dir: PathBuf::from(".medask"),
            config_file: None,
            embed_provider: "ollama".to_string(), // Local-first default
            embed_model: "nomic-embed-text".to_string(),
            embed_dimensions: 768,
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from the config file and environment variables.
    ///
    /// Environment variables:
    /// - `MEDASK_RECORDS_DIR`: Override record table directory
    /// - `MEDASK_DOCUMENTS_DIR`: Override document directory
    /// - `MEDASK_STATE_DIR`: Override state directory
    /// - `MEDASK_CONFIG`: Path to config file
    /// - `MEDASK_EMBED_PROVIDER`: Embedding provider
    /// - `MEDASK_EMBED_MODEL`: Embedding model
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(config_file) = std::env::var("MEDASK_CONFIG") {
            config.config_file = Some(PathBuf::from(config_file));
        }

        // Load from YAML config file if it exists
        let config_path = if let Some(ref cf) = config.config_file {
            cf.clone()
        } else {
            config.state_dir.join("config.yaml")
        };

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        }

        // Environment variables override YAML config
        if let Ok(dir) = std::env::var("MEDASK_RECORDS_DIR") {
            config.records_dir = PathBuf::from(dir);
        }

        if let Ok(dir) = std::env::var("MEDASK_DOCUMENTS_DIR") {
            config.documents_dir = PathBuf::from(dir);
        }

        if let Ok(dir) = std::env::var("MEDASK_STATE_DIR") {
            config.state_dir = PathBuf::from(dir);
        }

        if let Ok(provider) = std::env::var("MEDASK_EMBED_PROVIDER") {
            config.embed_provider = provider;
        }

        if let Ok(model) = std::env::var("MEDASK_EMBED_MODEL") {
            config.embed_model = model;
        }

        config.log_level = std::env::var("RUST_LOG").ok().or(config.log_level);

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        tracing::debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }

    /// Merge YAML configuration file into this config.
    fn merge_yaml(&mut self, path: &PathBuf) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(storage) = config_file.storage {
            if let Some(dir) = storage.records_dir {
                result.records_dir = PathBuf::from(dir);
            }
            if let Some(dir) = storage.documents_dir {
                result.documents_dir = PathBuf::from(dir);
            }
            if let Some(dir) = storage.state_dir {
                result.state_dir = PathBuf::from(dir);
            }
        }

        if let Some(embedding) = config_file.embedding {
            if let Some(provider) = embedding.provider {
                result.embed_provider = provider;
            }
            if let Some(model) = embedding.model {
                result.embed_model = model;
            }
            if let Some(dimensions) = embedding.dimensions {
                result.embed_dimensions = dimensions;
            }
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// CLI flags take precedence over environment variables and the
    /// config file.
    pub fn with_overrides(
        mut self,
        records_dir: Option<PathBuf>,
        documents_dir: Option<PathBuf>,
        config_file: Option<PathBuf>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(records_dir) = records_dir {
            self.records_dir = records_dir;
        }

        if let Some(documents_dir) = documents_dir {
            self.documents_dir = documents_dir;
        }

        if let Some(config_file) = config_file {
            self.config_file = Some(config_file);
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Get the directory where passage indexes are stored.
    pub fn index_dir(&self) -> PathBuf {
        self.state_dir.join("index")
    }

    /// Ensure the state directory and index subdirectory exist.
    pub fn ensure_state_dir(&self) -> AppResult<()> {
        let index_dir = self.index_dir();
        if !index_dir.exists() {
            std::fs::create_dir_all(&index_dir).map_err(|e| {
                AppError::Config(format!("Failed to create state directory: {}", e))
            })?;
        }
        Ok(())
    }

    /// Validate configuration.
    pub fn validate(&self) -> AppResult<()> {
        let known_providers = ["ollama", "mock"];

        if !known_providers.contains(&self.embed_provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown embedding provider: {}. Supported: {}",
                self.embed_provider,
                known_providers.join(", ")
            )));
        }

        if self.embed_dimensions == 0 {
            return Err(AppError::Config(
                "Embedding dimensions must be non-zero".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.embed_provider, "ollama");
        assert_eq!(config.embed_model, "nomic-embed-text");
        assert_eq!(config.embed_dimensions, 768);
        assert!(!config.verbose);
        assert!(!config.no_color);
    }

    #[test]
    fn test_index_dir() {
        let config = AppConfig::default();
        assert!(config.index_dir().ends_with(".medask/index"));
    }

    #[test]
    fn test_with_overrides() {
        let config = AppConfig::default();
        let overridden = config.with_overrides(
            Some(PathBuf::from("/tmp/tables")),
            None,
            None,
            None,
            true,
            false,
        );

        assert_eq!(overridden.records_dir, PathBuf::from("/tmp/tables"));
        assert!(overridden.verbose);
        assert_eq!(overridden.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_merge_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "storage:\n  records_dir: data/tables\nembedding:\n  provider: mock\n  dimensions: 384\nlogging:\n  level: warn\n",
        )
        .unwrap();

        let mut config = AppConfig::default();
        let merged = config.merge_yaml(&path).unwrap();

        assert_eq!(merged.records_dir, PathBuf::from("data/tables"));
        assert_eq!(merged.embed_provider, "mock");
        assert_eq!(merged.embed_dimensions, 384);
        assert_eq!(merged.log_level, Some("warn".to_string()));
    }

    #[test]
    fn test_validate_unknown_provider() {
        let mut config = AppConfig::default();
        config.embed_provider = "unknown".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_defaults() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }
}
