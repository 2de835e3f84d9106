//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Extraction or pipeline error
    #[error(transparent)]
    Extractor(#[from] qaforge_extractor::ExtractorError),

    /// Document, metadata or output error
    #[error(transparent)]
    Store(#[from] qaforge_store::StoreError),

    /// Model endpoint error
    #[error(transparent)]
    Llm(#[from] qaforge_llm::LlmError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}
