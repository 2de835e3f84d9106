//! Error types for the Extractor

use qaforge_store::StoreError;
use thiserror::Error;

/// Errors that can occur during extraction
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Configuration error (fatal at startup)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Tokenizer could not be loaded or failed on a text
    #[error("Tokenizer error: {0}")]
    Tokenizer(String),

    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Extraction timeout
    #[error("Extraction timeout")]
    Timeout,

    /// No structured object in the model response, or the wrong shape
    #[error("Invalid response format: {0}")]
    InvalidFormat(String),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(String),

    /// Document, metadata or output storage error
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// The record writer went away mid-run
    #[error("Output sink error: {0}")]
    Sink(String),

    /// A document worker panicked or was cancelled
    #[error("Worker task failed: {0}")]
    Task(String),
}

impl From<serde_json::Error> for ExtractorError {
    fn from(e: serde_json::Error) -> Self {
        ExtractorError::JsonParse(e.to_string())
    }
}
