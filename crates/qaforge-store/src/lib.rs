//! QAForge Storage Layer
//!
//! File-backed inputs and outputs of an extraction run.
//!
//! # Architecture
//!
//! - [`DocumentSource`]: discovers and reads plain-text documents, hashing each
//!   one with MD5 as it is read
//! - [`MetadataStore`]: read-only provenance lookup loaded from a JSONL file
//! - [`JsonlSink`]: append-only JSONL output, one record per line, flushed per record
//!
//! # Examples
//!
//! ```no_run
//! use qaforge_store::{DocumentSource, JsonlSink, MetadataStore};
//!
//! let source = DocumentSource::new("data/markdown", vec!["md".to_string()]).unwrap();
//! let metadata = MetadataStore::load_or_empty("data/markdown/metadata.jsonl").unwrap();
//! let sink = JsonlSink::open("data/generated/qa_pairs.jsonl").unwrap();
//! # let _ = (source, metadata, sink);
//! ```

#![warn(missing_docs)]

pub mod documents;
pub mod metadata;
pub mod sink;

use std::path::PathBuf;
use thiserror::Error;

pub use documents::{md5_hex, DocumentSource};
pub use metadata::{entry_for_document, write_metadata_file, MetadataStore};
pub use sink::JsonlSink;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Invalid or missing configuration (fatal at startup)
    #[error("Configuration error: {0}")]
    Config(String),

    /// A document could not be read (the document is skipped)
    #[error("Failed to read {path}: {reason}")]
    Read {
        /// Offending path
        path: PathBuf,
        /// Underlying cause
        reason: String,
    },

    /// Malformed metadata line
    #[error("Invalid metadata at line {line}: {reason}")]
    InvalidMetadata {
        /// 1-based line number
        line: usize,
        /// Underlying cause
        reason: String,
    },

    /// I/O error on the output side
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
