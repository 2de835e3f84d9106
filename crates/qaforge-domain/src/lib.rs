//! QAForge Domain Layer
//!
//! This crate contains the value types and trait seams shared by every other
//! QAForge crate. It carries no I/O of its own: documents arrive already read,
//! records leave through a [`traits::RecordSink`], and model calls go through a
//! [`traits::CompletionProvider`].
//!
//! ## Key Concepts
//!
//! - **Document**: the full text of one source file plus its content hash
//! - **Segment**: a bounded, overlapping slice of a document sent to the model
//! - **QaPair**: one instruction/input/output triple returned by the model
//! - **ExtractionRecord**: a QaPair joined with provenance, one JSONL line
//! - **MetadataEntry**: per-document provenance loaded before a run
//!
//! ## Architecture
//!
//! - Minimal dependencies (identifiers, timestamps, serde)
//! - Infrastructure implementations live in other crates
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod chat;
pub mod document;
pub mod metadata;
pub mod provenance;
pub mod record;
pub mod traits;

// Re-exports for convenience
pub use chat::{ChatMessage, ChatRequest, Completion};
pub use document::{Document, Segment};
pub use metadata::MetadataEntry;
pub use provenance::{Provenance, UNKNOWN};
pub use record::{ExtractionRecord, QaPair, RecordId};
