//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::{ChatRequest, Completion, ExtractionRecord};
use std::future::Future;

/// Trait for converting text to token ids and back
///
/// Implemented by the extractor layer (qaforge-extractor, over `tokenizers`)
pub trait TokenCodec {
    /// Error type for codec operations
    type Error;

    /// Encode text into token ids, without special tokens
    fn encode(&self, text: &str) -> Result<Vec<u32>, Self::Error>;

    /// Decode token ids back into text
    fn decode(&self, ids: &[u32]) -> Result<String, Self::Error>;
}

/// Trait for chat-completion model endpoints
///
/// Implemented by the infrastructure layer (qaforge-llm)
pub trait CompletionProvider {
    /// Error type for provider operations
    type Error;

    /// Send one request and return the first choice
    fn complete(
        &self,
        request: &ChatRequest,
    ) -> impl Future<Output = Result<Completion, Self::Error>> + Send;
}

/// Trait for durable, append-only record storage
///
/// Implemented by the infrastructure layer (qaforge-store)
pub trait RecordSink {
    /// Error type for sink operations
    type Error;

    /// Append one record; it must be durable when this returns `Ok`
    fn append(&mut self, record: &ExtractionRecord) -> Result<(), Self::Error>;
}
