//! QAForge LLM Provider Layer
//!
//! Implementations of the `CompletionProvider` trait from `qaforge-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `ChatCompletionsProvider`: OpenAI-compatible `/v1/chat/completions` endpoint
//!   (LM Studio, llama.cpp server, vLLM, ...)
//!
//! # Examples
//!
//! ```
//! use qaforge_domain::traits::CompletionProvider;
//! use qaforge_domain::{ChatMessage, ChatRequest};
//! use qaforge_llm::MockProvider;
//!
//! # tokio_test::block_on(async {
//! let provider = MockProvider::new("Hello from LLM!");
//! let request = ChatRequest {
//!     model: "m".into(),
//!     temperature: 0.0,
//!     max_tokens: 16,
//!     stream: false,
//!     messages: vec![ChatMessage::user("hi")],
//! };
//! let completion = provider.complete(&request).await.unwrap();
//! assert_eq!(completion.content, "Hello from LLM!");
//! # });
//! ```

#![warn(missing_docs)]

pub mod chat_completions;

use qaforge_domain::traits::CompletionProvider;
use qaforge_domain::{ChatRequest, Completion};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use thiserror::Error;

pub use chat_completions::ChatCompletionsProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// The request did not complete within the configured timeout
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Endpoint answered with a non-2xx status
    #[error("HTTP {status}: {body}")]
    Status {
        /// Status code
        status: u16,
        /// Response body, possibly truncated
        body: String,
    },

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

const ERROR_MARKER: &str = "ERROR";

/// Mock LLM provider for deterministic testing
///
/// Responses are keyed by the request's `user` content (the segment text).
/// Unknown content gets the default response.
///
/// # Examples
///
/// ```
/// use qaforge_llm::MockProvider;
///
/// let mut provider = MockProvider::default();
/// provider.add_response("segment one", r#"{"qa_pairs": []}"#);
/// provider.add_error("segment two");
/// assert_eq!(provider.call_count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    responses: Arc<Mutex<HashMap<String, String>>>,
    requests: Arc<Mutex<Vec<ChatRequest>>>,
    delay: Option<Duration>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all segments
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            responses: Arc::new(Mutex::new(HashMap::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            delay: None,
        }
    }

    /// Sleep before answering (for exercising timeouts)
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Add a specific response for a given segment text
    pub fn add_response(&mut self, content: impl Into<String>, response: impl Into<String>) {
        lock(&self.responses).insert(content.into(), response.into());
    }

    /// Configure to return an error for a specific segment text
    pub fn add_error(&mut self, content: impl Into<String>) {
        lock(&self.responses).insert(content.into(), ERROR_MARKER.to_string());
    }

    /// Get the number of times complete was called
    pub fn call_count(&self) -> usize {
        lock(&self.requests).len()
    }

    /// All requests received so far, in order
    pub fn requests(&self) -> Vec<ChatRequest> {
        lock(&self.requests).clone()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl CompletionProvider for MockProvider {
    type Error = LlmError;

    async fn complete(&self, request: &ChatRequest) -> Result<Completion, LlmError> {
        lock(&self.requests).push(request.clone());

        let content = request.user_content().unwrap_or_default();
        let response = lock(&self.responses)
            .get(content)
            .cloned()
            .unwrap_or_else(|| self.default_response.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if response == ERROR_MARKER {
            return Err(LlmError::Other("Mock error".to_string()));
        }
        Ok(Completion::text(response))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use qaforge_domain::ChatMessage;

    fn request(content: &str) -> ChatRequest {
        ChatRequest {
            model: "test".to_string(),
            temperature: 0.0,
            max_tokens: 64,
            stream: false,
            messages: vec![ChatMessage::user(content)],
        }
    }

    #[tokio::test]
    async fn test_mock_provider_default() {
        let provider = MockProvider::new("Test response");
        let result = provider.complete(&request("any")).await.unwrap();
        assert_eq!(result.content, "Test response");
        assert!(result.usage.is_none());
    }

    #[tokio::test]
    async fn test_mock_provider_specific_responses() {
        let mut provider = MockProvider::default();
        provider.add_response("hello", "world");
        provider.add_response("foo", "bar");

        assert_eq!(provider.complete(&request("hello")).await.unwrap().content, "world");
        assert_eq!(provider.complete(&request("foo")).await.unwrap().content, "bar");
        assert_eq!(
            provider.complete(&request("unknown")).await.unwrap().content,
            "Default mock response"
        );
    }

    #[tokio::test]
    async fn test_mock_provider_records_requests() {
        let provider = MockProvider::new("ok");
        assert_eq!(provider.call_count(), 0);

        provider.complete(&request("one")).await.unwrap();
        provider.complete(&request("two")).await.unwrap();

        assert_eq!(provider.call_count(), 2);
        let seen: Vec<_> = provider
            .requests()
            .iter()
            .map(|r| r.user_content().unwrap().to_string())
            .collect();
        assert_eq!(seen, vec!["one", "two"]);
    }

    #[tokio::test]
    async fn test_mock_provider_error() {
        let mut provider = MockProvider::default();
        provider.add_error("bad");

        let result = provider.complete(&request("bad")).await;
        assert!(matches!(result, Err(LlmError::Other(_))));
    }

    #[tokio::test]
    async fn test_mock_provider_clone_shares_state() {
        let provider1 = MockProvider::new("test");
        let provider2 = provider1.clone();

        provider1.complete(&request("x")).await.unwrap();

        assert_eq!(provider1.call_count(), 1);
        assert_eq!(provider2.call_count(), 1);
    }
}
