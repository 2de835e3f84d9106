//! OpenAI-compatible chat-completions provider
//!
//! Talks to any server exposing `POST /v1/chat/completions` with a
//! non-streaming response, such as LM Studio or a llama.cpp server.
//!
//! # Features
//!
//! - Async HTTP communication via `reqwest`
//! - Configurable endpoint URL and request timeout
//! - Timeouts, connection failures and non-2xx statuses surface as
//!   distinct `LlmError` variants so callers can classify them
//!
//! No retries are attempted: a failed call is reported once and the caller
//! decides what to do with the segment.
//!
//! # Examples
//!
//! ```no_run
//! use qaforge_llm::ChatCompletionsProvider;
//! use std::time::Duration;
//!
//! let provider = ChatCompletionsProvider::new(
//!     "http://localhost:1234/v1/chat/completions",
//!     Duration::from_secs(120),
//! ).unwrap();
//! ```

use crate::LlmError;
use qaforge_domain::traits::CompletionProvider;
use qaforge_domain::{ChatRequest, Completion};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Default LM Studio endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:1234/v1/chat/completions";

/// Default timeout for LLM requests (120 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Longest error body kept in `LlmError::Status`
const MAX_ERROR_BODY: usize = 512;

/// Chat-completions provider over HTTP
#[derive(Debug, Clone)]
pub struct ChatCompletionsProvider {
    endpoint: String,
    timeout: Duration,
    client: reqwest::Client,
}

/// Response from the chat-completions API
#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatCompletionsProvider {
    /// Create a new provider
    ///
    /// # Parameters
    ///
    /// - `endpoint`: full URL of the chat-completions route
    /// - `timeout`: upper bound for one request, connect through body
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into(),
            timeout,
            client,
        })
    }

    /// Create a provider for the local LM Studio default endpoint
    pub fn default_endpoint() -> Result<Self, LlmError> {
        Self::new(DEFAULT_ENDPOINT, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Endpoint URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send one chat request
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The request does not complete within the timeout
    /// - The server is unreachable
    /// - The status is not 2xx (404 maps to `ModelNotAvailable`)
    /// - The body is not a chat-completions response
    pub async fn send(&self, request: &ChatRequest) -> Result<Completion, LlmError> {
        debug!(
            "POST {} (model {}, {} messages)",
            self.endpoint,
            request.model,
            request.messages.len()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LlmError::ModelNotAvailable(request.model.clone()));
        }
        if !status.is_success() {
            let mut body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            if body.len() > MAX_ERROR_BODY {
                let cut = (0..=MAX_ERROR_BODY)
                    .rev()
                    .find(|&i| body.is_char_boundary(i))
                    .unwrap_or(0);
                body.truncate(cut);
            }
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| match self.transport_error(e) {
                LlmError::Communication(msg) => {
                    LlmError::InvalidResponse(format!("Failed to parse response: {}", msg))
                }
                other => other,
            })?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::InvalidResponse("Response has no choices".to_string()))?;

        Ok(Completion {
            content: choice.message.content.unwrap_or_default(),
            usage: parsed.usage,
        })
    }

    fn transport_error(&self, e: reqwest::Error) -> LlmError {
        if e.is_timeout() {
            LlmError::Timeout(self.timeout)
        } else {
            LlmError::Communication(format!("Request failed: {}", e))
        }
    }
}

impl CompletionProvider for ChatCompletionsProvider {
    type Error = LlmError;

    async fn complete(&self, request: &ChatRequest) -> Result<Completion, LlmError> {
        self.send(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_creation() {
        let provider =
            ChatCompletionsProvider::new("http://localhost:1234/v1/chat/completions", Duration::from_secs(5))
                .unwrap();
        assert_eq!(provider.endpoint(), "http://localhost:1234/v1/chat/completions");
        assert_eq!(provider.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_provider_default_endpoint() {
        let provider = ChatCompletionsProvider::default_endpoint().unwrap();
        assert_eq!(provider.endpoint(), DEFAULT_ENDPOINT);
        assert_eq!(provider.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_response_parsing_tolerates_missing_usage() {
        let parsed: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"role":"assistant","content":"hi"}}]}"#)
                .unwrap();
        assert!(parsed.usage.is_none());
        assert_eq!(parsed.choices[0].message.content.as_deref(), Some("hi"));
    }

    #[tokio::test]
    async fn test_connection_refused_is_communication_error() {
        // Port 9 (discard) is essentially never listening on test hosts
        let provider =
            ChatCompletionsProvider::new("http://127.0.0.1:9/v1/chat/completions", Duration::from_secs(2))
                .unwrap();
        let request = ChatRequest {
            model: "m".to_string(),
            temperature: 0.0,
            max_tokens: 8,
            stream: false,
            messages: vec![qaforge_domain::ChatMessage::user("x")],
        };

        let result = provider.send(&request).await;
        assert!(matches!(
            result,
            Err(LlmError::Communication(_)) | Err(LlmError::Timeout(_))
        ));
    }
}
