//! Chat-completion request and response shapes

use serde::{Deserialize, Serialize};

/// A single chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// `"system"`, `"user"` or `"assistant"`
    pub role: String,

    /// Message text
    pub content: String,
}

impl ChatMessage {
    /// A `user` message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    /// A `system` message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }
}

/// Request body for a chat-completions endpoint
///
/// Serializes to `{model, temperature, max_tokens, stream, messages}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Model identifier
    pub model: String,

    /// Sampling temperature, fixed for the run
    pub temperature: f32,

    /// Generation-length ceiling
    pub max_tokens: u32,

    /// Always false: responses are read whole
    pub stream: bool,

    /// Conversation; the segment is the only `user` content
    pub messages: Vec<ChatMessage>,
}

impl ChatRequest {
    /// Content of the last `user` message, if any
    pub fn user_content(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == "user")
            .map(|m| m.content.as_str())
    }
}

/// Raw completion returned by a provider
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    /// Text of the first choice
    pub content: String,

    /// Provider-reported token usage, passed through untouched
    pub usage: Option<serde_json::Value>,
}

impl Completion {
    /// A completion without usage information
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            usage: None,
        }
    }
}
