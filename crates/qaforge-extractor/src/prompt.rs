//! Request construction for QA extraction

use crate::config::ExtractorConfig;
use qaforge_domain::{ChatMessage, ChatRequest};

/// Built-in system instructions asking for a `qa_pairs` object
pub const QA_EXTRACTION_PROMPT: &str = r#"You turn passages of text into instruction-tuning examples.

Read the passage in the user message and write question/answer pairs that are
fully answerable from it. Reply with a single JSON object of this shape:

{
  "qa_pairs": [
    {
      "instruction": "a question about the passage",
      "input": "optional supporting context, or an empty string",
      "output": "the answer, taken from the passage"
    }
  ]
}

Rules:
- Every pair needs a non-empty instruction and output
- Answer in the language of the passage
- Do not invent facts that the passage does not state
- If the passage holds nothing worth asking about, return {"qa_pairs": []}

Return ONLY the JSON object, no markdown code blocks, no explanations."#;

/// Build the chat request for one segment
///
/// The segment text is sent as the sole user message, preceded by the
/// configured system prompt if there is one. Streaming is always off.
pub fn build_request(segment_text: &str, config: &ExtractorConfig) -> ChatRequest {
    let mut messages = Vec::with_capacity(2);
    if let Some(system) = config.system_prompt.as_deref().filter(|s| !s.trim().is_empty()) {
        messages.push(ChatMessage::system(system));
    }
    messages.push(ChatMessage::user(segment_text));

    ChatRequest {
        model: config.model.clone(),
        temperature: config.temperature,
        max_tokens: config.max_tokens,
        stream: false,
        messages,
    }
}
