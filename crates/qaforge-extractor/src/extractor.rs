//! Extraction client: one model call per segment

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::parser::parse_qa_pairs;
use crate::prompt::build_request;
use crate::sanitize::strip_reasoning;
use qaforge_domain::traits::CompletionProvider;
use qaforge_domain::{QaPair, Segment};
use serde_json::Value;
use std::fmt::Display;
use tokio::time::timeout;
use tracing::{debug, warn};

/// How a segment's extraction ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentStatus {
    /// At least one valid pair
    Extracted,
    /// Model answered, but with nothing usable (empty text or zero valid pairs)
    Empty,
    /// Timeout, connection failure or non-success status
    Transport(String),
    /// No structured object, or one of the wrong shape
    Malformed(String),
}

impl SegmentStatus {
    /// Transport or malformed
    pub fn is_failure(&self) -> bool {
        matches!(self, SegmentStatus::Transport(_) | SegmentStatus::Malformed(_))
    }
}

/// Result of extracting one segment
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentOutcome {
    /// Valid pairs in response order
    pub pairs: Vec<QaPair>,
    /// Items rejected during parsing
    pub dropped: usize,
    /// How the call ended
    pub status: SegmentStatus,
    /// Raw `usage` object from the endpoint, if reported
    pub usage: Option<Value>,
}

impl SegmentOutcome {
    fn failed(status: SegmentStatus) -> Self {
        Self {
            pairs: Vec::new(),
            dropped: 0,
            status,
            usage: None,
        }
    }
}

/// Sends segments to a completion provider and parses the answers
///
/// Failures are returned as [`SegmentStatus`] values rather than errors, so
/// one bad segment never stops the caller. There is no retry.
pub struct Extractor<P> {
    provider: P,
    config: ExtractorConfig,
}

impl<P> Extractor<P>
where
    P: CompletionProvider,
    P::Error: Display,
{
    /// Create a new Extractor
    pub fn new(provider: P, config: ExtractorConfig) -> Self {
        Self { provider, config }
    }

    /// Configuration in use
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// The underlying provider
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Extract QA pairs from one segment
    pub async fn extract(&self, segment: &Segment) -> SegmentOutcome {
        let ordinal = segment.index + 1;
        let request = build_request(&segment.text, &self.config);

        debug!(
            "Requesting {} segment {} ({} tokens)",
            segment.document, ordinal, segment.token_count
        );

        let completion = match timeout(
            self.config.request_timeout(),
            self.provider.complete(&request),
        )
        .await
        {
            Ok(Ok(completion)) => completion,
            Ok(Err(e)) => {
                let error = ExtractorError::Llm(e.to_string());
                warn!("{} segment {}: {}", segment.document, ordinal, error);
                return SegmentOutcome::failed(SegmentStatus::Transport(error.to_string()));
            }
            Err(_) => {
                let error = ExtractorError::Timeout;
                warn!(
                    "{} segment {}: {} after {:?}",
                    segment.document,
                    ordinal,
                    error,
                    self.config.request_timeout()
                );
                return SegmentOutcome::failed(SegmentStatus::Transport(error.to_string()));
            }
        };

        let usage = completion.usage;
        let sanitized = strip_reasoning(&completion.content);
        if sanitized.is_empty() {
            warn!("{} segment {}: empty model output", segment.document, ordinal);
            return SegmentOutcome {
                usage,
                ..SegmentOutcome::failed(SegmentStatus::Empty)
            };
        }

        match parse_qa_pairs(&sanitized) {
            Ok(parsed) => {
                let status = if parsed.pairs.is_empty() {
                    warn!("{} segment {}: no QA pairs received", segment.document, ordinal);
                    SegmentStatus::Empty
                } else {
                    debug!(
                        "{} segment {}: {} pairs, {} dropped",
                        segment.document,
                        ordinal,
                        parsed.pairs.len(),
                        parsed.dropped
                    );
                    SegmentStatus::Extracted
                };
                SegmentOutcome {
                    pairs: parsed.pairs,
                    dropped: parsed.dropped,
                    status,
                    usage,
                }
            }
            Err(e) => {
                warn!("{} segment {}: {}", segment.document, ordinal, e);
                SegmentOutcome {
                    usage,
                    ..SegmentOutcome::failed(SegmentStatus::Malformed(e.to_string()))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qaforge_llm::MockProvider;
    use std::time::Duration;

    fn segment(text: &str) -> Segment {
        Segment {
            document: "A".to_string(),
            index: 0,
            text: text.to_string(),
            token_count: 1,
        }
    }

    fn extractor(provider: MockProvider) -> Extractor<MockProvider> {
        Extractor::new(provider, ExtractorConfig::default())
    }

    #[tokio::test]
    async fn test_reasoning_block_is_discarded() {
        let provider = MockProvider::new(
            r#"<think>{"qa_pairs": [{"instruction": "leak", "output": "leak"}]}</think>{"qa_pairs": [{"instruction": "Q", "input": "", "output": "A"}]}"#,
        );
        let outcome = extractor(provider).extract(&segment("text")).await;

        assert_eq!(outcome.status, SegmentStatus::Extracted);
        assert_eq!(outcome.pairs.len(), 1);
        assert_eq!(outcome.pairs[0].instruction, "Q");
    }

    #[tokio::test]
    async fn test_empty_output_pair_dropped() {
        let provider = MockProvider::new(
            r#"{"qa_pairs": [{"instruction": "Q1", "input": "", "output": ""}, {"instruction": "Q2", "input": "", "output": "A2"}]}"#,
        );
        let outcome = extractor(provider).extract(&segment("text")).await;

        assert_eq!(outcome.pairs.len(), 1);
        assert_eq!(outcome.pairs[0].instruction, "Q2");
        assert_eq!(outcome.dropped, 1);
    }

    #[tokio::test]
    async fn test_provider_error_is_transport() {
        let mut provider = MockProvider::default();
        provider.add_error("text");
        let outcome = extractor(provider).extract(&segment("text")).await;

        assert!(matches!(outcome.status, SegmentStatus::Transport(_)));
        assert!(outcome.status.is_failure());
        assert!(outcome.pairs.is_empty());
    }

    #[tokio::test]
    async fn test_timeout_is_transport() {
        let provider = MockProvider::new(r#"{"qa_pairs": []}"#).with_delay(Duration::from_secs(30));
        let config = ExtractorConfig {
            request_timeout_secs: 1,
            ..ExtractorConfig::default()
        };
        let outcome = Extractor::new(provider, config).extract(&segment("text")).await;

        assert!(matches!(outcome.status, SegmentStatus::Transport(ref m) if m.contains("timeout")));
    }

    #[tokio::test]
    async fn test_no_object_is_malformed() {
        let provider = MockProvider::new("I could not find any questions.");
        let outcome = extractor(provider).extract(&segment("text")).await;
        assert!(matches!(outcome.status, SegmentStatus::Malformed(_)));
    }

    #[tokio::test]
    async fn test_unclosed_reasoning_is_empty() {
        let provider = MockProvider::new("<think>still thinking about {\"qa_pairs\"");
        let outcome = extractor(provider).extract(&segment("text")).await;
        assert_eq!(outcome.status, SegmentStatus::Empty);
        assert!(!outcome.status.is_failure());
    }

    #[tokio::test]
    async fn test_zero_pairs_is_empty() {
        let provider = MockProvider::new(r#"{"qa_pairs": []}"#);
        let outcome = extractor(provider).extract(&segment("text")).await;
        assert_eq!(outcome.status, SegmentStatus::Empty);
    }

    #[tokio::test]
    async fn test_segment_is_sole_user_content() {
        let provider = MockProvider::new(r#"{"qa_pairs": []}"#);
        let extractor = Extractor::new(
            provider.clone(),
            ExtractorConfig::default().with_builtin_prompt(),
        );
        extractor.extract(&segment("Line1\nLine2")).await;

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].user_content(), Some("Line1\nLine2"));
        assert_eq!(
            requests[0].messages.iter().filter(|m| m.role == "user").count(),
            1
        );
    }
}
