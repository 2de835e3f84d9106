//! Configuration for segmentation, extraction and the pipeline driver
//!
//! Each component receives its own value object at construction; nothing is
//! read from process-wide state.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// How documents are split into segments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentMode {
    /// Whole lines accumulated up to `max_chars` characters, no overlap
    #[default]
    Lines,
    /// Sliding token window of `window` tokens advancing by `stride`
    Tokens,
}

/// Configuration for the Segmenter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmenterConfig {
    /// Segmentation mode
    pub mode: SegmentMode,

    /// Window size in tokens (token mode)
    pub window: usize,

    /// Step between window starts in tokens (token mode)
    pub stride: usize,

    /// Maximum segment length in characters (line mode)
    pub max_chars: usize,

    /// Path to a `tokenizer.json` (required for token mode)
    pub tokenizer_path: Option<PathBuf>,
}

impl SegmenterConfig {
    /// Tokens shared by consecutive windows
    pub fn overlap(&self) -> usize {
        self.window.saturating_sub(self.stride)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        self.validate_bounds()?;
        if self.mode == SegmentMode::Tokens && self.tokenizer_path.is_none() {
            return Err("token mode requires tokenizer_path".to_string());
        }
        Ok(())
    }

    /// Validate window, stride and length bounds only
    pub fn validate_bounds(&self) -> Result<(), String> {
        if self.window == 0 {
            return Err("window must be greater than 0".to_string());
        }
        if self.stride == 0 {
            return Err("stride must be greater than 0".to_string());
        }
        if self.stride > self.window {
            return Err(format!(
                "stride ({}) cannot exceed window ({})",
                self.stride, self.window
            ));
        }
        if self.max_chars == 0 {
            return Err("max_chars must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            mode: SegmentMode::Lines,
            window: 512,
            stride: 448,
            max_chars: 10_240,
            tokenizer_path: None,
        }
    }
}

/// Configuration for the Extraction Client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Chat-completions URL
    pub endpoint: String,

    /// Model identifier, fixed for the run
    pub model: String,

    /// Sampling temperature, fixed for the run
    pub temperature: f32,

    /// Generation-length ceiling
    pub max_tokens: u32,

    /// Maximum time for a single model call (seconds)
    pub request_timeout_secs: u64,

    /// Optional system message sent ahead of the segment
    pub system_prompt: Option<String>,
}

impl ExtractorConfig {
    /// Get the request timeout as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Use the built-in QA extraction instructions as the system prompt
    pub fn with_builtin_prompt(mut self) -> Self {
        self.system_prompt = Some(crate::prompt::QA_EXTRACTION_PROMPT.to_string());
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.endpoint.trim().is_empty() {
            return Err("endpoint must not be empty".to_string());
        }
        if self.model.trim().is_empty() {
            return Err("model must not be empty".to_string());
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!("temperature {} out of range [0.0, 2.0]", self.temperature));
        }
        if self.max_tokens == 0 {
            return Err("max_tokens must be greater than 0".to_string());
        }
        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            endpoint: qaforge_llm::chat_completions::DEFAULT_ENDPOINT.to_string(),
            model: "qwen/qwen3-4b".to_string(),
            temperature: 0.8,
            max_tokens: 32_768,
            request_timeout_secs: qaforge_llm::chat_completions::DEFAULT_TIMEOUT_SECS,
            system_prompt: None,
        }
    }
}

/// Configuration for the Pipeline Driver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directory holding the plain-text documents
    pub source_dir: PathBuf,

    /// JSONL metadata file
    pub metadata_path: PathBuf,

    /// JSONL output file
    pub output_path: PathBuf,

    /// File extensions treated as documents
    pub extensions: Vec<String>,

    /// Fail without a metadata file and skip documents without an entry
    pub require_metadata: bool,

    /// Documents processed concurrently (1 = strictly sequential)
    pub workers: usize,

    /// `fsync` the output after every record
    pub fsync: bool,
}

impl PipelineConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.workers == 0 {
            return Err("workers must be at least 1".to_string());
        }
        if self.extensions.iter().all(|e| e.trim_start_matches('.').is_empty()) {
            return Err("at least one document extension is required".to_string());
        }
        if self.output_path.as_os_str().is_empty() {
            return Err("output_path must not be empty".to_string());
        }
        Ok(())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("data/markdown"),
            metadata_path: PathBuf::from("data/markdown/metadata.jsonl"),
            output_path: PathBuf::from("data/generated/qa_pairs.jsonl"),
            extensions: vec!["md".to_string()],
            require_metadata: false,
            workers: 1,
            fsync: false,
        }
    }
}

/// Load any of the configuration sections from a TOML string
pub fn from_toml<T: serde::de::DeserializeOwned>(toml_str: &str) -> Result<T, String> {
    toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
}

/// Serialize any of the configuration sections to a TOML string
pub fn to_toml<T: Serialize>(config: &T) -> Result<String, String> {
    toml::to_string_pretty(config).map_err(|e| format!("Failed to serialize to TOML: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configs_are_valid() {
        assert!(SegmenterConfig::default().validate().is_ok());
        assert!(ExtractorConfig::default().validate().is_ok());
        assert!(PipelineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_default_overlap() {
        assert_eq!(SegmenterConfig::default().overlap(), 64);
    }

    #[test]
    fn test_invalid_window_and_stride() {
        let mut config = SegmenterConfig::default();
        config.window = 0;
        assert!(config.validate().is_err());

        let mut config = SegmenterConfig::default();
        config.stride = 0;
        assert!(config.validate().is_err());

        let mut config = SegmenterConfig::default();
        config.stride = config.window + 1;
        assert!(config.validate().is_err());

        let mut config = SegmenterConfig::default();
        config.max_chars = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_token_mode_requires_tokenizer() {
        let mut config = SegmenterConfig::default();
        config.mode = SegmentMode::Tokens;
        assert!(config.validate().is_err());

        config.tokenizer_path = Some(PathBuf::from("tokenizer.json"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_extractor_settings() {
        let mut config = ExtractorConfig::default();
        config.request_timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = ExtractorConfig::default();
        config.temperature = 3.5;
        assert!(config.validate().is_err());

        let mut config = ExtractorConfig::default();
        config.max_tokens = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_workers_rejected() {
        let mut config = PipelineConfig::default();
        config.workers = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_builtin_prompt() {
        let config = ExtractorConfig::default().with_builtin_prompt();
        assert!(config.system_prompt.unwrap().contains("qa_pairs"));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = SegmenterConfig {
            mode: SegmentMode::Tokens,
            tokenizer_path: Some(PathBuf::from("tok.json")),
            ..SegmenterConfig::default()
        };
        let toml_str = to_toml(&config).unwrap();
        let parsed: SegmenterConfig = from_toml(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed: ExtractorConfig = from_toml("model = \"llama3\"\n").unwrap();
        assert_eq!(parsed.model, "llama3");
        assert_eq!(parsed.max_tokens, 32_768);
    }
}
