//! Configuration file handling for the CLI.
//!
//! A single TOML document with four sections:
//!
//! ```toml
//! [paths]
//! source_dir = "data/markdown"
//! metadata = "data/markdown/metadata.jsonl"
//! output = "data/generated/qa_pairs.jsonl"
//! extensions = ["md"]
//!
//! [model]
//! endpoint = "http://localhost:1234/v1/chat/completions"
//! model = "qwen/qwen3-4b"
//! temperature = 0.8
//! max_tokens = 32768
//! request_timeout_secs = 120
//!
//! [segmentation]
//! mode = "lines"
//! window = 512
//! stride = 448
//! max_chars = 10240
//!
//! [run]
//! workers = 1
//! require_metadata = false
//! fsync = false
//! ```
//!
//! Every key is optional. Command-line flags and `QAFORGE_*` environment
//! variables are applied on top of the loaded file.

use crate::error::{CliError, Result};
use qaforge_extractor::{ExtractorConfig, PipelineConfig, SegmenterConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Input and output locations
    pub paths: PathsSection,

    /// Model endpoint and sampling settings
    pub model: ExtractorConfig,

    /// Segmentation settings
    pub segmentation: SegmenterConfig,

    /// Driver settings
    pub run: RunSection,
}

/// `[paths]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsSection {
    /// Directory holding the documents
    pub source_dir: PathBuf,

    /// Metadata JSONL file
    pub metadata: PathBuf,

    /// Output JSONL file
    pub output: PathBuf,

    /// Document file extensions
    pub extensions: Vec<String>,
}

/// `[run]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSection {
    /// Documents processed concurrently
    pub workers: usize,

    /// Fail without a metadata file and skip unlisted documents
    pub require_metadata: bool,

    /// `fsync` after every record
    pub fsync: bool,
}

impl AppConfig {
    /// Load configuration from `path`, or the built-in defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let contents = fs::read_to_string(path).map_err(|e| {
                    CliError::Config(format!("Cannot read {}: {}", path.display(), e))
                })?;
                Self::from_toml(&contents)
            }
            None => Ok(Self::default()),
        }
    }

    /// Parse from a TOML string.
    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Driver settings assembled from `[paths]` and `[run]`.
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            source_dir: self.paths.source_dir.clone(),
            metadata_path: self.paths.metadata.clone(),
            output_path: self.paths.output.clone(),
            extensions: self.paths.extensions.clone(),
            require_metadata: self.run.require_metadata,
            workers: self.run.workers,
            fsync: self.run.fsync,
        }
    }

    /// Check every section.
    pub fn validate(&self) -> Result<()> {
        self.segmentation
            .validate()
            .map_err(|e| CliError::Config(format!("[segmentation] {}", e)))?;
        self.model
            .validate()
            .map_err(|e| CliError::Config(format!("[model] {}", e)))?;
        self.pipeline_config()
            .validate()
            .map_err(|e| CliError::Config(format!("[run] {}", e)))?;
        Ok(())
    }
}

impl Default for PathsSection {
    fn default() -> Self {
        let pipeline = PipelineConfig::default();
        Self {
            source_dir: pipeline.source_dir,
            metadata: pipeline.metadata_path,
            output: pipeline.output_path,
            extensions: pipeline.extensions,
        }
    }
}

impl Default for RunSection {
    fn default() -> Self {
        let pipeline = PipelineConfig::default();
        Self {
            workers: pipeline.workers,
            require_metadata: pipeline.require_metadata,
            fsync: pipeline.fsync,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qaforge_extractor::SegmentMode;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.model.endpoint, "http://localhost:1234/v1/chat/completions");
        assert_eq!(config.model.model, "qwen/qwen3-4b");
        assert_eq!(config.model.request_timeout_secs, 120);
        assert_eq!(config.segmentation.window, 512);
        assert_eq!(config.segmentation.stride, 448);
        assert_eq!(config.segmentation.max_chars, 10_240);
        assert_eq!(config.paths.extensions, vec!["md".to_string()]);
        assert_eq!(config.run.workers, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file() {
        let config = AppConfig::from_toml(
            r#"
            [model]
            model = "llama3"

            [segmentation]
            mode = "tokens"
            tokenizer_path = "tokenizer.json"
            window = 256
            stride = 200
            "#,
        )
        .unwrap();

        assert_eq!(config.model.model, "llama3");
        assert_eq!(config.model.max_tokens, 32_768);
        assert_eq!(config.segmentation.mode, SegmentMode::Tokens);
        assert_eq!(config.segmentation.window, 256);
        assert_eq!(config.segmentation.max_chars, 10_240);
        assert_eq!(config.run, RunSection::default());
    }

    #[test]
    fn test_round_trip() {
        let mut config = AppConfig::default();
        config.run.workers = 4;
        config.model.system_prompt = Some("Be brief.".to_string());
        let parsed = AppConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let config = AppConfig::from_toml("[segmentation]\nwindow = 10\nstride = 20\n").unwrap();
        assert!(matches!(config.validate(), Err(CliError::Config(_))));

        let config = AppConfig::from_toml("[model]\nrequest_timeout_secs = 0\n").unwrap();
        assert!(config.validate().is_err());

        let config = AppConfig::from_toml("[run]\nworkers = 0\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_toml() {
        assert!(matches!(
            AppConfig::from_toml("[model\nmodel = 1"),
            Err(CliError::Toml(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = AppConfig::load(Some(Path::new("/no/such/qaforge.toml")));
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn test_pipeline_config_mapping() {
        let mut config = AppConfig::default();
        config.paths.output = PathBuf::from("out.jsonl");
        config.run.require_metadata = true;
        let pipeline = config.pipeline_config();
        assert_eq!(pipeline.output_path, PathBuf::from("out.jsonl"));
        assert!(pipeline.require_metadata);
    }
}
