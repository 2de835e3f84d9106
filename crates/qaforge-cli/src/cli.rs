//! CLI command definitions and argument parsing.
//!
//! Every override flag also reads a `QAFORGE_*` environment variable, so the
//! effective precedence is flag, then environment, then config file, then
//! built-in default.

use crate::config::AppConfig;
use clap::{Args, Parser, Subcommand, ValueEnum};
use qaforge_extractor::SegmentMode;
use std::path::PathBuf;

/// QAForge - Generate instruction-tuning QA pairs from documents.
#[derive(Debug, Parser)]
#[command(name = "qaforge")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path (TOML)
    #[arg(short, long, global = true, env = "QAFORGE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format for summaries
    #[arg(short, long, value_enum, global = true, default_value = "text")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text (default)
    Text,
    /// JSON format
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the extraction pipeline over the source directory
    Generate(GenerateArgs),

    /// Dry run: count segments per document without calling the model
    Segments(SegmentsArgs),

    /// Write a metadata file describing every document
    Metadata(MetadataArgs),
}

/// Where documents come from.
#[derive(Debug, Default, Args)]
pub struct SourceArgs {
    /// Directory holding the documents
    #[arg(short, long, env = "QAFORGE_SOURCE_DIR")]
    pub source_dir: Option<PathBuf>,

    /// Metadata JSONL file
    #[arg(short, long, env = "QAFORGE_METADATA")]
    pub metadata: Option<PathBuf>,

    /// Document extension (repeatable or comma-separated)
    #[arg(short, long = "extension", env = "QAFORGE_EXTENSIONS", value_delimiter = ',')]
    pub extensions: Vec<String>,
}

/// Model endpoint settings.
#[derive(Debug, Default, Args)]
pub struct ModelArgs {
    /// Chat-completions endpoint URL
    #[arg(long, env = "QAFORGE_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Model identifier
    #[arg(long, env = "QAFORGE_MODEL")]
    pub model: Option<String>,

    /// Sampling temperature
    #[arg(long, env = "QAFORGE_TEMPERATURE")]
    pub temperature: Option<f32>,

    /// Generation-length ceiling
    #[arg(long, env = "QAFORGE_MAX_TOKENS")]
    pub max_tokens: Option<u32>,

    /// Request timeout in seconds
    #[arg(long, env = "QAFORGE_TIMEOUT")]
    pub timeout: Option<u64>,

    /// System prompt sent ahead of every segment
    #[arg(long, env = "QAFORGE_SYSTEM_PROMPT", conflicts_with = "builtin_prompt")]
    pub system_prompt: Option<String>,

    /// Use the built-in QA extraction instructions as system prompt
    #[arg(long)]
    pub builtin_prompt: bool,
}

/// Segmentation settings.
#[derive(Debug, Default, Args)]
pub struct SegmentationArgs {
    /// Segmentation mode
    #[arg(long, value_enum, env = "QAFORGE_MODE")]
    pub mode: Option<ModeArg>,

    /// Window size in tokens
    #[arg(long, env = "QAFORGE_WINDOW")]
    pub window: Option<usize>,

    /// Step between windows in tokens
    #[arg(long, env = "QAFORGE_STRIDE")]
    pub stride: Option<usize>,

    /// Maximum segment length in characters (line mode)
    #[arg(long, env = "QAFORGE_MAX_CHARS")]
    pub max_chars: Option<usize>,

    /// Path to a tokenizer.json (token mode)
    #[arg(long, env = "QAFORGE_TOKENIZER")]
    pub tokenizer: Option<PathBuf>,
}

/// Segmentation mode argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Whole lines up to the character limit
    Lines,
    /// Sliding token windows
    Tokens,
}

/// Arguments for the generate command.
#[derive(Debug, Default, Args)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Output JSONL file
    #[arg(short, long, env = "QAFORGE_OUTPUT")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub model: ModelArgs,

    #[command(flatten)]
    pub segmentation: SegmentationArgs,

    /// Documents processed concurrently
    #[arg(short, long, env = "QAFORGE_WORKERS")]
    pub workers: Option<usize>,

    /// Fail without a metadata file and skip unlisted documents
    #[arg(long, env = "QAFORGE_REQUIRE_METADATA")]
    pub require_metadata: bool,

    /// fsync the output after every record
    #[arg(long, env = "QAFORGE_FSYNC")]
    pub fsync: bool,
}

/// Arguments for the segments command.
#[derive(Debug, Default, Args)]
pub struct SegmentsArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub segmentation: SegmentationArgs,
}

/// Arguments for the metadata command.
#[derive(Debug, Args)]
pub struct MetadataArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// License recorded for every document
    #[arg(long, default_value = "unknown")]
    pub license: String,

    /// Source label recorded for every document
    #[arg(long = "source", default_value = "unknown")]
    pub source_label: String,
}

impl From<ModeArg> for SegmentMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Lines => SegmentMode::Lines,
            ModeArg::Tokens => SegmentMode::Tokens,
        }
    }
}

impl SourceArgs {
    /// Apply the given flags on top of `config`.
    pub fn apply_to(&self, config: &mut AppConfig) {
        if let Some(dir) = &self.source_dir {
            config.paths.source_dir = dir.clone();
        }
        if let Some(metadata) = &self.metadata {
            config.paths.metadata = metadata.clone();
        }
        if !self.extensions.is_empty() {
            config.paths.extensions = self.extensions.clone();
        }
    }
}

impl ModelArgs {
    /// Apply the given flags on top of `config`.
    pub fn apply_to(&self, config: &mut AppConfig) {
        let model = &mut config.model;
        if let Some(endpoint) = &self.endpoint {
            model.endpoint = endpoint.clone();
        }
        if let Some(name) = &self.model {
            model.model = name.clone();
        }
        if let Some(temperature) = self.temperature {
            model.temperature = temperature;
        }
        if let Some(max_tokens) = self.max_tokens {
            model.max_tokens = max_tokens;
        }
        if let Some(timeout) = self.timeout {
            model.request_timeout_secs = timeout;
        }
        if let Some(prompt) = &self.system_prompt {
            model.system_prompt = Some(prompt.clone());
        }
        if self.builtin_prompt {
            *model = model.clone().with_builtin_prompt();
        }
    }
}

impl SegmentationArgs {
    /// Apply the given flags on top of `config`.
    pub fn apply_to(&self, config: &mut AppConfig) {
        let segmentation = &mut config.segmentation;
        if let Some(mode) = self.mode {
            segmentation.mode = mode.into();
        }
        if let Some(window) = self.window {
            segmentation.window = window;
        }
        if let Some(stride) = self.stride {
            segmentation.stride = stride;
        }
        if let Some(max_chars) = self.max_chars {
            segmentation.max_chars = max_chars;
        }
        if let Some(tokenizer) = &self.tokenizer {
            segmentation.tokenizer_path = Some(tokenizer.clone());
            if self.mode.is_none() {
                segmentation.mode = SegmentMode::Tokens;
            }
        }
    }
}

impl GenerateArgs {
    /// Apply the given flags on top of `config`.
    pub fn apply_to(&self, config: &mut AppConfig) {
        self.source.apply_to(config);
        self.model.apply_to(config);
        self.segmentation.apply_to(config);
        if let Some(output) = &self.output {
            config.paths.output = output.clone();
        }
        if let Some(workers) = self.workers {
            config.run.workers = workers;
        }
        if self.require_metadata {
            config.run.require_metadata = true;
        }
        if self.fsync {
            config.run.fsync = true;
        }
    }
}

impl SegmentsArgs {
    /// Apply the given flags on top of `config`.
    pub fn apply_to(&self, config: &mut AppConfig) {
        self.source.apply_to(config);
        self.segmentation.apply_to(config);
    }
}
