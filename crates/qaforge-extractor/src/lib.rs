//! QAForge Extractor
//!
//! Turns plain-text documents into instruction-tuning records with a language
//! model.
//!
//! # Overview
//!
//! Each document is split into bounded segments, every segment is sent to a
//! chat-completions endpoint with a structured-extraction prompt, and the
//! returned question/answer pairs are joined with the document's provenance
//! and appended to a JSONL file.
//!
//! # Architecture
//!
//! ```text
//! DocumentSource → Segmenter → Extractor → LLM → parser → ExtractionRecord → RecordSink
//!                                                   ↑
//!                                             MetadataStore
//! ```
//!
//! # Key Features
//!
//! - **Token-aware segmentation**: sliding windows with overlap over a
//!   Hugging Face tokenizer, or line-bounded chunks when no tokenizer is set
//! - **Response recovery**: reasoning blocks are stripped and the outermost
//!   JSON object is parsed; bad pairs are dropped one at a time
//! - **Resilient driver**: per-segment and per-document failures are counted,
//!   never fatal
//! - **Bounded concurrency**: optional worker pool with a single writer
//!
//! # Example Usage
//!
//! ```no_run
//! use qaforge_extractor::{ExtractorConfig, Pipeline, PipelineConfig, SegmenterConfig};
//! use qaforge_llm::MockProvider;
//! use qaforge_store::JsonlSink;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = MockProvider::new(r#"{"qa_pairs": []}"#);
//! let config = PipelineConfig::default();
//! let mut sink = JsonlSink::open(&config.output_path)?;
//!
//! let pipeline = Pipeline::from_config(
//!     provider,
//!     SegmenterConfig::default(),
//!     ExtractorConfig::default(),
//!     config,
//! )?;
//! let report = pipeline.run(&mut sink).await?;
//!
//! println!("{}", report.summary());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod chunking;
mod config;
mod error;
mod extractor;
mod parser;
mod pipeline;
mod prompt;
mod report;
mod sanitize;
mod tokenizer;


pub use chunking::{token_windows, LineChunks, Segmenter, Segments, TokenWindows};
pub use config::{
    from_toml, to_toml, ExtractorConfig, PipelineConfig, SegmentMode, SegmenterConfig,
};
pub use error::ExtractorError;
pub use extractor::{Extractor, SegmentOutcome, SegmentStatus};
pub use parser::{extract_object, parse_qa_pairs, ParsedPairs};
pub use pipeline::Pipeline;
pub use prompt::{build_request, QA_EXTRACTION_PROMPT};
pub use report::RunReport;
pub use sanitize::{strip_reasoning, THINK_CLOSE, THINK_OPEN};
pub use tokenizer::HfTokenizer;
