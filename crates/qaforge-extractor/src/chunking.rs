//! Text segmentation: sliding token windows and line-bounded chunks

use crate::config::{SegmentMode, SegmenterConfig};
use crate::error::ExtractorError;
use crate::tokenizer::HfTokenizer;
use qaforge_domain::traits::TokenCodec;
use qaforge_domain::{Document, Segment};
use std::collections::VecDeque;
use std::fmt::Display;
use std::iter::FusedIterator;
use std::ops::Range;
use tracing::{info, warn};

/// Sliding windows over a sequence of `len` units
///
/// Consecutive windows overlap by `window - stride` units. The window that
/// reaches the end of the sequence is emitted once and ends the iteration,
/// even when it is shorter than `window`.
#[derive(Debug, Clone)]
pub struct TokenWindows {
    len: usize,
    window: usize,
    stride: usize,
    start: usize,
    done: bool,
}

/// Windows over `len` units; `window` and `stride` are clamped to `1..` and `stride <= window`
pub fn token_windows(len: usize, window: usize, stride: usize) -> TokenWindows {
    let window = window.max(1);
    TokenWindows {
        len,
        window,
        stride: stride.clamp(1, window),
        start: 0,
        done: len == 0,
    }
}

impl Iterator for TokenWindows {
    type Item = Range<usize>;

    fn next(&mut self) -> Option<Range<usize>> {
        if self.done {
            return None;
        }
        let end = (self.start + self.window).min(self.len);
        let range = self.start..end;
        if end == self.len {
            self.done = true;
        } else {
            self.start += self.stride;
        }
        Some(range)
    }
}

impl FusedIterator for TokenWindows {}

/// Whole-line chunks of at most `max_chars` characters
///
/// Lines are accumulated until the next one would overflow the limit; the
/// buffer is then emitted trimmed. A single line longer than the limit is cut
/// at character boundaries, the only case where a line is split.
#[derive(Debug, Clone)]
pub struct LineChunks<'a> {
    lines: std::str::Lines<'a>,
    max_chars: usize,
    buffer: String,
    buffer_chars: usize,
    pending: VecDeque<String>,
}

impl<'a> LineChunks<'a> {
    /// Chunk `text` into pieces of at most `max_chars` characters
    pub fn new(text: &'a str, max_chars: usize) -> Self {
        Self {
            lines: text.lines(),
            max_chars: max_chars.max(1),
            buffer: String::new(),
            buffer_chars: 0,
            pending: VecDeque::new(),
        }
    }

    fn flush(&mut self) {
        let trimmed = self.buffer.trim();
        if !trimmed.is_empty() {
            self.pending.push_back(trimmed.to_string());
        }
        self.buffer.clear();
        self.buffer_chars = 0;
    }

    fn split_long_line(&mut self, line: &str) {
        let chars: Vec<char> = line.chars().collect();
        for piece in chars.chunks(self.max_chars) {
            let piece: String = piece.iter().collect();
            let trimmed = piece.trim();
            if !trimmed.is_empty() {
                self.pending.push_back(trimmed.to_string());
            }
        }
    }
}

impl Iterator for LineChunks<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            if let Some(chunk) = self.pending.pop_front() {
                return Some(chunk);
            }

            let Some(line) = self.lines.next() else {
                self.flush();
                return self.pending.pop_front();
            };

            let line_chars = line.chars().count();
            if self.buffer_chars + line_chars + 1 > self.max_chars {
                self.flush();
                if line_chars > self.max_chars {
                    self.split_long_line(line);
                    continue;
                }
            }
            self.buffer.push_str(line);
            self.buffer.push('\n');
            self.buffer_chars += line_chars + 1;
        }
    }
}

impl FusedIterator for LineChunks<'_> {}

/// Splits documents into segments
///
/// Token mode is active when a codec is present; otherwise documents are cut
/// into line-bounded chunks.
pub struct Segmenter<C = HfTokenizer> {
    config: SegmenterConfig,
    codec: Option<C>,
}

impl Segmenter<HfTokenizer> {
    /// Build a segmenter from configuration, loading the tokenizer for token mode
    ///
    /// A tokenizer that cannot be loaded degrades to line mode with a warning.
    pub fn from_config(config: SegmenterConfig) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Config)?;

        let codec = match (config.mode, &config.tokenizer_path) {
            (SegmentMode::Tokens, Some(path)) => match HfTokenizer::from_file(path) {
                Ok(tokenizer) => {
                    info!(
                        "Token segmentation: window {}, stride {}, vocab {}",
                        config.window,
                        config.stride,
                        tokenizer.vocab_size()
                    );
                    Some(tokenizer)
                }
                Err(e) => {
                    warn!("{}; falling back to line segmentation", e);
                    None
                }
            },
            _ => None,
        };

        Ok(Self { config, codec })
    }
}

impl<C> Segmenter<C> {
    /// Line-bounded segmenter, no tokenizer involved
    pub fn lines(config: SegmenterConfig) -> Result<Self, ExtractorError> {
        config.validate_bounds().map_err(ExtractorError::Config)?;
        Ok(Self {
            config: SegmenterConfig {
                mode: SegmentMode::Lines,
                ..config
            },
            codec: None,
        })
    }

    /// Token-window segmenter over an already constructed codec
    pub fn with_codec(config: SegmenterConfig, codec: C) -> Result<Self, ExtractorError> {
        config.validate_bounds().map_err(ExtractorError::Config)?;
        Ok(Self {
            config: SegmenterConfig {
                mode: SegmentMode::Tokens,
                ..config
            },
            codec: Some(codec),
        })
    }

    /// Effective mode
    pub fn mode(&self) -> SegmentMode {
        if self.codec.is_some() {
            SegmentMode::Tokens
        } else {
            SegmentMode::Lines
        }
    }

    /// Configuration in use
    pub fn config(&self) -> &SegmenterConfig {
        &self.config
    }
}

impl<C> Segmenter<C>
where
    C: TokenCodec,
    C::Error: Display,
{
    /// Segments of `document`, in order
    ///
    /// # Errors
    ///
    /// `ExtractorError::Tokenizer` if the document cannot be encoded.
    pub fn segment<'a>(&'a self, document: &'a Document) -> Result<Segments<'a, C>, ExtractorError> {
        let source = match &self.codec {
            Some(codec) => {
                let ids = codec
                    .encode(&document.text)
                    .map_err(|e| ExtractorError::Tokenizer(e.to_string()))?;
                let windows = token_windows(ids.len(), self.config.window, self.config.stride);
                SegmentSource::Tokens {
                    codec,
                    ids,
                    windows,
                }
            }
            None => SegmentSource::Lines(LineChunks::new(&document.text, self.config.max_chars)),
        };

        Ok(Segments {
            document: &document.name,
            next_index: 0,
            source,
        })
    }
}

enum SegmentSource<'a, C> {
    Tokens {
        codec: &'a C,
        ids: Vec<u32>,
        windows: TokenWindows,
    },
    Lines(LineChunks<'a>),
}

/// Ordered, single-pass sequence of a document's segments
///
/// Whitespace-only windows are skipped without consuming an index. A window
/// that fails to decode is yielded as an error and iteration continues.
pub struct Segments<'a, C> {
    document: &'a str,
    next_index: usize,
    source: SegmentSource<'a, C>,
}

impl<C> Iterator for Segments<'_, C>
where
    C: TokenCodec,
    C::Error: Display,
{
    type Item = Result<Segment, ExtractorError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (text, token_count) = match &mut self.source {
                SegmentSource::Tokens {
                    codec,
                    ids,
                    windows,
                } => {
                    let range = windows.next()?;
                    let count = range.len();
                    match codec.decode(&ids[range]) {
                        Ok(text) => (text, count),
                        Err(e) => return Some(Err(ExtractorError::Tokenizer(e.to_string()))),
                    }
                }
                SegmentSource::Lines(chunks) => {
                    let text = chunks.next()?;
                    let count = text.chars().count();
                    (text, count)
                }
            };

            if text.trim().is_empty() {
                continue;
            }

            let segment = Segment {
                document: self.document.to_string(),
                index: self.next_index,
                text,
                token_count,
            };
            self.next_index += 1;
            return Some(Ok(segment));
        }
    }
}
