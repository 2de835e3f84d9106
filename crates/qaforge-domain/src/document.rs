//! Documents and the segments derived from them

use std::path::PathBuf;

/// A source document read from disk
///
/// Immutable once read. `hash_md5` is computed from the same bytes that
/// produced `text`, so every record derived from this value carries the hash
/// of the text the model actually saw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Identifier (file name, e.g. `"handbook.md"`)
    pub name: String,

    /// Absolute location on disk
    pub path: PathBuf,

    /// Full UTF-8 text
    pub text: String,

    /// Lowercase hex MD5 of the raw file bytes
    pub hash_md5: String,

    /// Size in bytes
    pub size: u64,
}

impl Document {
    /// Number of whitespace-separated words in the text
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// A bounded slice of a document
///
/// Ephemeral: segments exist only between the segmenter and the extraction
/// client and are never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Name of the parent document
    pub document: String,

    /// 0-based ordinal among the document's emitted segments
    pub index: usize,

    /// Text payload, never blank; trimmed in line-bounded mode, verbatim in token mode
    pub text: String,

    /// Tokens in the window (characters in line-bounded mode)
    pub token_count: usize,
}
