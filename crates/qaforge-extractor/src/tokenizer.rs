//! Tokenizer adapter over Hugging Face `tokenizers`

use crate::error::ExtractorError;
use qaforge_domain::traits::TokenCodec;
use std::path::Path;
use tokenizers::Tokenizer;

/// A subword tokenizer loaded from a `tokenizer.json`
///
/// Stateless from the caller's point of view: encode and decode are pure
/// functions of their input. Special tokens are neither added nor skipped so
/// that decoding a window reproduces its text.
pub struct HfTokenizer {
    inner: Tokenizer,
}

impl HfTokenizer {
    /// Load a tokenizer definition from disk
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ExtractorError> {
        let path = path.as_ref();
        let inner = Tokenizer::from_file(path).map_err(|e| {
            ExtractorError::Tokenizer(format!("Failed to load {}: {}", path.display(), e))
        })?;
        Ok(Self { inner })
    }

    /// Vocabulary size including added tokens
    pub fn vocab_size(&self) -> usize {
        self.inner.get_vocab_size(true)
    }
}

impl std::fmt::Debug for HfTokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HfTokenizer")
            .field("vocab_size", &self.vocab_size())
            .finish()
    }
}

impl TokenCodec for HfTokenizer {
    type Error = ExtractorError;

    fn encode(&self, text: &str) -> Result<Vec<u32>, ExtractorError> {
        let encoding = self
            .inner
            .encode(text, false)
            .map_err(|e| ExtractorError::Tokenizer(e.to_string()))?;
        Ok(encoding.get_ids().to_vec())
    }

    fn decode(&self, ids: &[u32]) -> Result<String, ExtractorError> {
        self.inner
            .decode(ids, false)
            .map_err(|e| ExtractorError::Tokenizer(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    // Minimal word-level tokenizer: whitespace pre-tokenizer, no decoder
    const WORD_LEVEL_JSON: &str = r#"{
        "version": "1.0",
        "truncation": null,
        "padding": null,
        "added_tokens": [],
        "normalizer": null,
        "pre_tokenizer": {"type": "Whitespace"},
        "post_processor": null,
        "decoder": null,
        "model": {
            "type": "WordLevel",
            "vocab": {"[UNK]": 0, "hello": 1, "world": 2, "again": 3},
            "unk_token": "[UNK]"
        }
    }"#;

    fn load() -> (TempDir, HfTokenizer) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tokenizer.json");
        fs::write(&path, WORD_LEVEL_JSON).unwrap();
        let tokenizer = HfTokenizer::from_file(&path).unwrap();
        (dir, tokenizer)
    }

    #[test]
    fn test_encode_decode() {
        let (_dir, tokenizer) = load();
        let ids = tokenizer.encode("hello world again").unwrap();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(tokenizer.decode(&ids[1..]).unwrap(), "world again");
    }

    #[test]
    fn test_unknown_word_maps_to_unk() {
        let (_dir, tokenizer) = load();
        assert_eq!(tokenizer.encode("hello there").unwrap(), vec![1, 0]);
    }

    #[test]
    fn test_missing_file() {
        let result = HfTokenizer::from_file("/no/such/tokenizer.json");
        assert!(matches!(result, Err(ExtractorError::Tokenizer(_))));
    }
}
