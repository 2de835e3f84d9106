//! Per-document metadata entries

use crate::provenance::Provenance;
use serde::{Deserialize, Serialize};

/// Provenance and statistics for one document, one JSONL line
///
/// `filename`, `license` and `source` are required; everything else is
/// optional so that hand-written metadata files stay valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataEntry {
    /// Document identifier (file name)
    pub filename: String,

    /// License the document is published under
    pub license: String,

    /// Source label
    pub source: String,

    /// Path at the time the entry was generated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,

    /// MD5 of the document at the time the entry was generated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_hash_md5: Option<String>,

    /// Page count of the original (pre-conversion) document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_pages: Option<u32>,

    /// Word count of the document text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_count: Option<u64>,

    /// Title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Author
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// When the entry was generated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl MetadataEntry {
    /// Create an entry with only the required fields
    pub fn new(
        filename: impl Into<String>,
        license: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            filename: filename.into(),
            license: license.into(),
            source: source.into(),
            file_path: None,
            file_hash_md5: None,
            num_pages: None,
            word_count: None,
            title: None,
            author: None,
            created_at: None,
        }
    }

    /// License and source of this entry
    pub fn provenance(&self) -> Provenance {
        Provenance::new(self.license.clone(), self.source.clone())
    }

    /// True when the entry records a hash that differs from `current`
    ///
    /// Entries without a recorded hash never mismatch.
    pub fn hash_mismatch(&self, current: &str) -> bool {
        self.file_hash_md5
            .as_deref()
            .is_some_and(|recorded| !recorded.eq_ignore_ascii_case(current))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_line() {
        let entry: MetadataEntry =
            serde_json::from_str(r#"{"filename":"a.md","license":"CC0","source":"web"}"#).unwrap();
        assert_eq!(entry.filename, "a.md");
        assert_eq!(entry.provenance(), Provenance::new("CC0", "web"));
        assert!(entry.file_hash_md5.is_none());
    }

    #[test]
    fn test_parse_full_line_ignores_unknown_keys() {
        let line = r#"{"filename":"b.md","file_path":"../pdf/b.pdf","file_hash_md5":"abc",
            "num_pages":12,"title":"T","author":"","subject":"","producer":"x",
            "created_at":"2025-01-01T00:00:00+00:00","source":"Unbekannt","license":"Unbekannt"}"#;
        let entry: MetadataEntry = serde_json::from_str(line).unwrap();
        assert_eq!(entry.num_pages, Some(12));
        assert_eq!(entry.file_hash_md5.as_deref(), Some("abc"));
    }

    #[test]
    fn test_missing_required_field_fails() {
        let result: Result<MetadataEntry, _> =
            serde_json::from_str(r#"{"filename":"a.md","license":"CC0"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_hash_mismatch() {
        let mut entry = MetadataEntry::new("a.md", "CC0", "web");
        assert!(!entry.hash_mismatch("abc"));

        entry.file_hash_md5 = Some("ABC".to_string());
        assert!(!entry.hash_mismatch("abc"));
        assert!(entry.hash_mismatch("def"));
    }
}
