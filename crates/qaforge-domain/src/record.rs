//! Extraction records - the unit written to the output stream

use crate::document::Document;
use crate::provenance::Provenance;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a record based on UUIDv7
///
/// Generated fresh for every emitted record, so the same pair produced by two
/// runs is detectable as a duplicate downstream without the sink tracking it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(uuid::Uuid);

impl RecordId {
    /// Generate a new UUIDv7-based RecordId
    ///
    /// # Examples
    ///
    /// ```
    /// use qaforge_domain::RecordId;
    ///
    /// let a = RecordId::new();
    /// let b = RecordId::new();
    /// assert_ne!(a, b);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7())
    }

    /// Parse a RecordId from its hyphenated string form
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| format!("Invalid record id: {}", e))
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One instruction/input/output triple returned by the model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QaPair {
    /// The question or task
    pub instruction: String,

    /// Optional context for the instruction (may be empty)
    pub input: String,

    /// The expected answer
    pub output: String,
}

impl QaPair {
    /// Create a new pair
    pub fn new(
        instruction: impl Into<String>,
        input: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        Self {
            instruction: instruction.into(),
            input: input.into(),
            output: output.into(),
        }
    }

    /// Check that instruction and output carry content
    pub fn validate(&self) -> Result<(), String> {
        if self.instruction.trim().is_empty() {
            return Err("instruction is empty".to_string());
        }
        if self.output.trim().is_empty() {
            return Err("output is empty".to_string());
        }
        Ok(())
    }
}

/// A validated pair joined with the provenance of its document
///
/// Append-only: once written a record is never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionRecord {
    /// Fresh unique identifier
    pub id: RecordId,

    /// The question or task
    pub instruction: String,

    /// Context for the instruction
    pub input: String,

    /// The expected answer
    pub output: String,

    /// Name of the source document
    pub source_file: String,

    /// Absolute path of the source document
    pub file_path: String,

    /// MD5 of the document text that produced this record
    pub file_hash_md5: String,

    /// Creation time (RFC 3339, UTC)
    pub created_at: DateTime<Utc>,

    /// License of the source document
    pub license: String,

    /// Source label of the source document
    pub source: String,

    /// Set when the metadata entry recorded a different hash for the document
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub metadata_hash_mismatch: bool,
}

impl ExtractionRecord {
    /// Join a pair with its document and provenance
    pub fn new(pair: QaPair, document: &Document, provenance: &Provenance) -> Self {
        Self {
            id: RecordId::new(),
            instruction: pair.instruction,
            input: pair.input,
            output: pair.output,
            source_file: document.name.clone(),
            file_path: document.path.display().to_string(),
            file_hash_md5: document.hash_md5.clone(),
            created_at: Utc::now(),
            license: provenance.license.clone(),
            source: provenance.source.clone(),
            metadata_hash_mismatch: false,
        }
    }

    /// Mark the record as produced from a document whose hash disagrees with its metadata
    pub fn with_hash_mismatch(mut self, mismatch: bool) -> Self {
        self.metadata_hash_mismatch = mismatch;
        self
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: Round-trip through string representation preserves ID
        #[test]
        fn test_record_id_string_roundtrip(value: u128) {
            let id = RecordId(uuid::Uuid::from_u128(value));

            match RecordId::from_string(&id.to_string()) {
                Ok(parsed) => prop_assert_eq!(id, parsed),
                Err(e) => return Err(TestCaseError::fail(e)),
            }
        }

        /// Property: Whitespace-only instruction or output never validates
        #[test]
        fn test_blank_fields_rejected(
            blank in "[ \t\n]{0,8}",
            text in "[a-zA-Z?.]{1,20}",
            input in ".{0,20}",
        ) {
            prop_assert!(QaPair::new(blank.clone(), input.clone(), text.clone()).validate().is_err());
            prop_assert!(QaPair::new(text.clone(), input.clone(), blank).validate().is_err());
            prop_assert!(QaPair::new(text.clone(), input, text).validate().is_ok());
        }
    }
}
