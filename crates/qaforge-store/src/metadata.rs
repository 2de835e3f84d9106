//! Metadata store backed by a JSONL file

use crate::StoreError;
use chrono::Utc;
use qaforge_domain::{Document, MetadataEntry, Provenance};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::{info, warn};

/// Read-only lookup from document name to metadata entry
///
/// Loaded fully into memory once per run. Every line must be a JSON object
/// with at least `filename`, `license` and `source`; anything else is a
/// configuration error, reported before extraction starts.
#[derive(Debug, Clone, Default)]
pub struct MetadataStore {
    entries: HashMap<String, MetadataEntry>,
}

impl MetadataStore {
    /// Build a store from in-memory entries (later duplicates win)
    pub fn from_entries(entries: impl IntoIterator<Item = MetadataEntry>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|e| (e.filename.clone(), e))
                .collect(),
        }
    }

    /// Load a metadata file that must exist
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            StoreError::Config(format!("Cannot open metadata file {}: {}", path.display(), e))
        })?;

        let mut entries = HashMap::new();
        for (idx, line) in BufReader::new(file).lines().enumerate() {
            let line_no = idx + 1;
            let line = line.map_err(|e| StoreError::InvalidMetadata {
                line: line_no,
                reason: e.to_string(),
            })?;
            if line.trim().is_empty() {
                continue;
            }

            let entry: MetadataEntry =
                serde_json::from_str(&line).map_err(|e| StoreError::InvalidMetadata {
                    line: line_no,
                    reason: e.to_string(),
                })?;
            if entry.filename.trim().is_empty() {
                return Err(StoreError::InvalidMetadata {
                    line: line_no,
                    reason: "empty filename".to_string(),
                });
            }

            if let Some(previous) = entries.insert(entry.filename.clone(), entry) {
                warn!(
                    "Duplicate metadata for {} at line {}; keeping the later entry",
                    previous.filename, line_no
                );
            }
        }

        info!("Loaded {} metadata entries from {}", entries.len(), path.display());
        Ok(Self { entries })
    }

    /// Load a metadata file, or start empty if it does not exist
    pub fn load_or_empty(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if !path.exists() {
            warn!(
                "Metadata file {} not found; provenance defaults to \"unknown\"",
                path.display()
            );
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Entry for a document, if any
    pub fn get(&self, filename: &str) -> Option<&MetadataEntry> {
        self.entries.get(filename)
    }

    /// Provenance for a document, falling back to the unknown sentinel
    pub fn provenance(&self, filename: &str) -> Provenance {
        self.get(filename)
            .map(MetadataEntry::provenance)
            .unwrap_or_else(Provenance::unknown)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no entries are loaded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Describe a freshly read document as a metadata entry
pub fn entry_for_document(document: &Document, license: &str, source: &str) -> MetadataEntry {
    let mut entry = MetadataEntry::new(document.name.clone(), license, source);
    entry.file_path = Some(document.path.display().to_string());
    entry.file_hash_md5 = Some(document.hash_md5.clone());
    entry.word_count = Some(document.word_count() as u64);
    entry.created_at = Some(Utc::now().to_rfc3339());
    entry
}

/// Write entries to `path`, replacing any existing file
pub fn write_metadata_file(path: impl AsRef<Path>, entries: &[MetadataEntry]) -> Result<(), StoreError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut out = BufWriter::new(File::create(path)?);
    for entry in entries {
        serde_json::to_writer(&mut out, entry)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}
