//! Run counters for the pipeline driver

use crate::extractor::SegmentStatus;
use serde::Serialize;

/// Counters collected during one pipeline run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Documents found in the source directory
    pub documents_discovered: usize,

    /// Documents read and segmented
    pub documents_processed: usize,

    /// Documents skipped (unreadable, or no metadata when it is required)
    pub documents_skipped: usize,

    /// Segments sent to the model
    pub segments_total: usize,

    /// Segments lost to transport or parse failures
    pub segments_failed: usize,

    /// Segments that yielded no valid pair
    pub segments_empty: usize,

    /// Records appended to the output
    pub records_written: usize,

    /// Pairs rejected for missing or empty fields
    pub pairs_dropped: usize,

    /// Documents whose content hash differs from the metadata entry
    pub hash_mismatches: usize,
}

impl RunReport {
    /// Create a new empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one segment by how its extraction ended
    pub fn record_segment(&mut self, status: &SegmentStatus, dropped: usize) {
        self.segments_total += 1;
        self.pairs_dropped += dropped;
        match status {
            SegmentStatus::Extracted => {}
            SegmentStatus::Empty => self.segments_empty += 1,
            SegmentStatus::Transport(_) | SegmentStatus::Malformed(_) => self.segments_failed += 1,
        }
    }

    /// Fold a per-document report into this one
    pub fn merge(&mut self, other: &RunReport) {
        self.documents_discovered += other.documents_discovered;
        self.documents_processed += other.documents_processed;
        self.documents_skipped += other.documents_skipped;
        self.segments_total += other.segments_total;
        self.segments_failed += other.segments_failed;
        self.segments_empty += other.segments_empty;
        self.records_written += other.records_written;
        self.pairs_dropped += other.pairs_dropped;
        self.hash_mismatches += other.hash_mismatches;
    }

    /// True when every segment failed and nothing was written
    pub fn all_failed(&self) -> bool {
        self.segments_total > 0 && self.segments_failed == self.segments_total
    }

    /// Generate a summary report
    pub fn summary(&self) -> String {
        let lines = [
            "QA Generation Summary".to_string(),
            "=====================".to_string(),
            format!(
                "Documents: {} discovered, {} processed, {} skipped",
                self.documents_discovered, self.documents_processed, self.documents_skipped
            ),
            format!(
                "Segments:  {} total, {} failed, {} empty",
                self.segments_total, self.segments_failed, self.segments_empty
            ),
            format!(
                "Records:   {} written, {} pairs dropped",
                self.records_written, self.pairs_dropped
            ),
            format!("Hash mismatches: {}", self.hash_mismatches),
        ];
        lines.join("\n")
    }
}
