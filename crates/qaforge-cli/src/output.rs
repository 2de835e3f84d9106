//! Output formatting for the CLI.

use crate::cli::OutputFormat;
use crate::error::Result;
use qaforge_extractor::{RunReport, SegmentMode};
use serde::Serialize;
use std::path::Path;

/// Segment count for one document (dry run).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SegmentCount {
    /// Document name
    pub document: String,
    /// Segments that would be sent to the model
    pub segments: usize,
    /// Tokens (or characters in line mode) across those segments
    pub units: usize,
}

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Format the summary of a generation run.
    pub fn format_report(&self, report: &RunReport, output: &Path) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "output": output.display().to_string(),
                "report": report,
            }))?),
            OutputFormat::Text => Ok(format!("{}\nOutput: {}", report.summary(), output.display())),
        }
    }

    /// Format per-document segment counts.
    pub fn format_segment_counts(&self, mode: SegmentMode, counts: &[SegmentCount]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "mode": mode,
                "documents": counts,
            }))?),
            OutputFormat::Text => {
                let unit = match mode {
                    SegmentMode::Tokens => "tokens",
                    SegmentMode::Lines => "chars",
                };
                let width = counts
                    .iter()
                    .map(|c| c.document.chars().count())
                    .max()
                    .unwrap_or(0)
                    .max("Document".len());

                let mut lines = vec![format!("{:<width$}  Segments  {}", "Document", unit, width = width)];
                for count in counts {
                    lines.push(format!(
                        "{:<width$}  {:>8}  {}",
                        count.document,
                        count.segments,
                        count.units,
                        width = width
                    ));
                }
                let total: usize = counts.iter().map(|c| c.segments).sum();
                lines.push(format!("{} segments in {} documents", total, counts.len()));
                Ok(lines.join("\n"))
            }
        }
    }

    /// Format the result of writing a metadata file.
    pub fn format_metadata_written(&self, entries: usize, path: &Path) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "entries": entries,
                "path": path.display().to_string(),
            }))?),
            OutputFormat::Text => Ok(format!("Wrote {} metadata entries to {}", entries, path.display())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts() -> Vec<SegmentCount> {
        vec![
            SegmentCount {
                document: "a.md".to_string(),
                segments: 3,
                units: 1200,
            },
            SegmentCount {
                document: "handbook.md".to_string(),
                segments: 7,
                units: 3400,
            },
        ]
    }

    #[test]
    fn test_text_report() {
        let report = RunReport {
            records_written: 4,
            ..RunReport::default()
        };
        let text = Formatter::new(OutputFormat::Text)
            .format_report(&report, Path::new("out.jsonl"))
            .unwrap();
        assert!(text.contains("4 written"));
        assert!(text.contains("Output: out.jsonl"));
    }

    #[test]
    fn test_json_report() {
        let report = RunReport {
            documents_discovered: 2,
            ..RunReport::default()
        };
        let json = Formatter::new(OutputFormat::Json)
            .format_report(&report, Path::new("out.jsonl"))
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["report"]["documents_discovered"], 2);
        assert_eq!(value["output"], "out.jsonl");
    }

    #[test]
    fn test_text_segment_counts() {
        let text = Formatter::new(OutputFormat::Text)
            .format_segment_counts(SegmentMode::Tokens, &counts())
            .unwrap();
        assert!(text.contains("handbook.md"));
        assert!(text.contains("tokens"));
        assert!(text.ends_with("10 segments in 2 documents"));
    }

    #[test]
    fn test_json_segment_counts() {
        let json = Formatter::new(OutputFormat::Json)
            .format_segment_counts(SegmentMode::Lines, &counts())
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["mode"], "lines");
        assert_eq!(value["documents"][1]["segments"], 7);
    }
}
