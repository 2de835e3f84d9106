//! Segments command implementation (dry run).

use crate::cli::SegmentsArgs;
use crate::config::AppConfig;
use crate::error::{CliError, Result};
use crate::output::{Formatter, SegmentCount};
use qaforge_extractor::Segmenter;
use qaforge_store::DocumentSource;
use tracing::warn;

/// Execute the segments command.
pub fn execute_segments(args: SegmentsArgs, mut config: AppConfig, formatter: &Formatter) -> Result<String> {
    args.apply_to(&mut config);
    config
        .segmentation
        .validate()
        .map_err(|e| CliError::Config(format!("[segmentation] {}", e)))?;

    let segmenter = Segmenter::from_config(config.segmentation.clone())?;
    let source = DocumentSource::new(config.paths.source_dir.clone(), config.paths.extensions.clone())?;

    let mut counts = Vec::new();
    for path in source.discover()? {
        let document = match source.read(&path) {
            Ok(document) => document,
            Err(e) => {
                warn!("Skipping document: {}", e);
                continue;
            }
        };

        let segments = match segmenter.segment(&document) {
            Ok(segments) => segments,
            Err(e) => {
                warn!("Skipping {}: {}", document.name, e);
                continue;
            }
        };

        let mut count = SegmentCount {
            document: document.name.clone(),
            segments: 0,
            units: 0,
        };
        for segment in segments {
            match segment {
                Ok(segment) => {
                    count.segments += 1;
                    count.units += segment.token_count;
                }
                Err(e) => warn!("{}: {}", document.name, e),
            }
        }
        counts.push(count);
    }

    formatter.format_segment_counts(segmenter.mode(), &counts)
}
