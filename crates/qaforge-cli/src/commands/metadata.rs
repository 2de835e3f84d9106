//! Metadata command implementation.

use crate::cli::MetadataArgs;
use crate::config::AppConfig;
use crate::error::Result;
use crate::output::Formatter;
use qaforge_store::{entry_for_document, write_metadata_file, DocumentSource};
use tracing::{info, warn};

/// Execute the metadata command.
///
/// Replaces the metadata file with one entry per readable document.
pub fn execute_metadata(args: MetadataArgs, mut config: AppConfig, formatter: &Formatter) -> Result<String> {
    args.source.apply_to(&mut config);

    let source = DocumentSource::new(config.paths.source_dir.clone(), config.paths.extensions.clone())?;

    let mut entries = Vec::new();
    for path in source.discover()? {
        match source.read(&path) {
            Ok(document) => {
                entries.push(entry_for_document(&document, &args.license, &args.source_label));
            }
            Err(e) => warn!("Skipping document: {}", e),
        }
    }

    write_metadata_file(&config.paths.metadata, &entries)?;
    info!("Wrote {} entries to {}", entries.len(), config.paths.metadata.display());

    formatter.format_metadata_written(entries.len(), &config.paths.metadata)
}
