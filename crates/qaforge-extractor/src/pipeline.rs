//! Pipeline driver: discover → read → segment → (extract → join → emit)*

use crate::chunking::Segmenter;
use crate::config::{ExtractorConfig, PipelineConfig, SegmenterConfig};
use crate::error::ExtractorError;
use crate::extractor::Extractor;
use crate::report::RunReport;
use crate::tokenizer::HfTokenizer;
use qaforge_domain::traits::{CompletionProvider, RecordSink, TokenCodec};
use qaforge_domain::{ExtractionRecord, MetadataEntry, Provenance};
use qaforge_store::{DocumentSource, MetadataStore};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Drives a run over every document in the source directory
///
/// Per-segment failures are counted and skipped, and an unreadable document
/// is skipped as a whole. The only errors that end a run early are discovery
/// failures and a failing output sink.
///
/// With `workers > 1` documents are processed concurrently, but the sink is
/// still written from one place: records travel over a channel to the loop
/// in [`Pipeline::run`].
pub struct Pipeline<P, C = HfTokenizer> {
    inner: Arc<Shared<P, C>>,
}

struct Shared<P, C> {
    extractor: Extractor<P>,
    segmenter: Segmenter<C>,
    source: DocumentSource,
    metadata: MetadataStore,
    config: PipelineConfig,
}

impl<P> Pipeline<P, HfTokenizer>
where
    P: CompletionProvider,
    P::Error: Display,
{
    /// Assemble a pipeline from its configuration sections
    ///
    /// # Errors
    ///
    /// Any invalid setting, a missing source directory, or (when metadata is
    /// required) a missing or malformed metadata file.
    pub fn from_config(
        provider: P,
        segmenter: SegmenterConfig,
        extractor: ExtractorConfig,
        pipeline: PipelineConfig,
    ) -> Result<Self, ExtractorError> {
        extractor.validate().map_err(ExtractorError::Config)?;
        pipeline.validate().map_err(ExtractorError::Config)?;

        let segmenter = Segmenter::from_config(segmenter)?;
        let source = DocumentSource::new(pipeline.source_dir.clone(), pipeline.extensions.clone())?;
        let metadata = if pipeline.require_metadata {
            MetadataStore::load(&pipeline.metadata_path)?
        } else {
            MetadataStore::load_or_empty(&pipeline.metadata_path)?
        };

        Self::new(
            Extractor::new(provider, extractor),
            segmenter,
            source,
            metadata,
            pipeline,
        )
    }
}

impl<P, C> Pipeline<P, C> {
    /// Create a pipeline from prebuilt components
    pub fn new(
        extractor: Extractor<P>,
        segmenter: Segmenter<C>,
        source: DocumentSource,
        metadata: MetadataStore,
        config: PipelineConfig,
    ) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Config)?;
        Ok(Self {
            inner: Arc::new(Shared {
                extractor,
                segmenter,
                source,
                metadata,
                config,
            }),
        })
    }

    /// Pipeline configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.inner.config
    }

    /// Segmenter in use
    pub fn segmenter(&self) -> &Segmenter<C> {
        &self.inner.segmenter
    }
}

impl<P, C> Pipeline<P, C>
where
    P: CompletionProvider + Send + Sync + 'static,
    P::Error: Display,
    C: TokenCodec + Send + Sync + 'static,
    C::Error: Display,
{
    /// Process every discovered document, appending records to `sink`
    ///
    /// # Errors
    ///
    /// Discovery failure, or the sink rejecting a record. Records written
    /// before the failure stay in the output.
    pub async fn run<S>(&self, sink: &mut S) -> Result<RunReport, ExtractorError>
    where
        S: RecordSink,
        S::Error: Display,
    {
        let paths = self.inner.source.discover()?;
        let mut report = RunReport::new();
        report.documents_discovered = paths.len();

        info!(
            "Discovered {} documents in {} ({:?} segmentation, {} workers)",
            paths.len(),
            self.inner.source.root().display(),
            self.inner.segmenter.mode(),
            self.inner.config.workers
        );

        if self.inner.config.workers <= 1 {
            self.run_sequential(&paths, sink, &mut report).await?;
        } else {
            self.run_concurrent(paths, sink, &mut report).await?;
        }

        info!(
            "Run complete: {} records from {} documents",
            report.records_written, report.documents_processed
        );
        Ok(report)
    }

    async fn run_sequential<S>(
        &self,
        paths: &[PathBuf],
        sink: &mut S,
        report: &mut RunReport,
    ) -> Result<(), ExtractorError>
    where
        S: RecordSink,
        S::Error: Display,
    {
        let mut written = 0;
        for (idx, path) in paths.iter().enumerate() {
            debug!("Document {}/{}", idx + 1, paths.len());
            let doc_report = self
                .inner
                .process_document(path, |record| {
                    write_record(sink, &record)?;
                    written += 1;
                    Ok(())
                })
                .await?;
            report.merge(&doc_report);
        }
        report.records_written += written;
        Ok(())
    }

    async fn run_concurrent<S>(
        &self,
        paths: Vec<PathBuf>,
        sink: &mut S,
        report: &mut RunReport,
    ) -> Result<(), ExtractorError>
    where
        S: RecordSink,
        S::Error: Display,
    {
        let permits = Arc::new(Semaphore::new(self.inner.config.workers));
        let (tx, mut rx) = mpsc::unbounded_channel::<ExtractionRecord>();
        let mut tasks = JoinSet::new();

        for path in paths {
            let inner = Arc::clone(&self.inner);
            let permits = Arc::clone(&permits);
            let tx = tx.clone();
            tasks.spawn(async move {
                let _permit = permits
                    .acquire_owned()
                    .await
                    .map_err(|e| ExtractorError::Task(e.to_string()))?;
                inner
                    .process_document(&path, move |record| {
                        tx.send(record)
                            .map_err(|_| ExtractorError::Sink("output writer stopped".to_string()))
                    })
                    .await
            });
        }
        drop(tx);

        // Dropping `tasks` on an early return aborts the remaining workers
        while let Some(record) = rx.recv().await {
            write_record(sink, &record)?;
            report.records_written += 1;
        }

        while let Some(joined) = tasks.join_next().await {
            let doc_report = joined.map_err(|e| ExtractorError::Task(e.to_string()))??;
            report.merge(&doc_report);
        }
        Ok(())
    }
}

impl<P, C> Shared<P, C>
where
    P: CompletionProvider,
    P::Error: Display,
    C: TokenCodec,
    C::Error: Display,
{
    /// Read, segment and extract one document, handing each record to `emit`
    ///
    /// The returned report never counts written records; the caller owns
    /// the sink and does that.
    async fn process_document<F>(&self, path: &Path, mut emit: F) -> Result<RunReport, ExtractorError>
    where
        F: FnMut(ExtractionRecord) -> Result<(), ExtractorError>,
    {
        let mut report = RunReport::new();

        let document = match self.source.read(path) {
            Ok(document) => document,
            Err(e) => {
                warn!("Skipping document: {}", e);
                report.documents_skipped = 1;
                return Ok(report);
            }
        };

        let entry = self.metadata.get(&document.name);
        if entry.is_none() {
            if self.config.require_metadata {
                warn!("Skipping {}: no metadata entry", document.name);
                report.documents_skipped = 1;
                return Ok(report);
            }
            warn!("{}: no metadata entry; provenance defaults to \"unknown\"", document.name);
        }
        let provenance = entry
            .map(MetadataEntry::provenance)
            .unwrap_or_else(Provenance::unknown);

        let mismatch = entry.is_some_and(|e| e.hash_mismatch(&document.hash_md5));
        if mismatch {
            warn!(
                "{}: content hash {} differs from metadata; records carry the current hash",
                document.name, document.hash_md5
            );
            report.hash_mismatches = 1;
        }

        let segments = match self.segmenter.segment(&document) {
            Ok(segments) => segments,
            Err(e) => {
                warn!("Skipping {}: {}", document.name, e);
                report.documents_skipped = 1;
                return Ok(report);
            }
        };

        info!("Processing {} ({} bytes)", document.name, document.size);

        for segment in segments {
            let segment = match segment {
                Ok(segment) => segment,
                Err(e) => {
                    warn!("{}: {}", document.name, e);
                    report.segments_total += 1;
                    report.segments_failed += 1;
                    continue;
                }
            };

            let outcome = self.extractor.extract(&segment).await;
            report.record_segment(&outcome.status, outcome.dropped);

            for pair in outcome.pairs {
                let record = ExtractionRecord::new(pair, &document, &provenance)
                    .with_hash_mismatch(mismatch);
                debug!(
                    "Record {} from {} segment {}",
                    record.id,
                    document.name,
                    segment.index + 1
                );
                emit(record)?;
            }
        }

        report.documents_processed = 1;
        Ok(report)
    }
}

fn write_record<S>(sink: &mut S, record: &ExtractionRecord) -> Result<(), ExtractorError>
where
    S: RecordSink,
    S::Error: Display,
{
    sink.append(record)
        .map_err(|e| ExtractorError::Sink(e.to_string()))
}
