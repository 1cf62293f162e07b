//! Photo-to-records pipeline.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, instrument};

use crate::cluster::ClusteringEngine;
use crate::config::MeishiConfig;
use crate::error::MeishiResult;
use crate::extract::FieldExtractor;
use crate::traits::OcrBackend;
use crate::types::{ContactRecord, ImageFormat, ScanOutcome, TextBlock};

/// Runs OCR, card segmentation and field extraction for one photo.
///
/// All state is immutable after construction, so a single pipeline can be
/// shared behind an `Arc` by concurrent requests.
pub struct CardPipeline {
    backend: Arc<dyn OcrBackend>,
    engine: ClusteringEngine,
    extractor: FieldExtractor,
    language_hints: Vec<String>,
}

impl CardPipeline {
    /// Create a pipeline from configuration.
    pub fn new(backend: Arc<dyn OcrBackend>, config: &MeishiConfig) -> MeishiResult<Self> {
        let extractor =
            FieldExtractor::new(config.extraction.clone(), config.vocabulary.clone())?;
        Ok(Self::with_components(
            backend,
            ClusteringEngine::new(config.clustering.clone()),
            extractor,
            config.ocr.language_hints.clone(),
        ))
    }

    /// Create a pipeline from already-built parts.
    pub fn with_components(
        backend: Arc<dyn OcrBackend>,
        engine: ClusteringEngine,
        extractor: FieldExtractor,
        language_hints: Vec<String>,
    ) -> Self {
        Self {
            backend,
            engine,
            extractor,
            language_hints,
        }
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    pub fn engine(&self) -> &ClusteringEngine {
        &self.engine
    }

    pub fn extractor(&self) -> &FieldExtractor {
        &self.extractor
    }

    /// Scan one photo.
    ///
    /// Invalid payloads and backend failures are errors; a photo without
    /// usable cards is an empty [`ScanOutcome`] variant.
    #[instrument(skip(self, image), fields(backend = self.backend.name(), bytes = image.len()))]
    pub async fn scan(&self, image: &[u8]) -> MeishiResult<ScanOutcome> {
        let format = ImageFormat::detect(image)?;
        let start = Instant::now();

        let blocks = self
            .backend
            .detect_text(image, &self.language_hints)
            .await?;
        debug!(
            %format,
            blocks = blocks.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "OCR finished"
        );

        let outcome = self.process_blocks(blocks);
        info!(
            status = outcome.status(),
            cards = outcome.records().len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Scan complete"
        );
        Ok(outcome)
    }

    /// Turn OCR blocks into contact records.
    ///
    /// Pure and deterministic: the same blocks always produce the same outcome.
    pub fn process_blocks(&self, blocks: Vec<TextBlock>) -> ScanOutcome {
        if blocks.is_empty() {
            return ScanOutcome::NoTextDetected;
        }

        let block_count = blocks.len();
        let set = self.engine.cluster(blocks);
        if set.clusters.is_empty() {
            debug!(
                blocks = block_count,
                rejected = set.rejected,
                "No card-shaped clusters"
            );
            return ScanOutcome::NoClustersAccepted {
                blocks: block_count,
            };
        }

        let cluster_count = set.clusters.len();
        let records: Vec<ContactRecord> = set
            .clusters
            .iter()
            .map(|cluster| self.extractor.extract(&cluster.full_text()))
            .filter(|record| {
                let keep = record.is_identifiable();
                if !keep {
                    debug!(fields = record.field_count(), "Dropping record without name, company or email");
                }
                keep
            })
            .take(self.engine.config().max_clusters)
            .collect();

        if records.is_empty() {
            ScanOutcome::NoUsableFields {
                clusters: cluster_count,
            }
        } else {
            ScanOutcome::Cards { records }
        }
    }
}

impl std::fmt::Debug for CardPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardPipeline")
            .field("backend", &self.backend.name())
            .field("engine", &self.engine)
            .field("language_hints", &self.language_hints)
            .finish_non_exhaustive()
    }
}
