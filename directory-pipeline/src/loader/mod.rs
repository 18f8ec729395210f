//! Loader module for the ingestion pipeline.
//!
//! Writes parsed documents into the document store, either as bulk
//! requests (initial load) or one upsert per document (incremental update).

use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use crate::errors::PipelineError;
use directory_repository::{
    BatchOperationResult, BatchOperationSummary, DocumentStore, StoreConfig, StoreError,
};
use directory_shared::CompanyDocument;

/// Outcome of upserting a single document during an incremental update.
#[derive(Debug, Clone)]
pub enum UpdateOutcome {
    /// The document was written.
    Applied { id: String },
    /// The write failed; the update carried on with the next record.
    Failed { id: String, error: StoreError },
}

impl UpdateOutcome {
    pub fn id(&self) -> &str {
        match self {
            Self::Applied { id } | Self::Failed { id, .. } => id,
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// Loader that writes documents into the document store.
///
/// The loader is responsible for:
/// - Splitting bulk loads into requests of at most `bulk_chunk_size` documents
/// - Applying single-document upserts without letting one failure stop the caller
pub struct StoreLoader {
    store: Arc<dyn DocumentStore>,
    config: StoreConfig,
}

impl StoreLoader {
    /// Create a new loader with default configuration.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            config: StoreConfig::default(),
        }
    }

    /// Create a new loader with custom configuration.
    pub fn with_config(store: Arc<dyn DocumentStore>, config: StoreConfig) -> Self {
        Self { store, config }
    }

    /// Bulk-write every document.
    ///
    /// All chunks are attempted in order, even after one of them fails as a
    /// whole. The documents of a failed chunk are recorded as failed and the
    /// first request error is returned once every chunk has been sent.
    /// Individual item failures are collected in the returned summary.
    #[instrument(skip(self, documents), fields(count = documents.len()))]
    pub async fn bulk_load(
        &self,
        documents: &[CompanyDocument],
    ) -> Result<BatchOperationSummary, PipelineError> {
        let mut summary = BatchOperationSummary::default();
        if documents.is_empty() {
            debug!("Nothing to load");
            return Ok(summary);
        }

        let chunk_size = self
            .config
            .bulk_chunk_size
            .filter(|size| *size > 0)
            .unwrap_or(documents.len());
        let mut first_error: Option<StoreError> = None;
        for (chunk_number, chunk) in documents.chunks(chunk_size).enumerate() {
            match self.store.bulk_upsert(chunk).await {
                Ok(chunk_summary) => {
                    debug!(
                        chunk = chunk_number,
                        succeeded = chunk_summary.succeeded,
                        failed = chunk_summary.failed,
                        "Loaded chunk"
                    );
                    summary.merge(chunk_summary);
                }
                Err(e) => {
                    error!(error = %e, chunk = chunk_number, "Bulk request failed");
                    summary.merge(BatchOperationSummary::from_results(
                        chunk
                            .iter()
                            .map(|doc| BatchOperationResult::failed(doc.id(), e.clone()))
                            .collect(),
                    ));
                    first_error.get_or_insert(e);
                }
            }
        }

        if let Some(e) = first_error {
            error!(
                succeeded = summary.succeeded,
                failed = summary.failed,
                "Bulk load finished with rejected requests"
            );
            return Err(PipelineError::from_write(e));
        }

        if summary.has_failures() {
            warn!(
                succeeded = summary.succeeded,
                failed = summary.failed,
                "Bulk load completed with item failures"
            );
        } else {
            info!(count = summary.succeeded, "Bulk load completed");
        }
        Ok(summary)
    }

    /// Upsert a single document, capturing failure instead of returning it.
    pub async fn apply_update(&self, document: &CompanyDocument) -> UpdateOutcome {
        match self.store.upsert(document).await {
            Ok(()) => UpdateOutcome::Applied {
                id: document.id().to_string(),
            },
            Err(e) => {
                // Best effort: the caller keeps streaming
                warn!(doc_id = %document.id(), error = %e, "Failed to update document");
                UpdateOutcome::Failed {
                    id: document.id().to_string(),
                    error: e,
                }
            }
        }
    }
}
