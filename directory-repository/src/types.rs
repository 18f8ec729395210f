//! Result types for document store write operations.

use crate::errors::StoreError;

/// Result of a batch operation for a single document.
///
/// Indicates whether the write for one document id succeeded and carries
/// the error details if it failed.
#[derive(Debug, Clone)]
pub struct BatchOperationResult {
    /// The document identity (`hash_object`).
    pub id: String,
    /// Whether the operation succeeded.
    pub success: bool,
    /// Error if the operation failed.
    pub error: Option<StoreError>,
}

impl BatchOperationResult {
    /// A successful result for `id`.
    pub fn succeeded(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            success: true,
            error: None,
        }
    }

    /// A failed result for `id`.
    pub fn failed(id: impl Into<String>, error: StoreError) -> Self {
        Self {
            id: id.into(),
            success: false,
            error: Some(error),
        }
    }
}

/// Summary of a batch operation containing aggregate statistics and individual results.
///
/// Lets callers handle partial failures of a bulk write.
#[derive(Debug, Clone, Default)]
pub struct BatchOperationSummary {
    /// Total number of items in the batch.
    pub total: usize,
    /// Number of successful operations.
    pub succeeded: usize,
    /// Number of failed operations.
    pub failed: usize,
    /// Individual results for each item.
    pub results: Vec<BatchOperationResult>,
}

impl BatchOperationSummary {
    /// Build a summary from individual results.
    pub fn from_results(results: Vec<BatchOperationResult>) -> Self {
        let succeeded = results.iter().filter(|r| r.success).count();
        Self {
            total: results.len(),
            succeeded,
            failed: results.len() - succeeded,
            results,
        }
    }

    /// Fold another summary into this one.
    pub fn merge(&mut self, other: BatchOperationSummary) {
        self.total += other.total;
        self.succeeded += other.succeeded;
        self.failed += other.failed;
        self.results.extend(other.results);
    }

    /// Whether any item failed.
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}
