//! Document store trait definition.
//!
//! This module defines the abstract interface the ingestion pipeline uses
//! against the external index, allowing for different backend
//! implementations (OpenSearch, in-memory, etc.).

use async_trait::async_trait;

use crate::errors::StoreError;
use crate::types::BatchOperationSummary;
use directory_shared::{CompanyDocument, SearchFilter, SearchPage};

/// Abstracts the underlying document store (OpenSearch, Elasticsearch, in-memory).
///
/// Implementations are constructed once per process and injected into the
/// pipeline, which only ever talks to the store through this trait. This is
/// also the seam where the pipeline is tested with a fake store.
///
/// All methods return `Result<T, StoreError>` for consistent error handling
/// across backends. No method retries internally.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Ensure the index exists with the proper mappings.
    ///
    /// Creating an index that already exists is not an error.
    async fn ensure_index(&self) -> Result<(), StoreError>;

    /// Number of documents currently in the index.
    async fn count(&self) -> Result<u64, StoreError>;

    /// Write many documents in a single request, each addressed by its
    /// `hash_object`. Existing documents with the same id are replaced.
    ///
    /// # Returns
    ///
    /// * `Ok(BatchOperationSummary)` - Per-document outcome of the request
    /// * `Err(StoreError)` - If the request failed as a whole
    async fn bulk_upsert(
        &self,
        documents: &[CompanyDocument],
    ) -> Result<BatchOperationSummary, StoreError>;

    /// Merge a single document into the one stored under its `hash_object`,
    /// creating it if it doesn't exist.
    async fn upsert(&self, document: &CompanyDocument) -> Result<(), StoreError>;

    /// Start a paginated search.
    ///
    /// # Arguments
    ///
    /// * `filter` - Optional name and zip constraints
    /// * `page_size` - Maximum number of hits in the returned page
    /// * `scroll_ttl` - How long the store keeps the cursor alive
    ///
    /// # Returns
    ///
    /// * `Ok(SearchPage)` - The first page, the total match count and the cursor
    /// * `Err(StoreError)` - If the search fails
    async fn search(
        &self,
        filter: &SearchFilter,
        page_size: usize,
        scroll_ttl: &str,
    ) -> Result<SearchPage, StoreError>;

    /// Fetch the next page of a search started with [`DocumentStore::search`].
    ///
    /// The cursor is passed through untouched; only the store interprets it.
    async fn continue_cursor(
        &self,
        scroll_id: &str,
        scroll_ttl: &str,
    ) -> Result<SearchPage, StoreError>;

    /// Check if the store is healthy and reachable.
    async fn health_check(&self) -> Result<bool, StoreError>;

    /// Release resources held on behalf of this client (open cursors).
    ///
    /// Called once at shutdown. The default does nothing.
    async fn close(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
