//! Orchestrator module for the ingestion pipeline.
//!
//! Coordinates the reader, processor, and loader components behind the
//! three operations callers use: `restore`, `update`, and `retrieve`.

use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::errors::PipelineError;
use crate::loader::{StoreLoader, UpdateOutcome};
use crate::processor::{Header, LineOutcome, RecordParser};
use crate::query::RetrievalRequest;
use crate::reader::LineReader;
use directory_repository::{DocumentStore, StoreConfig, StoreError};
use directory_shared::{CompanyDocument, SearchPage};

/// Status message returned by a successful ingestion.
pub const SUCCESS_MESSAGE: &str = "File successfully processed.";

/// A document that could not be written.
#[derive(Debug, Clone)]
pub struct RecordFailure {
    pub id: String,
    pub error: StoreError,
}

/// Summary of one ingestion call.
#[derive(Debug, Clone)]
pub struct IngestReport {
    /// Human-readable status.
    pub message: &'static str,
    /// Valid records parsed from the file.
    pub records: usize,
    /// Lines skipped because their field count didn't match the header.
    pub malformed: usize,
    /// Documents the store accepted.
    pub written: usize,
    /// Documents the store rejected.
    pub failures: Vec<RecordFailure>,
}

impl IngestReport {
    fn new(records: usize, malformed: usize) -> Self {
        Self {
            message: SUCCESS_MESSAGE,
            records,
            malformed,
            written: 0,
            failures: Vec::new(),
        }
    }

    /// Number of documents the store rejected.
    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}

/// Entry point of the pipeline.
///
/// Holds the injected document store for the lifetime of the process. Each
/// call runs to completion before returning.
pub struct DataProcess {
    store: Arc<dyn DocumentStore>,
    loader: StoreLoader,
    config: StoreConfig,
}

impl DataProcess {
    /// Create a pipeline over `store` without contacting it.
    pub fn new(store: Arc<dyn DocumentStore>, config: StoreConfig) -> Self {
        Self {
            loader: StoreLoader::with_config(store.clone(), config.clone()),
            store,
            config,
        }
    }

    /// Create a pipeline after verifying the store is reachable and the index exists.
    ///
    /// # Returns
    ///
    /// * `Ok(DataProcess)` - Ready to serve calls
    /// * `Err(PipelineError::ConnectionElasticSearch)` - If the store is unreachable
    pub async fn connect(
        store: Arc<dyn DocumentStore>,
        config: StoreConfig,
    ) -> Result<Self, PipelineError> {
        let healthy = store
            .health_check()
            .await
            .map_err(|e| PipelineError::connection(e.to_string()))?;
        if !healthy {
            return Err(PipelineError::connection("document store is unhealthy"));
        }

        store
            .ensure_index()
            .await
            .map_err(|e| PipelineError::connection(e.to_string()))?;

        info!("Document store ready");
        Ok(Self::new(store, config))
    }

    /// Initial load of an empty index from the file at `path`.
    ///
    /// Fails with `InitialImport` before opening the file when the index
    /// already holds documents. The whole file is parsed before anything is
    /// written, so a read failure leaves the index untouched. Malformed lines
    /// are skipped.
    #[instrument(skip(self, path), fields(path = %path.display()))]
    pub async fn restore(&self, path: &Path) -> Result<IngestReport, PipelineError> {
        let count = self
            .store
            .count()
            .await
            .map_err(|e| PipelineError::connection(e.to_string()))?;
        if count > 0 {
            warn!(count = count, "Refusing initial import into a non-empty index");
            return Err(PipelineError::initial_import(count));
        }

        let mut reader = LineReader::open(path).await?;
        let parser = Self::read_header(&mut reader).await?;

        let mut documents: Vec<CompanyDocument> = Vec::new();
        let mut malformed = 0;
        while let Some(line) = reader.next_line().await? {
            match parser.parse_line(&line) {
                LineOutcome::Record(document) => documents.push(document),
                LineOutcome::Blank => {}
                LineOutcome::Malformed { expected, found } => {
                    debug!(
                        line = reader.line_number(),
                        expected = expected,
                        found = found,
                        "Skipping malformed line"
                    );
                    malformed += 1;
                }
            }
        }

        let mut report = IngestReport::new(documents.len(), malformed);
        let summary = self.loader.bulk_load(&documents).await?;
        report.written = summary.succeeded;
        report.failures = summary
            .results
            .into_iter()
            .filter(|result| !result.success)
            .filter_map(|result| {
                result.error.map(|error| RecordFailure {
                    id: result.id,
                    error,
                })
            })
            .collect();

        info!(
            records = report.records,
            malformed = report.malformed,
            written = report.written,
            failed = report.failed(),
            "Initial import finished"
        );
        Ok(report)
    }

    /// Incremental update from the file at `path`.
    ///
    /// Every valid record is upserted as soon as it is parsed. A failed
    /// upsert is recorded in the report and the stream continues; only a
    /// failure to read the file aborts the call.
    #[instrument(skip(self, path), fields(path = %path.display()))]
    pub async fn update(&self, path: &Path) -> Result<IngestReport, PipelineError> {
        let mut reader = LineReader::open(path).await?;
        let parser = Self::read_header(&mut reader).await?;

        let mut report = IngestReport::new(0, 0);
        while let Some(line) = reader.next_line().await? {
            match parser.parse_line(&line) {
                LineOutcome::Record(document) => {
                    report.records += 1;
                    match self.loader.apply_update(&document).await {
                        UpdateOutcome::Applied { .. } => report.written += 1,
                        UpdateOutcome::Failed { id, error } => {
                            report.failures.push(RecordFailure { id, error })
                        }
                    }
                }
                LineOutcome::Blank => {}
                LineOutcome::Malformed { expected, found } => {
                    debug!(
                        line = reader.line_number(),
                        expected = expected,
                        found = found,
                        "Skipping malformed line"
                    );
                    report.malformed += 1;
                }
            }
        }

        info!(
            records = report.records,
            malformed = report.malformed,
            written = report.written,
            failed = report.failed(),
            "Update finished"
        );
        Ok(report)
    }

    /// Fetch one page of results.
    ///
    /// With a cursor, the next page of that search is returned and `name`
    /// and `zip` are ignored. Without one, a new search is started with the
    /// configured page size and cursor lifetime.
    #[instrument(skip(self))]
    pub async fn retrieve(
        &self,
        name: Option<String>,
        zip: Option<String>,
        scroll_id: Option<String>,
    ) -> Result<SearchPage, PipelineError> {
        let had_filters = name.is_some() || zip.is_some();
        let request = RetrievalRequest::from_params(name, zip, scroll_id);

        let page = match &request {
            RetrievalRequest::Continue { scroll_id } => {
                if had_filters {
                    debug!("Cursor supplied, ignoring filters");
                }
                self.store
                    .continue_cursor(scroll_id, &self.config.scroll_ttl)
                    .await
            }
            RetrievalRequest::Fresh(filter) => {
                self.store
                    .search(filter, self.config.page_size, &self.config.scroll_ttl)
                    .await
            }
        }
        .map_err(|e| PipelineError::connection(e.to_string()))?;

        debug!(hits = page.data.len(), total = page.count, "Retrieved page");
        Ok(page)
    }

    /// Release the store's resources. Call once at shutdown.
    pub async fn shutdown(&self) -> Result<(), PipelineError> {
        self.store
            .close()
            .await
            .map_err(|e| PipelineError::connection(e.to_string()))
    }

    async fn read_header<R>(reader: &mut LineReader<R>) -> Result<RecordParser, PipelineError>
    where
        R: tokio::io::AsyncBufRead + Unpin,
    {
        let line = reader
            .next_line()
            .await?
            .ok_or_else(|| PipelineError::process_file("file is empty"))?;
        let header = Header::parse(&line).map_err(|e| PipelineError::process_file(e.to_string()))?;

        debug!(columns = header.field_count(), "Parsed header");
        Ok(RecordParser::new(header))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use directory_repository::BatchOperationSummary;
    use directory_shared::{SearchFilter, SearchHit};
    use std::sync::Mutex;

    /// Mock store answering searches with a canned page and recording calls.
    struct MockStore {
        page: SearchPage,
        searches: Mutex<Vec<(SearchFilter, usize, String)>>,
        scrolls: Mutex<Vec<String>>,
        healthy: bool,
    }

    impl MockStore {
        fn new(page: SearchPage) -> Self {
            Self {
                page,
                searches: Mutex::new(Vec::new()),
                scrolls: Mutex::new(Vec::new()),
                healthy: true,
            }
        }
    }

    #[async_trait]
    impl DocumentStore for MockStore {
        async fn ensure_index(&self) -> Result<(), StoreError> {
            Ok(())
        }

        async fn count(&self) -> Result<u64, StoreError> {
            Ok(0)
        }

        async fn bulk_upsert(
            &self,
            _documents: &[CompanyDocument],
        ) -> Result<BatchOperationSummary, StoreError> {
            Ok(BatchOperationSummary::default())
        }

        async fn upsert(&self, _document: &CompanyDocument) -> Result<(), StoreError> {
            Ok(())
        }

        async fn search(
            &self,
            filter: &SearchFilter,
            page_size: usize,
            scroll_ttl: &str,
        ) -> Result<SearchPage, StoreError> {
            self.searches
                .lock()
                .unwrap()
                .push((filter.clone(), page_size, scroll_ttl.to_string()));
            Ok(self.page.clone())
        }

        async fn continue_cursor(
            &self,
            scroll_id: &str,
            _scroll_ttl: &str,
        ) -> Result<SearchPage, StoreError> {
            self.scrolls.lock().unwrap().push(scroll_id.to_string());
            Ok(self.page.clone())
        }

        async fn health_check(&self) -> Result<bool, StoreError> {
            Ok(self.healthy)
        }
    }

    fn one_hit_page() -> SearchPage {
        SearchPage {
            data: vec![SearchHit {
                name: "dwight".to_string(),
                zip: "30078".to_string(),
                website: Some("http://dwight.com".to_string()),
            }],
            count: 1,
            scroll: Some("next_page_hash".to_string()),
        }
    }

    #[tokio::test]
    async fn test_retrieve_by_name_and_zip() {
        let store = Arc::new(MockStore::new(one_hit_page()));
        let process = DataProcess::new(store.clone(), StoreConfig::default());

        let page = process
            .retrieve(Some("dwight".to_string()), Some("30078".to_string()), None)
            .await
            .unwrap();

        assert_eq!(page.data.len(), 1);
        assert_eq!(page.count, 1);
        assert_eq!(page.scroll.as_deref(), Some("next_page_hash"));

        let searches = store.searches.lock().unwrap();
        assert_eq!(searches.len(), 1);
        let (filter, page_size, ttl) = &searches[0];
        assert_eq!(filter.name.as_deref(), Some("dwight"));
        assert_eq!(filter.zip.as_deref(), Some("30078"));
        assert_eq!(*page_size, 100);
        assert_eq!(ttl, "1m");
    }

    #[tokio::test]
    async fn test_retrieve_without_filters_is_unconstrained() {
        let store = Arc::new(MockStore::new(SearchPage::empty()));
        let process = DataProcess::new(store.clone(), StoreConfig::default());

        let page = process.retrieve(None, None, None).await.unwrap();

        assert_eq!(page.count, 0);
        assert!(page.data.is_empty());
        assert!(store.searches.lock().unwrap()[0].0.is_unconstrained());
    }

    #[tokio::test]
    async fn test_retrieve_with_cursor_ignores_filters() {
        let store = Arc::new(MockStore::new(one_hit_page()));
        let process = DataProcess::new(store.clone(), StoreConfig::default());

        process
            .retrieve(
                Some("yawoen".to_string()),
                Some("22222".to_string()),
                Some("next_page_hash".to_string()),
            )
            .await
            .unwrap();

        assert!(store.searches.lock().unwrap().is_empty());
        assert_eq!(*store.scrolls.lock().unwrap(), vec!["next_page_hash".to_string()]);
    }

    #[tokio::test]
    async fn test_retrieve_uses_configured_page_size() {
        let store = Arc::new(MockStore::new(SearchPage::empty()));
        let config = StoreConfig::default().with_page_size(25).with_scroll_ttl("5m");
        let process = DataProcess::new(store.clone(), config);

        process.retrieve(Some("group".to_string()), None, None).await.unwrap();

        let searches = store.searches.lock().unwrap();
        assert_eq!(searches[0].1, 25);
        assert_eq!(searches[0].2, "5m");
    }

    #[tokio::test]
    async fn test_connect_rejects_unhealthy_store() {
        let mut store = MockStore::new(SearchPage::empty());
        store.healthy = false;

        let result = DataProcess::connect(Arc::new(store), StoreConfig::default()).await;
        assert!(matches!(result, Err(PipelineError::ConnectionElasticSearch(_))));
    }
}
