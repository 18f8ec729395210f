//! In-memory implementation of the document store.
//!
//! Mirrors the semantics the pipeline relies on from the real index
//! (upsert by id, filtered search, scroll pagination) without a network
//! round-trip. Failures can be injected to exercise error paths.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::errors::StoreError;
use crate::interfaces::DocumentStore;
use crate::types::{BatchOperationResult, BatchOperationSummary};
use directory_shared::{CompanyDocument, SearchFilter, SearchHit, SearchPage};

#[derive(Default)]
struct State {
    documents: BTreeMap<String, CompanyDocument>,
    scrolls: HashMap<String, PendingScroll>,
    next_scroll: u64,
}

struct PendingScroll {
    remaining: Vec<SearchHit>,
    total: u64,
    page_size: usize,
}

/// Document store held in process memory.
///
/// Documents are kept ordered by id, so search results are deterministic.
/// Name filters match case-insensitive substrings; zip filters match exactly.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
    unavailable: AtomicBool,
    failing_ids: std::sync::RwLock<HashSet<String>>,
    bulk_calls: AtomicUsize,
    upsert_calls: AtomicUsize,
    search_calls: AtomicUsize,
    scroll_calls: AtomicUsize,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `documents`.
    pub fn with_documents(documents: impl IntoIterator<Item = CompanyDocument>) -> Self {
        let state = State {
            documents: documents
                .into_iter()
                .map(|doc| (doc.hash_object.clone(), doc))
                .collect(),
            ..State::default()
        };
        Self {
            state: Mutex::new(state),
            ..Self::default()
        }
    }

    /// Make every call fail with a connection error, as an unreachable backend would.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Make writes of the document with `id` fail.
    pub fn fail_writes_for(&self, id: impl Into<String>) {
        if let Ok(mut ids) = self.failing_ids.write() {
            ids.insert(id.into());
        }
    }

    /// Snapshot of every stored document, ordered by id.
    pub async fn documents(&self) -> Vec<CompanyDocument> {
        self.state.lock().await.documents.values().cloned().collect()
    }

    /// Look up a stored document by id.
    pub async fn get(&self, id: &str) -> Option<CompanyDocument> {
        self.state.lock().await.documents.get(id).cloned()
    }

    /// Number of bulk requests received.
    pub fn bulk_calls(&self) -> usize {
        self.bulk_calls.load(Ordering::SeqCst)
    }

    /// Number of single-document upserts received.
    pub fn upsert_calls(&self) -> usize {
        self.upsert_calls.load(Ordering::SeqCst)
    }

    /// Number of fresh searches received.
    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    /// Number of cursor continuations received.
    pub fn scroll_calls(&self) -> usize {
        self.scroll_calls.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::connection("in-memory store marked unavailable"));
        }
        Ok(())
    }

    fn write_fails(&self, id: &str) -> bool {
        self.failing_ids
            .read()
            .map(|ids| ids.contains(id))
            .unwrap_or(false)
    }

    fn matches(filter: &SearchFilter, doc: &CompanyDocument) -> bool {
        let name_matches = filter
            .name
            .as_ref()
            .map_or(true, |name| doc.name.to_lowercase().contains(&name.to_lowercase()));
        let zip_matches = filter.zip.as_ref().map_or(true, |zip| &doc.zip == zip);
        name_matches && zip_matches
    }

    /// Merge `incoming` into `existing` the way a partial document update does.
    fn merge(existing: &mut CompanyDocument, incoming: &CompanyDocument) {
        existing.name = incoming.name.clone();
        existing.zip = incoming.zip.clone();
        existing.website = incoming.website.clone();
        existing
            .extra
            .extend(incoming.extra.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    /// Cut the next page off a pending scroll and re-register what is left.
    fn next_page(state: &mut State, mut pending: PendingScroll) -> SearchPage {
        let take = pending.page_size.min(pending.remaining.len());
        let data: Vec<SearchHit> = pending.remaining.drain(..take).collect();
        let total = pending.total;

        state.next_scroll += 1;
        let scroll_id = format!("scroll-{}", state.next_scroll);
        state.scrolls.insert(scroll_id.clone(), pending);

        SearchPage {
            data,
            count: total,
            scroll: Some(scroll_id),
        }
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn ensure_index(&self) -> Result<(), StoreError> {
        self.check_available()
    }

    async fn count(&self) -> Result<u64, StoreError> {
        self.check_available()?;
        Ok(self.state.lock().await.documents.len() as u64)
    }

    async fn bulk_upsert(
        &self,
        documents: &[CompanyDocument],
    ) -> Result<BatchOperationSummary, StoreError> {
        self.check_available()?;
        self.bulk_calls.fetch_add(1, Ordering::SeqCst);

        let mut state = self.state.lock().await;
        let results = documents
            .iter()
            .map(|doc| {
                if self.write_fails(doc.id()) {
                    BatchOperationResult::failed(
                        doc.id(),
                        StoreError::bulk_operation("injected failure"),
                    )
                } else {
                    state
                        .documents
                        .insert(doc.hash_object.clone(), doc.clone());
                    BatchOperationResult::succeeded(doc.id())
                }
            })
            .collect();

        Ok(BatchOperationSummary::from_results(results))
    }

    async fn upsert(&self, document: &CompanyDocument) -> Result<(), StoreError> {
        self.check_available()?;
        self.upsert_calls.fetch_add(1, Ordering::SeqCst);

        if self.write_fails(document.id()) {
            return Err(StoreError::update(format!(
                "injected failure for {}",
                document.id()
            )));
        }

        let mut state = self.state.lock().await;
        match state.documents.get_mut(document.id()) {
            Some(existing) => Self::merge(existing, document),
            None => {
                state
                    .documents
                    .insert(document.hash_object.clone(), document.clone());
            }
        }
        Ok(())
    }

    async fn search(
        &self,
        filter: &SearchFilter,
        page_size: usize,
        _scroll_ttl: &str,
    ) -> Result<SearchPage, StoreError> {
        self.check_available()?;
        self.search_calls.fetch_add(1, Ordering::SeqCst);

        let mut state = self.state.lock().await;
        let remaining: Vec<SearchHit> = state
            .documents
            .values()
            .filter(|doc| Self::matches(filter, doc))
            .map(CompanyDocument::to_hit)
            .collect();

        let pending = PendingScroll {
            total: remaining.len() as u64,
            remaining,
            page_size,
        };
        Ok(Self::next_page(&mut state, pending))
    }

    async fn continue_cursor(
        &self,
        scroll_id: &str,
        _scroll_ttl: &str,
    ) -> Result<SearchPage, StoreError> {
        self.check_available()?;
        self.scroll_calls.fetch_add(1, Ordering::SeqCst);

        let mut state = self.state.lock().await;
        let pending = state.scrolls.remove(scroll_id).ok_or_else(|| {
            StoreError::scroll(format!("No search context found for {}", scroll_id))
        })?;
        Ok(Self::next_page(&mut state, pending))
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(!self.unavailable.load(Ordering::SeqCst))
    }

    async fn close(&self) -> Result<(), StoreError> {
        self.state.lock().await.scrolls.clear();
        Ok(())
    }
}
