//! OpenSearch client implementation.
//!
//! This module provides the concrete implementation of `DocumentStore`
//! using the OpenSearch Rust client.

use async_trait::async_trait;
use opensearch::{
    cluster::ClusterHealthParts,
    http::request::JsonBody,
    http::response::Response,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    indices::{IndicesCreateParts, IndicesExistsParts},
    BulkParts, ClearScrollParts, CountParts, OpenSearch, ScrollParts, SearchParts, UpdateParts,
};
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use crate::errors::StoreError;
use crate::interfaces::DocumentStore;
use crate::opensearch::index_config::IndexConfig;
use crate::opensearch::queries::{build_scroll_body, build_search_query};
use crate::opensearch::scrolls::ScrollRegistry;
use crate::types::{BatchOperationResult, BatchOperationSummary};
use directory_shared::{CompanyDocument, SearchFilter, SearchHit, SearchPage};

/// OpenSearch client implementation.
///
/// # Example
///
/// ```ignore
/// use directory_repository::opensearch::IndexConfig;
/// let client = OpenSearchClient::new("http://localhost:9200", IndexConfig::default())?;
/// client.ensure_index().await?;
///
/// let page = client.search(&SearchFilter::all().with_name("yawoen"), 100, "1m").await?;
/// println!("{} matches", page.count);
/// ```
pub struct OpenSearchClient {
    client: OpenSearch,
    index_config: IndexConfig,
    open_scrolls: Mutex<ScrollRegistry>,
}

impl OpenSearchClient {
    /// Create a new OpenSearch client for the specified URL.
    ///
    /// No request is sent; reachability is checked by `health_check`.
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchClient)` - A new client instance
    /// * `Err(StoreError)` - If the URL is invalid or the transport cannot be built
    pub fn new(url: &str, index_config: IndexConfig) -> Result<Self, StoreError> {
        let parsed_url = Url::parse(url).map_err(|e| StoreError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| StoreError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(
            url = %url,
            index = %index_config.name,
            "Created OpenSearch client"
        );

        Ok(Self {
            client,
            index_config,
            open_scrolls: Mutex::new(ScrollRegistry::default()),
        })
    }

    fn index(&self) -> &str {
        &self.index_config.name
    }

    /// Track the cursor `page` opened, forgetting the one it continued.
    async fn remember_scroll(&self, page: &SearchPage, continued: Option<&str>) {
        let mut scrolls = self.open_scrolls.lock().await;
        scrolls.track(page.scroll.as_deref(), continued);
        debug!(open = scrolls.len(), "Tracked scroll contexts");
    }

    /// Parse a single search hit.
    ///
    /// Returns `None` when the hit has no `_source` or lacks `name`/`zip`.
    /// Dropped hits are logged, since the page total still counts them.
    fn parse_hit(hit: &Value) -> Option<SearchHit> {
        let doc_id = hit.get("_id").and_then(Value::as_str).unwrap_or("unknown");
        let Some(source) = hit.get("_source") else {
            warn!(doc_id = %doc_id, "Dropping search hit without _source");
            return None;
        };

        match serde_json::from_value(source.clone()) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                warn!(doc_id = %doc_id, error = %e, "Dropping search hit with unusable _source");
                None
            }
        }
    }

    /// Parse a search or scroll response body into a page.
    ///
    /// `hits.total` is accepted both as a plain number and as the
    /// `{"value": n}` object newer engines return.
    fn parse_page(body: &Value) -> Result<SearchPage, StoreError> {
        let hits = body
            .get("hits")
            .ok_or_else(|| StoreError::parse("Response has no hits section"))?;

        let count = match hits.get("total") {
            Some(Value::Number(total)) => total.as_u64(),
            Some(total) => total.get("value").and_then(Value::as_u64),
            None => None,
        }
        .unwrap_or(0);

        let data = hits
            .get("hits")
            .and_then(Value::as_array)
            .map(|hits| hits.iter().filter_map(Self::parse_hit).collect())
            .unwrap_or_default();

        let scroll = body
            .get("_scroll_id")
            .and_then(Value::as_str)
            .map(String::from);

        Ok(SearchPage {
            data,
            count,
            scroll,
        })
    }

    /// Collect per-item outcomes from a bulk response body.
    fn parse_bulk_items(body: &Value) -> BatchOperationSummary {
        let results = body
            .get("items")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.get("index"))
                    .map(|action| {
                        let id = action
                            .get("_id")
                            .and_then(Value::as_str)
                            .unwrap_or_default()
                            .to_string();
                        match action.get("error") {
                            Some(err) => BatchOperationResult::failed(
                                id,
                                StoreError::bulk_operation(err.to_string()),
                            ),
                            None => BatchOperationResult::succeeded(id),
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();

        BatchOperationSummary::from_results(results)
    }

    async fn read_json(response: Response) -> Result<Value, StoreError> {
        response
            .json::<Value>()
            .await
            .map_err(|e| StoreError::parse(e.to_string()))
    }
}

#[async_trait]
impl DocumentStore for OpenSearchClient {
    /// Create the index with its mappings unless it already exists.
    #[instrument(skip(self), fields(index = %self.index_config.name))]
    async fn ensure_index(&self) -> Result<(), StoreError> {
        let exists = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[self.index()]))
            .send()
            .await
            .map_err(|e| StoreError::connection(e.to_string()))?;

        if exists.status_code().is_success() {
            debug!("Index already exists");
            return Ok(());
        }

        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(self.index()))
            .body(self.index_config.index_settings())
            .send()
            .await
            .map_err(|e| StoreError::index_creation(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            // Another writer may have created it between the two calls
            if error_body.contains("resource_already_exists_exception") {
                debug!("Index created concurrently");
                return Ok(());
            }
            error!(status = %status, body = %error_body, "Index creation failed");
            return Err(StoreError::index_creation(format!(
                "Index creation failed with status {}: {}",
                status, error_body
            )));
        }

        info!("Created index");
        Ok(())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let response = self
            .client
            .count(CountParts::Index(&[self.index()]))
            .send()
            .await
            .map_err(|e| StoreError::connection(e.to_string()))?;

        let status = response.status_code();
        if status.as_u16() == 404 {
            return Ok(0);
        }
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(StoreError::query(format!(
                "Count failed with status {}: {}",
                status, error_body
            )));
        }

        let body = Self::read_json(response).await?;
        body.get("count")
            .and_then(Value::as_u64)
            .ok_or_else(|| StoreError::parse("Count response has no count"))
    }

    /// Index all documents in one bulk request, using `hash_object` as `_id`.
    #[instrument(skip(self, documents), fields(count = documents.len()))]
    async fn bulk_upsert(
        &self,
        documents: &[CompanyDocument],
    ) -> Result<BatchOperationSummary, StoreError> {
        if documents.is_empty() {
            return Ok(BatchOperationSummary::default());
        }

        let mut body: Vec<JsonBody<Value>> = Vec::with_capacity(documents.len() * 2);
        for doc in documents {
            let source =
                serde_json::to_value(doc).map_err(|e| StoreError::serialization(e.to_string()))?;
            body.push(json!({"index": {"_id": doc.id()}}).into());
            body.push(source.into());
        }

        let response = self
            .client
            .bulk(BulkParts::Index(self.index()))
            .body(body)
            .send()
            .await
            .map_err(|e| StoreError::connection(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Bulk request failed");
            return Err(StoreError::bulk_operation(format!(
                "Bulk request failed with status {}: {}",
                status, error_body
            )));
        }

        let summary = Self::parse_bulk_items(&Self::read_json(response).await?);
        if summary.has_failures() {
            warn!(
                succeeded = summary.succeeded,
                failed = summary.failed,
                "Bulk request had item failures"
            );
        } else {
            debug!(count = summary.total, "Bulk request indexed documents");
        }
        Ok(summary)
    }

    /// Merge the document into the one with the same id, creating it if missing.
    ///
    /// API reference: https://docs.opensearch.org/latest/api-reference/document-apis/update-document/#using-the-upsert-operation
    async fn upsert(&self, document: &CompanyDocument) -> Result<(), StoreError> {
        let doc =
            serde_json::to_value(document).map_err(|e| StoreError::serialization(e.to_string()))?;

        let response = self
            .client
            .update(UpdateParts::IndexId(self.index(), document.id()))
            .body(json!({
                "doc": doc,
                "doc_as_upsert": true
            }))
            .send()
            .await
            .map_err(|e| StoreError::update(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(StoreError::update(format!(
                "Update failed with status {}: {}",
                status, error_body
            )));
        }

        debug!(doc_id = %document.id(), "Document updated/created");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn search(
        &self,
        filter: &SearchFilter,
        page_size: usize,
        scroll_ttl: &str,
    ) -> Result<SearchPage, StoreError> {
        let response = self
            .client
            .search(SearchParts::Index(&[self.index()]))
            .scroll(scroll_ttl)
            .size(page_size as i64)
            .body(build_search_query(filter))
            .send()
            .await
            .map_err(|e| StoreError::connection(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Search request failed");
            return Err(StoreError::query(format!(
                "Search failed with status {}: {}",
                status, error_body
            )));
        }

        let page = Self::parse_page(&Self::read_json(response).await?)?;
        self.remember_scroll(&page, None).await;

        debug!(hits = page.data.len(), total = page.count, "Search completed");
        Ok(page)
    }

    async fn continue_cursor(
        &self,
        scroll_id: &str,
        scroll_ttl: &str,
    ) -> Result<SearchPage, StoreError> {
        let response = self
            .client
            .scroll(ScrollParts::None)
            .body(build_scroll_body(scroll_id, scroll_ttl))
            .send()
            .await
            .map_err(|e| StoreError::connection(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(StoreError::scroll(format!(
                "Scroll failed with status {}: {}",
                status, error_body
            )));
        }

        let page = Self::parse_page(&Self::read_json(response).await?)?;
        self.remember_scroll(&page, Some(scroll_id)).await;
        Ok(page)
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        let response = self
            .client
            .cluster()
            .health(ClusterHealthParts::None)
            .send()
            .await
            .map_err(|e| StoreError::connection(e.to_string()))?;

        let health = Self::read_json(response).await?;
        let status = health
            .get("status")
            .and_then(Value::as_str)
            .unwrap_or("unknown");

        debug!(status = %status, "OpenSearch cluster status");
        Ok(status == "green" || status == "yellow")
    }

    /// Clear every scroll context this client has opened.
    async fn close(&self) -> Result<(), StoreError> {
        let scroll_ids = self.open_scrolls.lock().await.drain();
        if scroll_ids.is_empty() {
            return Ok(());
        }

        let response = self
            .client
            .clear_scroll(ClearScrollParts::None)
            .body(json!({ "scroll_id": scroll_ids }))
            .send()
            .await
            .map_err(|e| StoreError::connection(e.to_string()))?;

        // 404 means every context already expired
        let status = response.status_code();
        if !status.is_success() && status.as_u16() != 404 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %error_body, "Failed to clear scroll contexts");
        }

        debug!(count = scroll_ids.len(), "Cleared scroll contexts");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hit() {
        let hit = json!({
            "_id": "b3a5f3b3f59aae1c92a99c0b57964c9b8324c6abbc66edb8ba6bc1dfdbdf7de9",
            "_source": {
                "zip": "11111",
                "website": "http://www.yawoen.com/locations/pennsylvania/lancaster/17602/16738",
                "name": "yawoen"
            }
        });

        let result = OpenSearchClient::parse_hit(&hit).unwrap();

        assert_eq!(result.name, "yawoen");
        assert_eq!(result.zip, "11111");
        assert_eq!(
            result.website.as_deref(),
            Some("http://www.yawoen.com/locations/pennsylvania/lancaster/17602/16738")
        );
    }

    #[test]
    fn test_parse_hit_without_website() {
        let hit = json!({
            "_source": {
                "zip": "11111",
                "website": null,
                "name": "yawoen"
            }
        });

        let result = OpenSearchClient::parse_hit(&hit).unwrap();
        assert!(result.website.is_none());
    }

    #[test]
    fn test_parse_hit_invalid() {
        let hit = json!({
            "_source": {
                "website": "http://group.com"
            }
        });

        assert!(OpenSearchClient::parse_hit(&hit).is_none());
        assert!(OpenSearchClient::parse_hit(&json!({"_id": "x"})).is_none());
    }

    #[test]
    fn test_parse_page_skips_unusable_hits_but_keeps_total() {
        let body = json!({
            "_scroll_id": "abc",
            "hits": {
                "total": {"value": 2, "relation": "eq"},
                "hits": [
                    {"_id": "a", "_source": {"name": "group", "zip": "78229", "website": null}},
                    {"_id": "b", "_source": {"website": "http://broken.com"}}
                ]
            }
        });

        let page = OpenSearchClient::parse_page(&body).unwrap();
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].name, "group");
        assert_eq!(page.count, 2);
    }

    #[test]
    fn test_parse_page_legacy_total() {
        let body = json!({
            "_scroll_id": "next_page_hash",
            "hits": {
                "total": 2,
                "hits": [
                    { "_source": { "zip": "11111", "website": null, "name": "yawoen" } },
                    { "_source": { "zip": "22222", "website": null, "name": "group" } }
                ]
            }
        });

        let page = OpenSearchClient::parse_page(&body).unwrap();

        assert_eq!(page.count, 2);
        assert_eq!(page.data.len(), 2);
        assert_eq!(page.data[1].zip, "22222");
        assert_eq!(page.scroll.as_deref(), Some("next_page_hash"));
    }

    #[test]
    fn test_parse_page_object_total() {
        let body = json!({
            "_scroll_id": "abc",
            "hits": {
                "total": { "value": 250, "relation": "eq" },
                "hits": [
                    { "_source": { "zip": "30078", "website": null, "name": "dwight" } }
                ]
            }
        });

        let page = OpenSearchClient::parse_page(&body).unwrap();

        assert_eq!(page.count, 250);
        assert_eq!(page.data.len(), 1);
    }

    #[test]
    fn test_parse_page_empty() {
        let body = json!({
            "_scroll_id": "next_page_hash",
            "hits": { "total": 0, "hits": [] }
        });

        let page = OpenSearchClient::parse_page(&body).unwrap();
        assert_eq!(page.count, 0);
        assert!(page.data.is_empty());

        assert!(OpenSearchClient::parse_page(&json!({"error": "boom"})).is_err());
    }

    #[test]
    fn test_parse_bulk_items() {
        let body = json!({
            "errors": true,
            "items": [
                { "index": { "_id": "a", "status": 201 } },
                {
                    "index": {
                        "_id": "b",
                        "status": 400,
                        "error": { "type": "mapper_parsing_exception" }
                    }
                }
            ]
        });

        let summary = OpenSearchClient::parse_bulk_items(&body);

        assert_eq!(summary.total, 2);
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.results[1].id, "b");
        assert!(summary.results[1].error.is_some());
    }

    #[test]
    fn test_new_rejects_invalid_url() {
        let result = OpenSearchClient::new("not a url", IndexConfig::default());
        assert!(matches!(result, Err(StoreError::ConnectionError(_))));
    }
}
