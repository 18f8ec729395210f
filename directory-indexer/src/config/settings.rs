//! Runtime settings read from the environment and command line.

use clap::Args;
use url::Url;

use crate::IndexingError;
use directory_repository::config::{DEFAULT_BULK_CHUNK_SIZE, DEFAULT_PAGE_SIZE, DEFAULT_SCROLL_TTL};
use directory_repository::opensearch::DEFAULT_INDEX_NAME;
use directory_repository::{IndexConfig, StoreConfig};

/// Default document store host.
const DEFAULT_HOST: &str = "localhost";

/// Default document store port.
const DEFAULT_PORT: u16 = 9200;

/// Connection and paging settings.
///
/// Every value can be given as a flag or through the environment (a `.env`
/// file is loaded first). Flags win over the environment.
#[derive(Debug, Clone, Args)]
pub struct Settings {
    /// Document store host, optionally with a scheme
    #[arg(long, env = "ELASTICSEARCH_HOST", default_value = DEFAULT_HOST, global = true)]
    pub host: String,

    /// Document store port
    #[arg(long, env = "ELASTICSEARCH_PORT", default_value_t = DEFAULT_PORT, global = true)]
    pub port: u16,

    /// Index holding the company documents
    #[arg(long, env = "ELASTICSEARCH_INDEX", default_value = DEFAULT_INDEX_NAME, global = true)]
    pub index: String,

    /// Hits per search page
    #[arg(long, env = "PAGE_SIZE", default_value_t = DEFAULT_PAGE_SIZE, global = true)]
    pub page_size: usize,

    /// Lifetime of a search cursor between requests
    #[arg(long, env = "SCROLL_TTL", default_value = DEFAULT_SCROLL_TTL, global = true)]
    pub scroll_ttl: String,

    /// Documents per bulk request during restore (0 sends the whole file at once)
    #[arg(long, env = "BULK_CHUNK_SIZE", default_value_t = DEFAULT_BULK_CHUNK_SIZE, global = true)]
    pub bulk_chunk_size: usize,
}

impl Settings {
    /// URL of the document store.
    ///
    /// The host is prefixed with `http://` unless it already carries a scheme.
    pub fn store_url(&self) -> Result<String, IndexingError> {
        let host = self.host.trim().trim_end_matches('/');
        if host.is_empty() {
            return Err(IndexingError::config("store host is empty"));
        }

        let raw = if host.contains("://") {
            format!("{}:{}", host, self.port)
        } else {
            format!("http://{}:{}", host, self.port)
        };

        let url = Url::parse(&raw)
            .map_err(|e| IndexingError::config(format!("invalid store URL {}: {}", raw, e)))?;
        Ok(url.to_string())
    }

    /// Paging and bulk settings for the pipeline.
    pub fn store_config(&self) -> Result<StoreConfig, IndexingError> {
        if self.page_size == 0 {
            return Err(IndexingError::config("page size must be positive"));
        }
        if self.scroll_ttl.trim().is_empty() {
            return Err(IndexingError::config("scroll TTL is empty"));
        }

        Ok(StoreConfig::default()
            .with_page_size(self.page_size)
            .with_scroll_ttl(self.scroll_ttl.trim())
            .with_bulk_chunk_size(self.bulk_chunk_size))
    }

    /// Index name and mapping.
    pub fn index_config(&self) -> IndexConfig {
        IndexConfig::new(self.index.trim())
    }
}
