//! Configuration types for document store access.

/// Default number of hits per search page.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Default lifetime of a scroll cursor between requests.
pub const DEFAULT_SCROLL_TTL: &str = "1m";

/// Default number of documents sent per bulk request.
pub const DEFAULT_BULK_CHUNK_SIZE: usize = 1000;

/// Configuration for reads and writes against the document store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Number of hits returned per search page.
    pub page_size: usize,
    /// How long the store keeps a scroll cursor alive between requests.
    pub scroll_ttl: String,
    /// Maximum number of documents in a single bulk request.
    /// Set to None to send a whole file in one request.
    pub bulk_chunk_size: Option<usize>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            scroll_ttl: DEFAULT_SCROLL_TTL.to_string(),
            bulk_chunk_size: Some(DEFAULT_BULK_CHUNK_SIZE),
        }
    }
}

impl StoreConfig {
    /// Create a config that sends every bulk load as a single request.
    pub fn unchunked() -> Self {
        Self {
            bulk_chunk_size: None,
            ..Self::default()
        }
    }

    /// Set the page size.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the scroll lifetime (store duration syntax, e.g. `"1m"`).
    pub fn with_scroll_ttl(mut self, scroll_ttl: impl Into<String>) -> Self {
        self.scroll_ttl = scroll_ttl.into();
        self
    }

    /// Set the bulk chunk size. Zero disables chunking.
    pub fn with_bulk_chunk_size(mut self, chunk_size: usize) -> Self {
        self.bulk_chunk_size = (chunk_size > 0).then_some(chunk_size);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.page_size, 100);
        assert_eq!(config.scroll_ttl, "1m");
        assert_eq!(config.bulk_chunk_size, Some(1000));
    }

    #[test]
    fn test_zero_chunk_size_disables_chunking() {
        let config = StoreConfig::default().with_bulk_chunk_size(0);
        assert_eq!(config.bulk_chunk_size, None);
        assert_eq!(StoreConfig::unchunked().bulk_chunk_size, None);
    }
}
