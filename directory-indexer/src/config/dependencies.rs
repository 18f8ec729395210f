//! Dependency initialization and wiring for the indexer.

use std::sync::Arc;
use tracing::info;

use crate::config::Settings;
use crate::IndexingError;
use directory_pipeline::{DataProcess, PipelineError};
use directory_repository::{DocumentStore, OpenSearchClient};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The pipeline, connected to a reachable store with its index in place.
    pub data_process: DataProcess,
}

impl Dependencies {
    /// Build the store client and pipeline from `settings`.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(IndexingError::ConfigError)` - If a setting is invalid
    /// * `Err(IndexingError::PipelineError)` - If the store cannot be reached
    pub async fn new(settings: &Settings) -> Result<Self, IndexingError> {
        let url = settings.store_url()?;
        let store_config = settings.store_config()?;
        let index_config = settings.index_config();

        info!(
            url = %url,
            index = %index_config.name,
            page_size = store_config.page_size,
            scroll_ttl = %store_config.scroll_ttl,
            "Initializing dependencies"
        );

        let client = OpenSearchClient::new(&url, index_config)
            .map_err(|e| PipelineError::connection(e.to_string()))?;
        let store: Arc<dyn DocumentStore> = Arc::new(client);

        // Verifies cluster health and creates the index when absent
        let data_process = DataProcess::connect(store, store_config).await?;

        Ok(Self { data_process })
    }
}
