//! OpenSearch index configuration and mappings.
//!
//! This module defines the index settings and mappings for the company
//! directory index.

use serde_json::{json, Value};

/// Default name of the search index.
pub const DEFAULT_INDEX_NAME: &str = "yawoen";

/// Name and shard layout of the company index.
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// Index name.
    pub name: String,
    /// Number of primary shards.
    pub shards: u32,
    /// Number of replicas per shard.
    pub replicas: u32,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self::new(DEFAULT_INDEX_NAME)
    }
}

impl IndexConfig {
    /// Create a single-shard, single-replica config for `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shards: 1,
            replicas: 1,
        }
    }

    /// Set the number of replicas.
    pub fn with_replicas(mut self, replicas: u32) -> Self {
        self.replicas = replicas;
        self
    }

    /// Get the index settings and mappings.
    ///
    /// The configuration includes:
    /// - **name**: analyzed text for fuzzy matching, with a `raw` keyword subfield
    /// - **zip**, **hash_object**: keyword fields for exact filtering and id lookups
    /// - **website**: stored but not indexed
    pub fn index_settings(&self) -> Value {
        json!({
            "settings": {
                "number_of_shards": self.shards,
                "number_of_replicas": self.replicas
            },
            "mappings": {
                "properties": {
                    "name": {
                        "type": "text",
                        "fields": {
                            "raw": {
                                "type": "keyword"
                            }
                        }
                    },
                    "zip": {
                        "type": "keyword"
                    },
                    "website": {
                        "type": "keyword",
                        "index": false
                    },
                    "hash_object": {
                        "type": "keyword"
                    }
                }
            }
        })
    }
}
