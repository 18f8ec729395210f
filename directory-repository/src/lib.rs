//! # Directory Repository
//!
//! This crate provides the document store interface the ingestion pipeline
//! depends on. It includes definitions for errors, the `DocumentStore`
//! trait, a concrete implementation for OpenSearch, and an in-memory
//! implementation used in tests and local runs.

pub mod config;
pub mod errors;
pub mod interfaces;
pub mod memory;
pub mod opensearch;
pub mod types;

pub use config::StoreConfig;
pub use errors::StoreError;
pub use interfaces::DocumentStore;
pub use memory::InMemoryStore;
pub use self::opensearch::{IndexConfig, OpenSearchClient};
pub use types::{BatchOperationResult, BatchOperationSummary};
