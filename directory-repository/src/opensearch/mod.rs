//! OpenSearch implementation of the document store.
//!
//! This module provides a concrete implementation of `DocumentStore`
//! using OpenSearch as the backend.

mod client;
mod index_config;
pub mod queries;
mod scrolls;

pub use client::OpenSearchClient;
pub use index_config::{IndexConfig, DEFAULT_INDEX_NAME};
