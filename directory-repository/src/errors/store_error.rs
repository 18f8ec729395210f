//! Document store error types.
//!
//! This module defines the error types that can occur while talking to the
//! document store backend.

use thiserror::Error;

/// Errors that can occur during document store operations.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Failed to establish connection to the search engine.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Failed to create the search index.
    #[error("Index creation error: {0}")]
    IndexCreationError(String),

    /// Count or search query execution failed.
    #[error("Query error: {0}")]
    QueryError(String),

    /// Continuing a scroll cursor failed (unknown or expired cursor).
    #[error("Scroll error: {0}")]
    ScrollError(String),

    /// Failed to upsert a single document.
    #[error("Update error: {0}")]
    UpdateError(String),

    /// Bulk operation failed as a whole.
    #[error("Bulk operation error: {0}")]
    BulkOperationError(String),

    /// Failed to serialize a document for the search engine.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Failed to parse a response from the search engine.
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl StoreError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create an index creation error.
    pub fn index_creation(msg: impl Into<String>) -> Self {
        Self::IndexCreationError(msg.into())
    }

    /// Create a query error.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::QueryError(msg.into())
    }

    /// Create a scroll error.
    pub fn scroll(msg: impl Into<String>) -> Self {
        Self::ScrollError(msg.into())
    }

    /// Create an update error.
    pub fn update(msg: impl Into<String>) -> Self {
        Self::UpdateError(msg.into())
    }

    /// Create a bulk operation error.
    pub fn bulk_operation(msg: impl Into<String>) -> Self {
        Self::BulkOperationError(msg.into())
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::SerializationError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Whether the error means the backend could not be reached at all.
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::ConnectionError(_))
    }
}
