//! Error types for the ingestion pipeline.
//!
//! Callers only ever see one of three conditions: the store could not be
//! reached, the input file could not be processed, or an initial import was
//! attempted against an index that already holds data.

use directory_repository::StoreError;
use thiserror::Error;

/// Errors surfaced by the pipeline operations.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The document store is unreachable or rejected a request.
    #[error("Error trying to connect to ElasticSearch: {0}")]
    ConnectionElasticSearch(String),

    /// The input file could not be read or loaded.
    #[error("Failed to process file: {0}")]
    ProcessFile(String),

    /// An initial import was attempted against a non-empty index.
    #[error("There is data in the database: {count} documents indexed")]
    InitialImport { count: u64 },
}

impl PipelineError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionElasticSearch(msg.into())
    }

    /// Create a file processing error.
    pub fn process_file(msg: impl Into<String>) -> Self {
        Self::ProcessFile(msg.into())
    }

    /// Create an initial import error.
    pub fn initial_import(count: u64) -> Self {
        Self::InitialImport { count }
    }

    /// Map a store failure during a write. Unreachable stores stay connection
    /// errors, anything else fails the file.
    pub fn from_write(err: StoreError) -> Self {
        if err.is_connection() {
            Self::connection(err.to_string())
        } else {
            Self::process_file(err.to_string())
        }
    }

    /// Stable name of the condition.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ConnectionElasticSearch(_) => "ConnectionElasticSearchError",
            Self::ProcessFile(_) => "ProcessFileError",
            Self::InitialImport { .. } => "InitialImportError",
        }
    }

    /// Fixed client-facing message, without the underlying cause.
    pub fn message(&self) -> &'static str {
        match self {
            Self::ConnectionElasticSearch(_) => "Error trying to connect to ElasticSearch.",
            Self::ProcessFile(_) => "Failed to process file.",
            Self::InitialImport { .. } => "There is data in the database.",
        }
    }

    /// Status code the HTTP layer answers with.
    pub fn status_code(&self) -> u16 {
        500
    }
}
