//! # Directory Indexer
//!
//! Entry point library for the company directory indexer.
//!
//! This crate provides configuration, logging setup and dependency wiring
//! for the `directory-indexer` binary.

pub mod config;
pub mod logging;

pub use config::{Dependencies, Settings};

use thiserror::Error;

/// Errors that can occur during indexer initialization or execution.
#[derive(Error, Debug)]
pub enum IndexingError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Pipeline error.
    #[error("Pipeline error: {0}")]
    PipelineError(#[from] directory_pipeline::PipelineError),

    /// Serialization error while printing results.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl IndexingError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
