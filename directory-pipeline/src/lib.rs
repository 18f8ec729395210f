//! # Directory Pipeline
//!
//! This crate provides the pipeline components for loading company
//! directory files into the document store and paging through them.
//!
//! ## Architecture
//!
//! The pipeline follows the Reader-Processor-Loader pattern:
//!
//! 1. **Reader**: Streams the input file line by line
//! 2. **Processor**: Parses the header and turns lines into documents
//! 3. **Loader**: Writes documents into the store (bulk or per document)
//! 4. **Orchestrator**: Exposes `restore`, `update` and `retrieve`

pub mod errors;
pub mod loader;
pub mod orchestrator;
pub mod processor;
pub mod query;
pub mod reader;

pub use errors::PipelineError;
pub use orchestrator::{DataProcess, IngestReport, RecordFailure, SUCCESS_MESSAGE};
