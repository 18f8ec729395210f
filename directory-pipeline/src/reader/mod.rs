//! Reader module for the ingestion pipeline.
//!
//! Streams input files line by line.

mod file_reader;

pub use file_reader::LineReader;
