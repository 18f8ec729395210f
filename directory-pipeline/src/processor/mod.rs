//! Processor module for the ingestion pipeline.
//!
//! Transforms raw input lines into company documents: header parsing,
//! field normalization, and identity hashing.

mod hasher;
mod header;
mod normalizer;
mod record_parser;

pub use hasher::identity_hash;
pub use header::{Column, Header, HeaderError};
pub use normalizer::{normalize_key, normalize_value, normalize_website};
pub use record_parser::{LineOutcome, RecordParser};

/// Field delimiter of the input files.
pub const DELIMITER: char = ';';
