//! # Directory Shared
//!
//! Shared types for the company directory indexer: the document stored in
//! the search index, the search filter, and the paginated result envelope.

mod document;
mod search;

pub use document::{CompanyDocument, PROJECTED_FIELDS};
pub use search::{SearchFilter, SearchHit, SearchPage};
