//! Error types for the document store repository.

mod store_error;

pub use store_error::StoreError;
