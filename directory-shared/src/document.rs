//! Company document stored in the search index.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::search::SearchHit;

/// Fields returned by search requests, in envelope order.
pub const PROJECTED_FIELDS: [&str; 3] = ["name", "zip", "website"];

/// A single company record as stored in the search index.
///
/// The document is addressed by `hash_object`, a content-derived identity
/// computed from `name` and `zip`. `website` is always serialized, as `null`
/// when the source row carried no value for it. Columns of the input file
/// that have no dedicated field are kept in `extra` and flattened into the
/// stored JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyDocument {
    /// Company name.
    pub name: String,
    /// Postal code.
    pub zip: String,
    /// Company website, `None` when absent.
    pub website: Option<String>,
    /// Any additional input columns, keyed by normalized column name.
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
    /// Deterministic document identity.
    pub hash_object: String,
}

impl CompanyDocument {
    /// Create a document with no extra columns.
    pub fn new(
        name: impl Into<String>,
        zip: impl Into<String>,
        website: Option<String>,
        hash_object: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            zip: zip.into(),
            website,
            extra: BTreeMap::new(),
            hash_object: hash_object.into(),
        }
    }

    /// The identifier the document is stored under.
    pub fn id(&self) -> &str {
        &self.hash_object
    }

    /// Project the document onto the fields returned by searches.
    pub fn to_hit(&self) -> SearchHit {
        SearchHit {
            name: self.name.clone(),
            zip: self.zip.clone(),
            website: self.website.clone(),
        }
    }
}
