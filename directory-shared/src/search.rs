//! Search filter and result envelope types.

use serde::{Deserialize, Serialize};

/// Optional name and zip constraints for a search.
///
/// Both present means both must match. A blank value is treated as absent,
/// and a filter with neither value matches every document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilter {
    /// Fuzzy match against the company name.
    pub name: Option<String>,
    /// Match against the postal code.
    pub zip: Option<String>,
}

impl SearchFilter {
    /// Build a filter, discarding blank values.
    pub fn new(name: Option<String>, zip: Option<String>) -> Self {
        Self {
            name: non_blank(name),
            zip: non_blank(zip),
        }
    }

    /// A filter with no constraints.
    pub fn all() -> Self {
        Self::default()
    }

    /// Set the name constraint.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = non_blank(Some(name.into()));
        self
    }

    /// Set the zip constraint.
    pub fn with_zip(mut self, zip: impl Into<String>) -> Self {
        self.zip = non_blank(Some(zip.into()));
        self
    }

    /// Whether the filter matches every document.
    pub fn is_unconstrained(&self) -> bool {
        self.name.is_none() && self.zip.is_none()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// A single search result, projected onto the public fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub name: String,
    pub zip: String,
    #[serde(default)]
    pub website: Option<String>,
}

/// One page of search results.
///
/// `count` is the total number of documents matching the original filter,
/// not the length of `data`. `scroll` is the opaque cursor for the next page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPage {
    pub data: Vec<SearchHit>,
    pub count: u64,
    pub scroll: Option<String>,
}

impl SearchPage {
    /// A page with no results and no cursor.
    pub fn empty() -> Self {
        Self {
            data: Vec::new(),
            count: 0,
            scroll: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_filters_are_absent() {
        let filter = SearchFilter::new(Some("  ".to_string()), Some(String::new()));
        assert!(filter.is_unconstrained());

        let filter = SearchFilter::new(Some(" dwight ".to_string()), None);
        assert_eq!(filter.name.as_deref(), Some("dwight"));
        assert!(!filter.is_unconstrained());
    }

    #[test]
    fn test_builder() {
        let filter = SearchFilter::all().with_name("yawoen").with_zip("30078");
        assert_eq!(filter.name.as_deref(), Some("yawoen"));
        assert_eq!(filter.zip.as_deref(), Some("30078"));
    }

    #[test]
    fn test_page_envelope_keys() {
        let page = SearchPage {
            data: vec![SearchHit {
                name: "yawoen".to_string(),
                zip: "11111".to_string(),
                website: None,
            }],
            count: 1,
            scroll: Some("next_page_hash".to_string()),
        };

        let value = serde_json::to_value(&page).unwrap();
        let mut keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        keys.sort();
        assert_eq!(keys, vec!["count", "data", "scroll"]);
        assert_eq!(value["data"][0]["website"], serde_json::Value::Null);
    }
}
