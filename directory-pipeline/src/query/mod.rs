//! Retrieval request resolution.
//!
//! Decides whether a retrieval starts a fresh filtered search or continues
//! an existing cursor.

use directory_shared::SearchFilter;

/// What a retrieval call asks the store for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetrievalRequest {
    /// Start a new search with the given filter.
    Fresh(SearchFilter),
    /// Fetch the next page of an earlier search.
    Continue { scroll_id: String },
}

impl RetrievalRequest {
    /// Resolve the caller's parameters.
    ///
    /// A non-blank cursor takes precedence and any filters sent alongside it
    /// are ignored; the continued search keeps the filter it started with.
    pub fn from_params(
        name: Option<String>,
        zip: Option<String>,
        scroll_id: Option<String>,
    ) -> Self {
        match scroll_id.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()) {
            Some(scroll_id) => Self::Continue { scroll_id },
            None => Self::Fresh(SearchFilter::new(name, zip)),
        }
    }

    pub fn is_continuation(&self) -> bool {
        matches!(self, Self::Continue { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_params_is_unconstrained_search() {
        let request = RetrievalRequest::from_params(None, None, None);
        assert_eq!(request, RetrievalRequest::Fresh(SearchFilter::all()));
    }

    #[test]
    fn test_filters_build_fresh_search() {
        let request = RetrievalRequest::from_params(
            Some("yawoen".to_string()),
            Some("11111".to_string()),
            None,
        );

        assert_eq!(
            request,
            RetrievalRequest::Fresh(SearchFilter::all().with_name("yawoen").with_zip("11111"))
        );
        assert!(!request.is_continuation());
    }

    #[test]
    fn test_cursor_overrides_filters() {
        let request = RetrievalRequest::from_params(
            Some("yawoen".to_string()),
            Some("22222".to_string()),
            Some("next_page_hash".to_string()),
        );

        assert_eq!(
            request,
            RetrievalRequest::Continue {
                scroll_id: "next_page_hash".to_string()
            }
        );
    }

    #[test]
    fn test_blank_cursor_is_ignored() {
        let request =
            RetrievalRequest::from_params(Some("group".to_string()), None, Some("  ".to_string()));
        assert!(!request.is_continuation());
    }
}
