//! OpenSearch query builders.
//!
//! This module translates a `SearchFilter` into an OpenSearch query body.

use serde_json::{json, Value};

use directory_shared::{SearchFilter, PROJECTED_FIELDS};

/// Build an OpenSearch query from a SearchFilter.
///
/// An unconstrained filter produces a `match_all` query. Otherwise every
/// present field becomes a `must` clause:
/// - `name` is matched with AUTO fuzziness to tolerate typos
/// - `zip` is matched as given
///
/// The source is always restricted to the projected fields.
pub fn build_search_query(filter: &SearchFilter) -> Value {
    let query = if filter.is_unconstrained() {
        json!({ "match_all": {} })
    } else {
        json!({
            "bool": {
                "must": build_clauses(filter)
            }
        })
    };

    json!({
        "query": query,
        "_source": PROJECTED_FIELDS
    })
}

fn build_clauses(filter: &SearchFilter) -> Vec<Value> {
    let mut clauses = Vec::with_capacity(2);

    if let Some(name) = &filter.name {
        clauses.push(json!({
            "match": {
                "name": {
                    "query": name,
                    // 1-2 chars: exact, 3-5 chars: 1 edit, longer: 2 edits
                    "fuzziness": "AUTO"
                }
            }
        }));
    }

    if let Some(zip) = &filter.zip {
        clauses.push(json!({
            "match": {
                "zip": zip
            }
        }));
    }

    clauses
}

/// Build the body of a scroll continuation request.
pub fn build_scroll_body(scroll_id: &str, scroll_ttl: &str) -> Value {
    json!({
        "scroll": scroll_ttl,
        "scroll_id": scroll_id
    })
}
