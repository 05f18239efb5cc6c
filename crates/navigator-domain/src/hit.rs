//! Search hits and search call signatures

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Number of hits requested when the caller does not say
pub const DEFAULT_TOP_K: usize = 5;

/// One search hit in a stable shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedHit {
    /// Hit identifier
    pub id: Option<String>,

    /// Relevance score
    pub score: Option<f64>,

    /// Hit text; never empty when the raw hit carried any text
    pub text: String,

    /// Metadata attached to the hit
    pub attributes: Option<Map<String, Value>>,
}

/// A calling signature for an index search
///
/// The remote search capability's signature is not known ahead of time, so
/// the same query is offered in several forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchCall {
    /// Query passed positionally, `top_k` by name
    PositionalTopK {
        /// Query text
        query: String,
        /// Number of hits
        top_k: usize,
    },

    /// Query and `top_k` both by name
    NamedTopK {
        /// Query text
        query: String,
        /// Number of hits
        top_k: usize,
    },

    /// Query by name with the hit count named `k`
    NamedK {
        /// Query text
        query: String,
        /// Number of hits
        k: usize,
    },

    /// Query alone, remote default hit count
    QueryOnly {
        /// Query text
        query: String,
    },
}

impl SearchCall {
    /// All signatures for a query, in the order they should be tried
    ///
    /// A `top_k` of zero falls back to [`DEFAULT_TOP_K`].
    pub fn signatures(query: &str, top_k: usize) -> Vec<SearchCall> {
        let top_k = if top_k == 0 { DEFAULT_TOP_K } else { top_k };
        vec![
            SearchCall::PositionalTopK {
                query: query.to_string(),
                top_k,
            },
            SearchCall::NamedTopK {
                query: query.to_string(),
                top_k,
            },
            SearchCall::NamedK {
                query: query.to_string(),
                k: top_k,
            },
            SearchCall::QueryOnly {
                query: query.to_string(),
            },
        ]
    }

    /// The query text carried by this call
    pub fn query(&self) -> &str {
        match self {
            SearchCall::PositionalTopK { query, .. }
            | SearchCall::NamedTopK { query, .. }
            | SearchCall::NamedK { query, .. }
            | SearchCall::QueryOnly { query } => query,
        }
    }

    /// Short label used in failure traces
    pub fn label(&self) -> &'static str {
        match self {
            SearchCall::PositionalTopK { .. } => "search(query, top_k=)",
            SearchCall::NamedTopK { .. } => "search(query=, top_k=)",
            SearchCall::NamedK { .. } => "search(query=, k=)",
            SearchCall::QueryOnly { .. } => "search(query)",
        }
    }
}

impl fmt::Display for SearchCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of a search, with failure represented in-band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum SearchOutcome {
    /// Some signature was accepted
    #[serde(rename = "OK")]
    Ok {
        /// Number of hits
        count: usize,
        /// Normalized hits
        results: Vec<NormalizedHit>,
    },

    /// Every signature failed
    #[serde(rename = "FAILED")]
    Failed {
        /// Summary message
        error: String,
        /// One `"<signature>: <error>"` entry per failed call
        trace: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_signatures_order() {
        let calls = SearchCall::signatures("tariffs", 3);
        assert_eq!(calls.len(), 4);
        assert!(matches!(calls[0], SearchCall::PositionalTopK { top_k: 3, .. }));
        assert!(matches!(calls[1], SearchCall::NamedTopK { top_k: 3, .. }));
        assert!(matches!(calls[2], SearchCall::NamedK { k: 3, .. }));
        assert!(matches!(calls[3], SearchCall::QueryOnly { .. }));
        assert!(calls.iter().all(|c| c.query() == "tariffs"));
    }

    #[test]
    fn test_zero_top_k_uses_default() {
        let calls = SearchCall::signatures("q", 0);
        assert!(matches!(calls[0], SearchCall::PositionalTopK { top_k: DEFAULT_TOP_K, .. }));
    }

    #[test]
    fn test_search_outcome_wire_form() {
        let ok = SearchOutcome::Ok {
            count: 0,
            results: Vec::new(),
        };
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            json!({"status": "OK", "count": 0, "results": []})
        );

        let failed = SearchOutcome::Failed {
            error: "All search call signatures failed".to_string(),
            trace: vec!["search(query): boom".to_string()],
        };
        let value = serde_json::to_value(&failed).unwrap();
        assert_eq!(value["status"], json!("FAILED"));
        assert_eq!(value["trace"][0], json!("search(query): boom"));
    }
}
