//! Index records for upsert

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A text record to upsert into a remote index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexRecord {
    /// Record id; the platform assigns one when absent
    pub id: Option<String>,

    /// Record content
    pub value: String,

    /// Content type of `value`
    pub value_type: String,

    /// Source URI (empty for inline text)
    pub uri: String,

    /// Free-form metadata
    pub attributes: Map<String, Value>,
}

impl IndexRecord {
    /// Build an inline text record
    pub fn text(
        id: Option<String>,
        value: impl Into<String>,
        attributes: Map<String, Value>,
    ) -> Self {
        Self {
            id,
            value: value.into(),
            value_type: "text".to_string(),
            uri: String::new(),
            attributes,
        }
    }
}
