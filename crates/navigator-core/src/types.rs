//! Request and response types for the navigator operations

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A document to index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexItem {
    /// Optional record id
    #[serde(default)]
    pub id: Option<String>,

    /// Document text
    pub text: String,

    /// Optional metadata
    #[serde(default)]
    pub meta: Option<Map<String, Value>>,
}

/// Reply from a single chat model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    /// Text answer
    pub output: String,

    /// The key/value body the answer was taken from, when there was one
    pub raw: Option<Map<String, Value>>,
}
