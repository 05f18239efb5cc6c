//! Candidate payloads - one guess at the shape a remote endpoint accepts

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// One hypothesized wire payload
///
/// A candidate is a flat or nested key/value mapping. Two candidates are
/// considered the same shape when their canonical serializations match,
/// regardless of key insertion order.
///
/// # Examples
///
/// ```
/// use navigator_domain::Candidate;
///
/// let a = Candidate::new().with_field("q", "hi").with_field("index", "i1");
/// let b = Candidate::new().with_field("index", "i1").with_field("q", "hi");
/// assert_eq!(a.canonical_key(), b.canonical_key());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Candidate(Map<String, Value>);

impl Candidate {
    /// Create an empty candidate
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Builder-style field setter
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Set a field, replacing any existing value under the same key
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Get a field value
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Number of top-level fields
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the candidate has no fields
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the underlying mapping
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Wrap this candidate unchanged as the sole value under `wrapper`
    pub fn wrapped(&self, wrapper: &str) -> Self {
        Self::new().with_field(wrapper, self.to_value())
    }

    /// The candidate as a JSON object value
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    /// Canonical serialization used for structural equality
    ///
    /// Keys are sorted at every nesting level, so the key is independent of
    /// the order fields were inserted in.
    pub fn canonical_key(&self) -> String {
        let mut out = String::new();
        write_canonical(&Value::Object(self.0.clone()), &mut out);
        out
    }
}

impl From<Map<String, Value>> for Candidate {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

impl From<Candidate> for Value {
    fn from(candidate: Candidate) -> Self {
        Value::Object(candidate.0)
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical_key())
    }
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            out.push('{');
            for (i, (key, inner)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(inner, out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}
