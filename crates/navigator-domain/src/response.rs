//! Remote responses of unknown shape
//!
//! A remote endpoint may answer with a plain string, a key/value body, a
//! sequence, or a response envelope whose named fields act as attributes.
//! Normalizers dispatch over [`RawResponse`] instead of probing shapes ad hoc.

use serde_json::{Map, Value};

/// A response from a remote capability, classified by shape
#[derive(Debug, Clone, PartialEq)]
pub enum RawResponse {
    /// Plain text answer
    Text(String),

    /// Plain key/value body, already in normalized form
    Structure(Map<String, Value>),

    /// Sequence of values
    Sequence(Vec<Value>),

    /// Tagged response envelope; its fields are the response's attributes
    Record(Map<String, Value>),

    /// Anything else (numbers, booleans, null)
    Opaque(Value),
}

impl RawResponse {
    /// Classify a bare JSON value
    ///
    /// Objects become [`RawResponse::Structure`]; envelopes must be built
    /// explicitly with [`RawResponse::Record`] by the transport that knows
    /// it received one.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::String(s) => RawResponse::Text(s),
            Value::Object(map) => RawResponse::Structure(map),
            Value::Array(items) => RawResponse::Sequence(items),
            other => RawResponse::Opaque(other),
        }
    }

    /// Whether the response exposes `name` as an attribute
    ///
    /// Only envelopes expose attributes; a key/value body does not.
    pub fn has_field(&self, name: &str) -> bool {
        match self {
            RawResponse::Record(fields) => fields.contains_key(name),
            _ => false,
        }
    }

    /// Read an attribute of an envelope
    pub fn get_field(&self, name: &str) -> Option<&Value> {
        match self {
            RawResponse::Record(fields) => fields.get(name),
            _ => None,
        }
    }

    /// The key/value body, if this is a plain structure
    pub fn as_structure(&self) -> Option<&Map<String, Value>> {
        match self {
            RawResponse::Structure(map) => Some(map),
            _ => None,
        }
    }

    /// The response as a JSON value
    pub fn to_value(&self) -> Value {
        match self {
            RawResponse::Text(s) => Value::String(s.clone()),
            RawResponse::Structure(map) | RawResponse::Record(map) => Value::Object(map.clone()),
            RawResponse::Sequence(items) => Value::Array(items.clone()),
            RawResponse::Opaque(value) => value.clone(),
        }
    }

    /// String representation used by every stringification fallback
    pub fn describe(&self) -> String {
        match self {
            RawResponse::Text(s) => s.clone(),
            other => other.to_value().to_string(),
        }
    }
}

impl From<Value> for RawResponse {
    fn from(value: Value) -> Self {
        RawResponse::from_json(value)
    }
}

impl From<&str> for RawResponse {
    fn from(text: &str) -> Self {
        RawResponse::Text(text.to_string())
    }
}

/// Whether a value counts as present and non-empty
///
/// Null, blank strings, empty arrays and empty objects are all absent.
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        _ => true,
    }
}

/// First value that [`is_present`], in the order given
pub fn first_present<'a, I>(values: I) -> Option<&'a Value>
where
    I: IntoIterator<Item = Option<&'a Value>>,
{
    values.into_iter().flatten().find(|value| is_present(value))
}

/// Render a value as text: strings verbatim, anything else as compact JSON
pub fn render_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
