//! Response normalization
//!
//! Turns a [`RawResponse`] of any shape into a key/value mapping, and pulls
//! a primary text answer out of such a mapping. Neither step can fail: an
//! unrecognized shape is stringified rather than dropped.

use navigator_domain::response::{first_present, render_text};
use navigator_domain::RawResponse;
use serde_json::{Map, Value};

/// Fields checked, in order, for the primary text answer
pub const PRIMARY_TEXT_FIELDS: [&str; 3] = ["output", "text", "result"];

/// Envelope attributes carried into an attempt record
pub const ATTEMPT_FIELDS: [&str; 11] = [
    "data",
    "result",
    "outputs",
    "output",
    "message",
    "status",
    "error",
    "elapsed_time",
    "completed",
    "logs",
    "trace",
];

/// Normalize any response into a mapping
///
/// An envelope's `data` attribute, when set, is what gets normalized.
/// Text and sequences land under `output`; key/value bodies pass through;
/// anything else is stringified under `output`.
pub fn normalize_response(raw: &RawResponse) -> Map<String, Value> {
    if let Some(data) = raw.get_field("data").filter(|d| !d.is_null()) {
        return normalize_value(data);
    }

    match raw {
        RawResponse::Text(text) => output_only(Value::String(text.clone())),
        RawResponse::Structure(fields) | RawResponse::Record(fields) => fields.clone(),
        RawResponse::Sequence(items) => output_only(Value::Array(items.clone())),
        RawResponse::Opaque(value) => output_only(Value::String(value.to_string())),
    }
}

fn normalize_value(value: &Value) -> Map<String, Value> {
    match value {
        Value::Object(fields) => fields.clone(),
        Value::String(_) | Value::Array(_) => output_only(value.clone()),
        other => output_only(Value::String(other.to_string())),
    }
}

fn output_only(value: Value) -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert("output".to_string(), value);
    fields
}

/// Normalize the response of a run attempt
///
/// The response is normalized first, then the conventional envelope
/// attributes are laid over it. An `output` taken from the normalized body
/// is never replaced by the envelope's.
pub fn attempt_fields(raw: &RawResponse) -> Map<String, Value> {
    let mut fields = normalize_response(raw);

    for name in ATTEMPT_FIELDS {
        let Some(value) = raw.get_field(name) else {
            continue;
        };
        if name == "output" && fields.contains_key("output") {
            continue;
        }
        fields.insert(name.to_string(), value.clone());
    }
    fields
}

/// The primary text answer of a normalized mapping
///
/// First present value among `output`, `text`, `result`; otherwise the
/// whole mapping rendered as JSON. Never empty for a non-empty mapping.
pub fn extract_primary_text(fields: &Map<String, Value>) -> String {
    first_present(PRIMARY_TEXT_FIELDS.iter().map(|name| fields.get(*name)))
        .map(render_text)
        .unwrap_or_else(|| Value::Object(fields.clone()).to_string())
}
