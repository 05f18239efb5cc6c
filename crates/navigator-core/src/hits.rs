//! Search hit normalization and search-signature negotiation

use navigator_domain::response::{first_present, is_present, render_text};
use navigator_domain::{NormalizedHit, RawResponse, RemotePlatform, SearchCall, SearchOutcome};
use serde_json::{Map, Value};
use tracing::{info, warn};

/// Fields checked, in order, for a hit's text in a key/value hit
pub const HIT_TEXT_FIELDS: [&str; 3] = ["value", "text", "output"];

/// Fields checked, in order, for a hit's metadata in a key/value hit
pub const HIT_ATTRIBUTE_FIELDS: [&str; 3] = ["attributes", "meta", "metadata"];

/// Error reported when no signature was accepted
pub const ALL_SIGNATURES_FAILED: &str = "All search call signatures failed";

/// Normalize one hit of any shape
///
/// Envelope attributes (`id`, `score`, `text`, `attributes`) take
/// precedence. The hit body (an envelope's `data`, or the hit itself) is
/// then read as key/value when it is one; whatever is still missing for the
/// text falls back to the body's string representation.
///
/// # Examples
///
/// ```
/// use navigator_core::normalize_hit;
/// use navigator_domain::RawResponse;
/// use serde_json::json;
///
/// let hit = normalize_hit(&RawResponse::from_json(json!({
///     "id": "a1", "score": 0.92, "value": "clause text", "meta": {"law": "EO-123"}
/// })));
/// assert_eq!(hit.id.as_deref(), Some("a1"));
/// assert_eq!(hit.text, "clause text");
/// ```
pub fn normalize_hit(raw: &RawResponse) -> NormalizedHit {
    let direct_id = raw.get_field("id").and_then(id_of);
    let direct_score = raw.get_field("score").and_then(score_of);
    let direct_text = raw.get_field("text").filter(|v| is_present(v)).map(render_text);
    let direct_attributes = raw.get_field("attributes").and_then(attributes_of);

    let body = match raw.get_field("data") {
        Some(data) if is_present(data) => data.clone(),
        _ => raw.to_value(),
    };

    match &body {
        Value::Object(fields) => NormalizedHit {
            id: direct_id.or_else(|| fields.get("id").and_then(id_of)),
            score: direct_score.or_else(|| fields.get("score").and_then(score_of)),
            text: direct_text
                .or_else(|| {
                    first_present(HIT_TEXT_FIELDS.iter().map(|k| fields.get(*k))).map(render_text)
                })
                .unwrap_or_else(|| body.to_string()),
            attributes: direct_attributes.or_else(|| {
                first_present(HIT_ATTRIBUTE_FIELDS.iter().map(|k| fields.get(*k)))
                    .and_then(attributes_of)
            }),
        },
        other => NormalizedHit {
            id: direct_id,
            score: direct_score,
            text: direct_text
                .or_else(|| {
                    first_present([raw.get_field("value"), raw.get_field("text")]).map(render_text)
                })
                .unwrap_or_else(|| render_text(other)),
            attributes: direct_attributes
                .or_else(|| first_present([raw.get_field("metadata")]).and_then(attributes_of)),
        },
    }
}

fn id_of(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        other => Some(render_text(other)),
    }
}

fn score_of(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn attributes_of(value: &Value) -> Option<Map<String, Value>> {
    value.as_object().filter(|map| !map.is_empty()).cloned()
}

/// Split a search response into individual hits
///
/// A sequence yields one hit per element; an empty response yields none;
/// anything else is a single hit.
pub fn collect_hits(raw: &RawResponse) -> Vec<RawResponse> {
    match raw {
        RawResponse::Sequence(items) => items.iter().cloned().map(RawResponse::from_json).collect(),
        RawResponse::Opaque(Value::Null) => Vec::new(),
        RawResponse::Text(text) if text.trim().is_empty() => Vec::new(),
        RawResponse::Structure(fields) | RawResponse::Record(fields) if fields.is_empty() => {
            Vec::new()
        }
        other => vec![other.clone()],
    }
}

/// Search an index, trying each calling signature until one is accepted
///
/// Failure is reported in-band with one trace entry per failed signature.
pub fn search_with_signatures<P>(
    platform: &P,
    index_id: &str,
    query: &str,
    top_k: usize,
) -> SearchOutcome
where
    P: RemotePlatform,
{
    let mut trace = Vec::new();

    for call in SearchCall::signatures(query, top_k) {
        match platform.search_index(index_id, &call) {
            Ok(raw) => {
                let results: Vec<NormalizedHit> =
                    collect_hits(&raw).iter().map(normalize_hit).collect();
                info!("Search via {} returned {} hits", call, results.len());
                return SearchOutcome::Ok {
                    count: results.len(),
                    results,
                };
            }
            Err(e) => {
                warn!("Search via {} failed: {}", call, e);
                trace.push(format!("{}: {}", call.label(), e));
            }
        }
    }

    SearchOutcome::Failed {
        error: ALL_SIGNATURES_FAILED.to_string(),
        trace,
    }
}
