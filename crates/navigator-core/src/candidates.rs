//! Payload candidate generation
//!
//! Enumerates the payload shapes a pipeline might accept for a question,
//! in a fixed priority order: flat shapes first, then flat shapes carrying
//! the index id, then every one of those nested under a wrapper key.
//! Generation is pure, so the trial order can be tested without a network.

use navigator_domain::{Candidate, SemanticRequest};
use serde_json::json;
use std::collections::HashSet;

/// Field names tried for the primary text, in order
pub const PRIMARY_TEXT_ALIASES: [&str; 7] =
    ["query", "question", "prompt", "input", "text", "q", "message"];

/// Field names tried for the index identifier, in order
pub const INDEX_ID_ALIASES: [&str; 6] = [
    "index_id",
    "index",
    "knowledge_index_id",
    "knowledgeIndexId",
    "indexName",
    "index_name",
];

/// Keys a whole payload may be nested under, in order
pub const WRAPPER_KEYS: [&str; 4] = ["inputs", "parameters", "data", "payload"];

/// Generate the ordered, deduplicated candidate payloads for a request
///
/// Extra parameters are set on every candidate at the top level and win
/// over any generated field with the same name.
///
/// # Examples
///
/// ```
/// use navigator_core::generate_candidates;
/// use navigator_domain::SemanticRequest;
///
/// let candidates = generate_candidates(&SemanticRequest::new("What is the policy?"));
/// assert_eq!(candidates[0].get("query").and_then(|v| v.as_str()), Some("What is the policy?"));
/// // 7 flat aliases + 1 chat shape, each also under 4 wrappers
/// assert_eq!(candidates.len(), 40);
/// ```
pub fn generate_candidates(request: &SemanticRequest) -> Vec<Candidate> {
    let basics = basic_candidates(request.primary_text());

    let augmented: Vec<Candidate> = match request.auxiliary_id() {
        Some(aux_id) => basics
            .iter()
            .flat_map(|basic| {
                INDEX_ID_ALIASES
                    .iter()
                    .map(move |alias| basic.clone().with_field(*alias, aux_id))
            })
            .collect(),
        None => Vec::new(),
    };

    let wrapped: Vec<Candidate> = basics
        .iter()
        .chain(&augmented)
        .flat_map(|candidate| WRAPPER_KEYS.iter().map(move |key| candidate.wrapped(key)))
        .collect();

    let mut seen = HashSet::new();
    basics
        .into_iter()
        .chain(augmented)
        .chain(wrapped)
        .map(|mut candidate| {
            for (key, value) in request.extra_params() {
                candidate.set(key.clone(), value.clone());
            }
            candidate
        })
        .filter(|candidate| seen.insert(candidate.canonical_key()))
        .collect()
}

/// One flat candidate per text alias, then the chat-shaped candidate
fn basic_candidates(text: &str) -> Vec<Candidate> {
    let mut basics: Vec<Candidate> = PRIMARY_TEXT_ALIASES
        .iter()
        .map(|alias| Candidate::new().with_field(*alias, text))
        .collect();
    basics.push(
        Candidate::new().with_field("messages", json!([{ "role": "user", "content": text }])),
    );
    basics
}
