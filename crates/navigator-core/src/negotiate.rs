//! The negotiating caller
//!
//! Sends candidates to a remote capability one at a time, in order, until
//! one is accepted. Every attempt is awaited before the next starts; a
//! remote failure is recorded, never propagated.

use crate::response::attempt_fields;
use navigator_domain::response::render_text;
use navigator_domain::{AttemptOutcome, AttemptResult, Candidate, NegotiationOutcome, RawResponse};
use serde_json::{json, Map, Value};
use std::fmt::Display;
use std::time::Instant;
use tracing::{debug, info, warn};

/// The status value that marks an attempt as failed
pub const FAILURE_STATUS: &str = "FAILED";

/// Field holding the local wall-clock time of an attempt, in seconds
pub const ELAPSED_FIELD: &str = "_elapsed_local_s";

/// Classify an attempt from its normalized fields
///
/// Only an explicit `status` equal to `FAILED` (case-insensitive) is a
/// failure. A missing or null status, or any other value, is a success.
pub fn classify(fields: &Map<String, Value>) -> AttemptOutcome {
    match fields.get("status") {
        None | Some(Value::Null) => AttemptOutcome::Success,
        Some(status) if render_text(status).to_uppercase() == FAILURE_STATUS => {
            AttemptOutcome::Failure
        }
        Some(_) => AttemptOutcome::Success,
    }
}

/// Fields recorded for a call that raised instead of returning
pub fn failure_fields(error: &str) -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert("status".to_string(), json!(FAILURE_STATUS));
    fields.insert("error".to_string(), json!(error));
    fields
}

/// Try `candidates` in order against `invoke`, stopping at the first success
///
/// On success the outcome carries that attempt's fields and the candidate
/// used. When every candidate fails, it carries the *last* attempt's fields,
/// no used candidate, and the full attempt history. `tried_candidates`
/// always lists exactly the candidates that were sent.
pub fn negotiate<F, E>(candidates: &[Candidate], mut invoke: F) -> NegotiationOutcome
where
    F: FnMut(&Candidate) -> Result<RawResponse, E>,
    E: Display,
{
    let mut tried = Vec::with_capacity(candidates.len());
    let mut attempts: Vec<AttemptResult> = Vec::new();

    for (index, candidate) in candidates.iter().enumerate() {
        let started = Instant::now();
        let mut fields = match invoke(candidate) {
            Ok(raw) => attempt_fields(&raw),
            Err(e) => {
                debug!("Candidate {} raised: {}", index + 1, e);
                failure_fields(&e.to_string())
            }
        };
        let elapsed_seconds = started.elapsed().as_secs_f64();
        fields.insert(ELAPSED_FIELD.to_string(), json!(round_secs(elapsed_seconds)));

        let outcome = classify(&fields);
        tried.push(candidate.clone());

        if outcome == AttemptOutcome::Success {
            info!(
                "Candidate {}/{} accepted in {:.2}s: {}",
                index + 1,
                candidates.len(),
                elapsed_seconds,
                candidate
            );
            return NegotiationOutcome {
                output: fields,
                used_candidate: Some(candidate.clone()),
                tried_candidates: tried,
                attempts: Vec::new(),
            };
        }

        debug!(
            "Candidate {}/{} failed in {:.2}s",
            index + 1,
            candidates.len(),
            elapsed_seconds
        );
        attempts.push(AttemptResult {
            candidate: candidate.clone(),
            raw_output: fields,
            outcome,
            elapsed_seconds,
        });
    }

    warn!("All {} candidates failed", candidates.len());
    let output = attempts
        .last()
        .map(|attempt| attempt.raw_output.clone())
        .unwrap_or_else(|| failure_fields("No candidate produced a success."));

    NegotiationOutcome {
        output,
        used_candidate: None,
        tried_candidates: tried,
        attempts,
    }
}

fn round_secs(seconds: f64) -> f64 {
    (seconds * 100.0).round() / 100.0
}
