//! Attempt and negotiation results

use crate::candidate::Candidate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Classification of a single attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttemptOutcome {
    /// The endpoint accepted the payload
    Success,
    /// The call failed or the endpoint flagged the payload as failed
    Failure,
}

/// Result of sending one candidate to a remote endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptResult {
    /// The payload that was sent
    pub candidate: Candidate,

    /// Normalized fields of the response (output/result/status/error/logs/trace...)
    pub raw_output: Map<String, Value>,

    /// How the attempt was classified
    pub outcome: AttemptOutcome,

    /// Wall-clock seconds spent on the call
    pub elapsed_seconds: f64,
}

impl AttemptResult {
    /// Whether the attempt succeeded
    pub fn is_success(&self) -> bool {
        self.outcome == AttemptOutcome::Success
    }
}

/// Terminal result of a negotiation
///
/// Serializes flat: the chosen attempt's fields, then `_used_payload`
/// (null when nothing succeeded) and `_tried_payloads` in the order they
/// were sent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NegotiationOutcome {
    /// Fields of the successful attempt, or of the last failed one
    #[serde(flatten)]
    pub output: Map<String, Value>,

    /// The candidate that succeeded, if any
    #[serde(rename = "_used_payload")]
    pub used_candidate: Option<Candidate>,

    /// Every candidate actually sent, in order
    #[serde(rename = "_tried_payloads")]
    pub tried_candidates: Vec<Candidate>,

    /// Per-attempt history, kept only when every candidate failed
    #[serde(skip)]
    pub attempts: Vec<AttemptResult>,
}

impl NegotiationOutcome {
    /// Whether some candidate succeeded
    pub fn is_success(&self) -> bool {
        self.used_candidate.is_some()
    }

    /// The `status` field, if present as a string
    pub fn status(&self) -> Option<&str> {
        self.output.get("status").and_then(Value::as_str)
    }

    /// The `output` field, if present as a string
    pub fn output_text(&self) -> Option<&str> {
        self.output.get("output").and_then(Value::as_str)
    }

    /// The `error` field, if present as a string
    pub fn error(&self) -> Option<&str> {
        self.output.get("error").and_then(Value::as_str)
    }
}
