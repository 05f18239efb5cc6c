//! Policy Navigator Domain Layer
//!
//! Data model and capability boundary for the schema-blind negotiation engine.
//! This crate holds no I/O: it describes what a request, a candidate payload,
//! a remote response and a negotiation result look like, and the trait a
//! remote platform implementation must satisfy.
//!
//! ## Key Concepts
//!
//! - **SemanticRequest**: what the caller means (a question, an optional index id,
//!   extra parameters)
//! - **Candidate**: one hypothesized wire payload for an endpoint whose accepted shape is unknown
//! - **RawResponse**: a remote response of unknown shape (text, key/value body, sequence, envelope)
//! - **NegotiationOutcome**: the terminal result of trying candidates in order
//! - **NormalizedHit**: one search hit in a stable `{id, score, text, attributes}` shape
//!
//! ## Architecture
//!
//! - Only `serde`/`serde_json` as external dependencies
//! - Infrastructure (HTTP client, mock) lives in `navigator-platform`
//! - Negotiation and normalization logic lives in `navigator-core`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod candidate;
pub mod hit;
pub mod outcome;
pub mod record;
pub mod request;
pub mod response;
pub mod traits;

// Re-exports for convenience
pub use candidate::Candidate;
pub use hit::{NormalizedHit, SearchCall, SearchOutcome, DEFAULT_TOP_K};
pub use outcome::{AttemptOutcome, AttemptResult, NegotiationOutcome};
pub use record::IndexRecord;
pub use request::SemanticRequest;
pub use response::RawResponse;
pub use traits::RemotePlatform;
