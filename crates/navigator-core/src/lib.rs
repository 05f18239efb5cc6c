//! Policy Navigator Core
//!
//! Schema-blind negotiation with remote computation endpoints.
//!
//! # Overview
//!
//! The remote pipelines and models this crate calls do not publish the
//! input shape they accept, and they answer in several shapes too. The core
//! finds an accepted input by trial and folds every answer into one stable
//! result contract.
//!
//! # Architecture
//!
//! ```text
//! SemanticRequest → generate_candidates → negotiate ⇄ RemotePlatform
//!                                             ↓
//!                                  attempt_fields / classify
//!                                             ↓
//!                                    NegotiationOutcome
//! ```
//!
//! # Key Features
//!
//! - **Candidate generation**: deterministic, deduplicated payload shapes, flat before wrapped
//! - **Negotiation**: sequential trial, first success wins, full diagnostics on exhaustion
//! - **Response normalization**: text, key/value, sequence and envelope responses in one mapping
//! - **Text extraction**: fixed URL shapes, hard failure on exhaustion, mojibake cleanup
//! - **Search**: signature negotiation and hit normalization
//!
//! # Example Usage
//!
//! ```
//! use navigator_core::{AssetIds, Navigator};
//! use navigator_domain::RawResponse;
//! use navigator_platform::MockPlatform;
//! use serde_json::{json, Map};
//!
//! let assets = AssetIds::default();
//! let platform = MockPlatform::new().with_pipeline_response(
//!     &assets.pipeline_id,
//!     json!({"question": "What is the policy?", "index_id": assets.index_id.clone()}),
//!     RawResponse::from_json(json!({"status": "SUCCESS", "output": "Answer text"})),
//! );
//!
//! let navigator = Navigator::new(platform, assets);
//! let outcome = navigator.ask_pipeline("What is the policy?", Map::new());
//!
//! assert_eq!(outcome.output_text(), Some("Answer text"));
//! assert!(outcome.used_candidate.is_some());
//! ```

#![warn(missing_docs)]

pub mod candidates;
mod config;
mod error;
pub mod extraction;
pub mod hits;
mod navigator;
pub mod negotiate;
pub mod response;
mod text;
mod types;


pub use candidates::generate_candidates;
pub use config::AssetIds;
pub use error::NavigatorError;
pub use extraction::extract_with_shapes;
pub use hits::{normalize_hit, search_with_signatures};
pub use navigator::Navigator;
pub use negotiate::{classify, negotiate};
pub use response::{extract_primary_text, normalize_response};
pub use text::normalize_text;
pub use types::{ChatReply, IndexItem};
