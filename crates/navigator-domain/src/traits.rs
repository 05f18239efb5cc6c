//! Trait definitions for external interactions
//!
//! These traits define the boundary between the negotiation core and the
//! remote platform. Implementations live in `navigator-platform`.

use crate::{IndexRecord, RawResponse, SearchCall};
use serde_json::Value;
use std::fmt::Display;
use std::path::Path;

/// Capabilities of the remote computation platform
///
/// Every call is synchronous: it is issued and awaited to completion before
/// returning. Timeouts, if any, are the implementation's concern.
pub trait RemotePlatform {
    /// Error type for platform operations
    type Error: Display;

    /// Upload a local file and return a URL the platform can read it from
    fn upload(&self, local_path: &Path) -> Result<String, Self::Error>;

    /// Run a model with a payload
    fn run_model(&self, model_id: &str, payload: &Value) -> Result<RawResponse, Self::Error>;

    /// Run a pipeline with a payload
    fn run_pipeline(&self, pipeline_id: &str, payload: &Value) -> Result<RawResponse, Self::Error>;

    /// Search an index using one calling signature
    fn search_index(&self, index_id: &str, call: &SearchCall) -> Result<RawResponse, Self::Error>;

    /// Upsert records into an index
    fn upsert_records(&self, index_id: &str, records: &[IndexRecord]) -> Result<(), Self::Error>;
}
