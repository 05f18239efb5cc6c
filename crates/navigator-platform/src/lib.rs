//! Policy Navigator Platform Layer
//!
//! Implementations of the `RemotePlatform` trait from `navigator-domain`.
//!
//! # Platforms
//!
//! - `MockPlatform`: Deterministic, scriptable mock that records every call
//! - `HttpPlatform`: Blocking JSON/HTTP client for a REST-style platform
//!
//! # Examples
//!
//! ```
//! use navigator_platform::MockPlatform;
//! use navigator_domain::{RawResponse, RemotePlatform};
//! use serde_json::json;
//!
//! let platform = MockPlatform::new().with_pipeline_response(
//!     "p1",
//!     json!({"question": "why?"}),
//!     RawResponse::Text("because".into()),
//! );
//!
//! assert!(platform.run_pipeline("p1", &json!({"query": "why?"})).is_err());
//! assert_eq!(
//!     platform.run_pipeline("p1", &json!({"question": "why?"})).unwrap(),
//!     RawResponse::Text("because".into())
//! );
//! assert_eq!(platform.call_count(), 2);
//! ```

#![warn(missing_docs)]

pub mod http;

use navigator_domain::{Candidate, IndexRecord, RawResponse, RemotePlatform, SearchCall};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

pub use http::HttpPlatform;

/// Errors that can occur during platform operations
#[derive(Error, Debug)]
pub enum PlatformError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Non-success HTTP status
    #[error("HTTP {status}: {body}")]
    Status {
        /// Status code
        status: u16,
        /// Response body, or a placeholder when unreadable
        body: String,
    },

    /// Response body could not be interpreted
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The platform refused the request shape
    #[error("Rejected: {0}")]
    Rejected(String),

    /// Local file error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for PlatformError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            PlatformError::InvalidResponse(e.to_string())
        } else if let Some(status) = e.status() {
            PlatformError::Status {
                status: status.as_u16(),
                body: e.to_string(),
            }
        } else {
            PlatformError::Communication(e.to_string())
        }
    }
}

/// A call received by [`MockPlatform`]
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    /// `upload`
    Upload(PathBuf),
    /// `run_model`
    RunModel {
        /// Model id
        model_id: String,
        /// Payload sent
        payload: Value,
    },
    /// `run_pipeline`
    RunPipeline {
        /// Pipeline id
        pipeline_id: String,
        /// Payload sent
        payload: Value,
    },
    /// `search_index`
    Search {
        /// Index id
        index_id: String,
        /// Signature used
        call: SearchCall,
    },
    /// `upsert_records`
    Upsert {
        /// Index id
        index_id: String,
        /// Number of records
        count: usize,
    },
}

#[derive(Debug, Default)]
struct MockState {
    model_responses: HashMap<String, RawResponse>,
    model_defaults: HashMap<String, RawResponse>,
    pipeline_responses: HashMap<String, RawResponse>,
    pipeline_defaults: HashMap<String, RawResponse>,
    search_responses: HashMap<&'static str, RawResponse>,
    fail_uploads: bool,
    fail_upserts: bool,
    calls: Vec<MockCall>,
    upserted: Vec<IndexRecord>,
}

/// Mock platform for deterministic testing
///
/// Answers only the payloads and signatures it has been scripted with and
/// rejects everything else, which is exactly the situation negotiation is
/// built for. Clones share state, so a test can hand one clone to the code
/// under test and inspect the recorded calls through another.
#[derive(Debug, Clone, Default)]
pub struct MockPlatform {
    state: Arc<Mutex<MockState>>,
}

impl MockPlatform {
    /// Create a mock that rejects every run and search
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Answer `payload` sent to `model_id` with `response`
    pub fn with_model_response(
        self,
        model_id: &str,
        payload: Value,
        response: RawResponse,
    ) -> Self {
        self.state()
            .model_responses
            .insert(scripted_key(model_id, &payload), response);
        self
    }

    /// Answer any payload sent to `model_id` with `response`
    pub fn with_model_default(self, model_id: &str, response: RawResponse) -> Self {
        self.state().model_defaults.insert(model_id.to_string(), response);
        self
    }

    /// Answer `payload` sent to `pipeline_id` with `response`
    pub fn with_pipeline_response(
        self,
        pipeline_id: &str,
        payload: Value,
        response: RawResponse,
    ) -> Self {
        self.state()
            .pipeline_responses
            .insert(scripted_key(pipeline_id, &payload), response);
        self
    }

    /// Answer any payload sent to `pipeline_id` with `response`
    pub fn with_pipeline_default(self, pipeline_id: &str, response: RawResponse) -> Self {
        self.state().pipeline_defaults.insert(pipeline_id.to_string(), response);
        self
    }

    /// Accept searches made with the same signature kind as `call`
    pub fn with_search_response(self, call: &SearchCall, response: RawResponse) -> Self {
        self.state().search_responses.insert(call.label(), response);
        self
    }

    /// Make every upload fail
    pub fn failing_uploads(self) -> Self {
        self.state().fail_uploads = true;
        self
    }

    /// Make every upsert fail
    pub fn failing_upserts(self) -> Self {
        self.state().fail_upserts = true;
        self
    }

    /// Every call received so far, in order
    pub fn calls(&self) -> Vec<MockCall> {
        self.state().calls.clone()
    }

    /// Number of calls received so far
    pub fn call_count(&self) -> usize {
        self.state().calls.len()
    }

    /// Records received through `upsert_records`
    pub fn upserted_records(&self) -> Vec<IndexRecord> {
        self.state().upserted.clone()
    }
}

impl RemotePlatform for MockPlatform {
    type Error = PlatformError;

    fn upload(&self, local_path: &Path) -> Result<String, Self::Error> {
        let mut state = self.state();
        state.calls.push(MockCall::Upload(local_path.to_path_buf()));

        if state.fail_uploads {
            return Err(PlatformError::Communication("upload refused".to_string()));
        }
        // The file must exist for the duration of the call
        std::fs::metadata(local_path)?;

        let name = local_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(format!("https://files.mock/{}", name))
    }

    fn run_model(&self, model_id: &str, payload: &Value) -> Result<RawResponse, Self::Error> {
        let mut state = self.state();
        state.calls.push(MockCall::RunModel {
            model_id: model_id.to_string(),
            payload: payload.clone(),
        });

        state
            .model_responses
            .get(&scripted_key(model_id, payload))
            .or_else(|| state.model_defaults.get(model_id))
            .cloned()
            .ok_or_else(|| PlatformError::Rejected(format!("unsupported input shape: {}", payload)))
    }

    fn run_pipeline(&self, pipeline_id: &str, payload: &Value) -> Result<RawResponse, Self::Error> {
        let mut state = self.state();
        state.calls.push(MockCall::RunPipeline {
            pipeline_id: pipeline_id.to_string(),
            payload: payload.clone(),
        });

        state
            .pipeline_responses
            .get(&scripted_key(pipeline_id, payload))
            .or_else(|| state.pipeline_defaults.get(pipeline_id))
            .cloned()
            .ok_or_else(|| PlatformError::Rejected(format!("unsupported input shape: {}", payload)))
    }

    fn search_index(&self, index_id: &str, call: &SearchCall) -> Result<RawResponse, Self::Error> {
        let mut state = self.state();
        state.calls.push(MockCall::Search {
            index_id: index_id.to_string(),
            call: call.clone(),
        });

        state
            .search_responses
            .get(call.label())
            .cloned()
            .ok_or_else(|| PlatformError::Rejected(format!("unexpected signature {}", call)))
    }

    fn upsert_records(&self, index_id: &str, records: &[IndexRecord]) -> Result<(), Self::Error> {
        let mut state = self.state();
        state.calls.push(MockCall::Upsert {
            index_id: index_id.to_string(),
            count: records.len(),
        });

        if state.fail_upserts {
            return Err(PlatformError::Communication("upsert refused".to_string()));
        }
        state.upserted.extend_from_slice(records);
        Ok(())
    }
}

fn scripted_key(asset_id: &str, payload: &Value) -> String {
    let shape = match payload {
        Value::Object(map) => Candidate::from(map.clone()).canonical_key(),
        other => other.to_string(),
    };
    format!("{}|{}", asset_id, shape)
}
