//! HTTP Platform Implementation
//!
//! Talks to a REST-style computation platform over JSON.
//!
//! # Endpoints
//!
//! - `POST {base}/files` (multipart `file`) → download URL
//! - `POST {base}/models/{id}/run` and `POST {base}/pipelines/{id}/run` → response envelope
//! - `POST {base}/indexes/{id}/search` → hits
//! - `POST {base}/indexes/{id}/records` → upsert
//!
//! Every request is sent exactly once. A failed call is reported to the
//! caller, which decides whether another payload shape is worth trying.
//!
//! # Examples
//!
//! ```no_run
//! use navigator_platform::HttpPlatform;
//!
//! let platform = HttpPlatform::new("https://platform.example.com/api/v1", "secret-key").unwrap();
//! ```

use crate::PlatformError;
use navigator_domain::{IndexRecord, RawResponse, RemotePlatform, SearchCall};
use serde_json::{json, Value};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Default timeout for platform requests (2 minutes; pipelines are slow)
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Header carrying the API key
pub const API_KEY_HEADER: &str = "x-api-key";

/// Blocking HTTP client for the remote platform
pub struct HttpPlatform {
    base_url: String,
    api_key: String,
    client: reqwest::blocking::Client,
}

impl HttpPlatform {
    /// Create a client with the default timeout
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, PlatformError> {
        Self::with_timeout(base_url, api_key, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a client with an explicit request timeout
    pub fn with_timeout(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, PlatformError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;

        Ok(Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            client,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    fn post_json(
        &self,
        path: &str,
        body: &Value,
        query: &[(&str, String)],
    ) -> Result<Value, PlatformError> {
        let url = self.endpoint(path);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .query(query)
            .json(body)
            .send()?;

        read_body(response)
    }
}

fn read_body(response: reqwest::blocking::Response) -> Result<Value, PlatformError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(PlatformError::Status {
            status: status.as_u16(),
            body,
        });
    }

    let text = response.text()?;
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    // Some endpoints answer with bare text rather than JSON
    Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
}

/// A run response: objects are envelopes whose fields are attributes
fn envelope(value: Value) -> RawResponse {
    match value {
        Value::Object(fields) => RawResponse::Record(fields),
        other => RawResponse::from_json(other),
    }
}

/// Hits may arrive bare or under a `results`/`hits` key
fn hit_list(value: Value) -> RawResponse {
    if let Value::Object(mut fields) = value {
        for key in ["results", "hits"] {
            if matches!(fields.get(key), Some(Value::Array(_))) {
                if let Some(Value::Array(items)) = fields.remove(key) {
                    return RawResponse::Sequence(items);
                }
            }
        }
        return RawResponse::Structure(fields);
    }
    RawResponse::from_json(value)
}

/// Body and query string for a search signature
fn search_request(call: &SearchCall) -> (Value, Vec<(&'static str, String)>) {
    match call {
        SearchCall::PositionalTopK { query, top_k } => {
            (Value::String(query.clone()), vec![("top_k", top_k.to_string())])
        }
        SearchCall::NamedTopK { query, top_k } => {
            (json!({ "query": query, "top_k": top_k }), Vec::new())
        }
        SearchCall::NamedK { query, k } => (json!({ "query": query, "k": k }), Vec::new()),
        SearchCall::QueryOnly { query } => (Value::String(query.clone()), Vec::new()),
    }
}

impl RemotePlatform for HttpPlatform {
    type Error = PlatformError;

    fn upload(&self, local_path: &Path) -> Result<String, Self::Error> {
        let url = self.endpoint("files");
        debug!("POST {} ({})", url, local_path.display());

        let form = reqwest::blocking::multipart::Form::new().file("file", local_path)?;
        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .multipart(form)
            .send()?;

        match read_body(response)? {
            Value::String(link) => Ok(link),
            Value::Object(fields) => ["url", "download_url"]
                .iter()
                .find_map(|key| fields.get(*key).and_then(Value::as_str))
                .map(str::to_string)
                .ok_or_else(|| {
                    PlatformError::InvalidResponse("upload response has no url".to_string())
                }),
            other => Err(PlatformError::InvalidResponse(format!(
                "unexpected upload response: {}",
                other
            ))),
        }
    }

    fn run_model(&self, model_id: &str, payload: &Value) -> Result<RawResponse, Self::Error> {
        let body = self.post_json(&format!("models/{}/run", model_id), payload, &[])?;
        Ok(envelope(body))
    }

    fn run_pipeline(&self, pipeline_id: &str, payload: &Value) -> Result<RawResponse, Self::Error> {
        let body = self.post_json(&format!("pipelines/{}/run", pipeline_id), payload, &[])?;
        Ok(envelope(body))
    }

    fn search_index(&self, index_id: &str, call: &SearchCall) -> Result<RawResponse, Self::Error> {
        let (body, query) = search_request(call);
        let response = self.post_json(&format!("indexes/{}/search", index_id), &body, &query)?;
        Ok(hit_list(response))
    }

    fn upsert_records(&self, index_id: &str, records: &[IndexRecord]) -> Result<(), Self::Error> {
        let body = json!({ "records": records });
        self.post_json(&format!("indexes/{}/records", index_id), &body, &[])?;
        Ok(())
    }
}
