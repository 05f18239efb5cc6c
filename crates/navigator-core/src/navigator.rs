//! Core Navigator implementation

use crate::candidates::generate_candidates;
use crate::config::AssetIds;
use crate::error::NavigatorError;
use crate::extraction::extract_with_shapes;
use crate::hits::search_with_signatures;
use crate::negotiate::negotiate;
use crate::response::extract_primary_text;
use crate::types::{ChatReply, IndexItem};
use navigator_domain::{
    IndexRecord, NegotiationOutcome, RawResponse, RemotePlatform, SearchOutcome, SemanticRequest,
};
use serde_json::{Map, Value};
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// The operations exposed to the route layer
///
/// Holds a remote platform and the ids of the assets to use on it. Each
/// call is independent: no state is carried from one operation to the next.
pub struct Navigator<P>
where
    P: RemotePlatform,
{
    platform: P,
    assets: AssetIds,
}

impl<P> Navigator<P>
where
    P: RemotePlatform,
{
    /// Create a new Navigator
    pub fn new(platform: P, assets: AssetIds) -> Self {
        Self { platform, assets }
    }

    /// The remote platform
    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// The configured asset ids
    pub fn assets(&self) -> &AssetIds {
        &self.assets
    }

    /// Upload a local document and extract its text
    ///
    /// Fails with [`NavigatorError::ExtractionExhausted`] when the extractor
    /// accepts none of the input shapes.
    pub fn extract_text(&self, local_path: &Path) -> Result<String, NavigatorError> {
        let started = Instant::now();
        let file_url = self
            .platform
            .upload(local_path)
            .map_err(|e| NavigatorError::Upload(e.to_string()))?;
        info!(
            "Uploaded {} in {:.2}s -> {}",
            local_path.display(),
            started.elapsed().as_secs_f64(),
            file_url
        );

        extract_with_shapes(&self.platform, &self.assets.pdf_extractor_id, &file_url)
    }

    /// Upsert text documents into the configured index
    ///
    /// Returns the number of records sent.
    pub fn index_texts(&self, items: Vec<IndexItem>) -> Result<usize, NavigatorError> {
        let records: Vec<IndexRecord> = items
            .into_iter()
            .map(|item| IndexRecord::text(item.id, item.text, item.meta.unwrap_or_default()))
            .collect();

        self.platform
            .upsert_records(&self.assets.index_id, &records)
            .map_err(|e| NavigatorError::Index(e.to_string()))?;

        info!("Upserted {} records into {}", records.len(), self.assets.index_id);
        Ok(records.len())
    }

    /// Ask the retrieval pipeline a question, negotiating the payload shape
    ///
    /// Never fails: when no shape is accepted the outcome says so and lists
    /// every payload tried.
    pub fn ask_pipeline(
        &self,
        question: &str,
        extra_params: Map<String, Value>,
    ) -> NegotiationOutcome {
        let request = SemanticRequest::new(question)
            .with_auxiliary_id(self.assets.index_id.clone())
            .with_extra_params(extra_params);
        let candidates = generate_candidates(&request);

        info!(
            "Asking pipeline {} with up to {} payload shapes",
            self.assets.pipeline_id,
            candidates.len()
        );

        negotiate(&candidates, |candidate| {
            self.platform
                .run_pipeline(&self.assets.pipeline_id, &candidate.to_value())
        })
    }

    /// Send a message straight to one model, no negotiation
    ///
    /// Uses the configured chat model when `model_id` is `None`.
    pub fn chat_single_model(
        &self,
        message: &str,
        model_id: Option<&str>,
    ) -> Result<ChatReply, NavigatorError> {
        let model_id = model_id.unwrap_or(&self.assets.llm_id);
        let raw = self
            .platform
            .run_model(model_id, &Value::String(message.to_string()))
            .map_err(|e| NavigatorError::Chat(e.to_string()))?;

        Ok(chat_reply(&raw))
    }

    /// Search the configured index
    pub fn search_index(&self, query: &str, top_k: usize) -> SearchOutcome {
        search_with_signatures(&self.platform, &self.assets.index_id, query, top_k)
    }
}

fn chat_reply(raw: &RawResponse) -> ChatReply {
    let data = match raw.get_field("data") {
        Some(data) if !data.is_null() => data.clone(),
        _ => raw.to_value(),
    };

    match data {
        Value::String(output) => ChatReply { output, raw: None },
        Value::Object(fields) => ChatReply {
            output: extract_primary_text(&fields),
            raw: Some(fields),
        },
        _ => ChatReply {
            output: raw.describe(),
            raw: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use navigator_platform::MockPlatform;
    use serde_json::json;

    fn create_test_navigator(platform: MockPlatform) -> Navigator<MockPlatform> {
        Navigator::new(platform, AssetIds::default())
    }

    #[test]
    fn test_chat_reply_shapes() {
        assert_eq!(
            chat_reply(&RawResponse::Text("hi".into())),
            ChatReply {
                output: "hi".to_string(),
                raw: None
            }
        );

        let reply = chat_reply(&RawResponse::from_json(json!({"result": "r", "usage": 3})));
        assert_eq!(reply.output, "r");
        assert_eq!(reply.raw.unwrap().get("usage"), Some(&json!(3)));

        let reply = chat_reply(&RawResponse::Opaque(json!(12)));
        assert_eq!(reply.output, "12");
        assert!(reply.raw.is_none());
    }

    #[test]
    fn test_chat_reply_unwraps_envelope_data() {
        let mut envelope = Map::new();
        envelope.insert("status".to_string(), json!("SUCCESS"));
        envelope.insert("data".to_string(), json!("model answer"));
        let reply = chat_reply(&RawResponse::Record(envelope));
        assert_eq!(reply.output, "model answer");
    }

    #[test]
    fn test_chat_uses_default_model() {
        let assets = AssetIds::default();
        let platform = MockPlatform::new().with_model_response(
            &assets.llm_id,
            json!("hello"),
            RawResponse::Text("hi there".into()),
        );
        let navigator = create_test_navigator(platform);
        let reply = navigator.chat_single_model("hello", None).unwrap();
        assert_eq!(reply.output, "hi there");
    }

    #[test]
    fn test_chat_with_model_override() {
        let platform = MockPlatform::new()
            .with_model_default("other-model", RawResponse::Text("override".into()));
        let navigator = create_test_navigator(platform);

        assert_eq!(
            navigator.chat_single_model("x", Some("other-model")).unwrap().output,
            "override"
        );
        assert!(matches!(
            navigator.chat_single_model("x", None),
            Err(NavigatorError::Chat(_))
        ));
    }

    #[test]
    fn test_index_texts() {
        let platform = MockPlatform::new();
        let navigator = create_test_navigator(platform.clone());

        let mut meta = Map::new();
        meta.insert("law".to_string(), json!("EO-123"));
        let items = vec![
            IndexItem {
                id: Some("d1".to_string()),
                text: "first".to_string(),
                meta: Some(meta.clone()),
            },
            IndexItem {
                id: None,
                text: "second".to_string(),
                meta: None,
            },
        ];

        assert_eq!(navigator.index_texts(items).unwrap(), 2);
        let records = platform.upserted_records();
        assert_eq!(records[0], IndexRecord::text(Some("d1".to_string()), "first", meta));
        assert_eq!(records[1].value_type, "text");
        assert!(records[1].attributes.is_empty());
    }

    #[test]
    fn test_index_texts_failure() {
        let navigator = create_test_navigator(MockPlatform::new().failing_upserts());
        let items = vec![IndexItem {
            id: None,
            text: "t".to_string(),
            meta: None,
        }];
        assert!(matches!(navigator.index_texts(items), Err(NavigatorError::Index(_))));
    }

    #[test]
    fn test_upload_failure_is_reported() {
        let navigator = create_test_navigator(MockPlatform::new().failing_uploads());
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(matches!(
            navigator.extract_text(file.path()),
            Err(NavigatorError::Upload(_))
        ));
    }
}
