//! Semantic request - what the caller means, independent of wire shape

use serde_json::{Map, Value};

/// A caller's request before any payload shape has been chosen
///
/// Immutable once constructed. Extra parameters with a null value are
/// dropped at construction, so every remaining extra is applied to every
/// generated candidate.
///
/// # Examples
///
/// ```
/// use navigator_domain::SemanticRequest;
/// use serde_json::{json, Map};
///
/// let mut extras = Map::new();
/// extras.insert("lang".to_string(), json!("en"));
/// extras.insert("unset".to_string(), json!(null));
///
/// let request = SemanticRequest::new("What is the policy?")
///     .with_auxiliary_id("idx1")
///     .with_extra_params(extras);
///
/// assert_eq!(request.auxiliary_id(), Some("idx1"));
/// assert_eq!(request.extra_params().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SemanticRequest {
    primary_text: String,
    auxiliary_id: Option<String>,
    extra_params: Map<String, Value>,
}

impl SemanticRequest {
    /// Create a request carrying only the primary text
    pub fn new(primary_text: impl Into<String>) -> Self {
        Self {
            primary_text: primary_text.into(),
            auxiliary_id: None,
            extra_params: Map::new(),
        }
    }

    /// Attach an auxiliary identifier (typically an index id)
    ///
    /// An empty identifier is treated as absent.
    pub fn with_auxiliary_id(mut self, auxiliary_id: impl Into<String>) -> Self {
        let id = auxiliary_id.into();
        self.auxiliary_id = if id.is_empty() { None } else { Some(id) };
        self
    }

    /// Attach extra key/value parameters, excluding unset (null) values
    pub fn with_extra_params(mut self, extra_params: Map<String, Value>) -> Self {
        self.extra_params = extra_params
            .into_iter()
            .filter(|(_, value)| !value.is_null())
            .collect();
        self
    }

    /// The question or document reference
    pub fn primary_text(&self) -> &str {
        &self.primary_text
    }

    /// The auxiliary identifier, if any
    pub fn auxiliary_id(&self) -> Option<&str> {
        self.auxiliary_id.as_deref()
    }

    /// Extra parameters (never contains null values)
    pub fn extra_params(&self) -> &Map<String, Value> {
        &self.extra_params
    }
}
