//! Error types for the negotiation core

use thiserror::Error;

/// Errors surfaced to callers of [`crate::Navigator`]
///
/// Remote failures inside a negotiation never appear here; they are
/// recorded in the returned outcome instead. Only text extraction turns
/// exhaustion into an error, because it has no partial answer to give.
#[derive(Error, Debug)]
pub enum NavigatorError {
    /// Every extraction shape failed
    #[error("text extractor failed after {attempts} attempts: {last_error}")]
    ExtractionExhausted {
        /// Number of shapes tried
        attempts: usize,
        /// Description of the last failure
        last_error: String,
    },

    /// File upload failed
    #[error("Upload error: {0}")]
    Upload(String),

    /// Single-model chat failed
    #[error("Chat error: {0}")]
    Chat(String),

    /// Index upsert failed
    #[error("Index error: {0}")]
    Index(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<toml::de::Error> for NavigatorError {
    fn from(e: toml::de::Error) -> Self {
        NavigatorError::Config(e.to_string())
    }
}
