//! Platform asset identifiers
//!
//! Fixed ids of the remote assets the navigator talks to. They are passed
//! into [`crate::Navigator`] at construction; nothing in the core reads
//! them from the environment.

use crate::error::NavigatorError;
use serde::{Deserialize, Serialize};

/// Ids of the remote models, index and pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetIds {
    /// Default chat model
    #[serde(default = "default_llm_id")]
    pub llm_id: String,

    /// Document text extraction model
    #[serde(default = "default_pdf_extractor_id")]
    pub pdf_extractor_id: String,

    /// Knowledge index used for search, upsert and pipeline requests
    #[serde(default = "default_index_id")]
    pub index_id: String,

    /// Retrieval pipeline answering questions
    #[serde(default = "default_pipeline_id")]
    pub pipeline_id: String,
}

fn default_llm_id() -> String {
    "669a63646eb56306647e1091".to_string()
}

fn default_pdf_extractor_id() -> String {
    "68bc1bc82c12f9d53ce1e79a".to_string()
}

fn default_index_id() -> String {
    "68bd86666e7528eb1aa6f237".to_string()
}

fn default_pipeline_id() -> String {
    "68bc1d45def19d770c260355".to_string()
}

impl Default for AssetIds {
    fn default() -> Self {
        Self {
            llm_id: default_llm_id(),
            pdf_extractor_id: default_pdf_extractor_id(),
            index_id: default_index_id(),
            pipeline_id: default_pipeline_id(),
        }
    }
}

impl AssetIds {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), NavigatorError> {
        for (name, value) in [
            ("llm_id", &self.llm_id),
            ("pdf_extractor_id", &self.pdf_extractor_id),
            ("index_id", &self.index_id),
            ("pipeline_id", &self.pipeline_id),
        ] {
            if value.trim().is_empty() {
                return Err(NavigatorError::Config(format!("{} must not be empty", name)));
            }
        }
        Ok(())
    }

    /// Load asset ids from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, NavigatorError> {
        let ids: AssetIds = toml::from_str(toml_str)?;
        ids.validate()?;
        Ok(ids)
    }
}
