//! Document text extraction over a small fixed set of input shapes

use crate::error::NavigatorError;
use crate::negotiate::{classify, FAILURE_STATUS};
use crate::response::{
    attempt_fields, extract_primary_text, normalize_response, PRIMARY_TEXT_FIELDS,
};
use crate::text::normalize_text;
use navigator_domain::response::{first_present, render_text};
use navigator_domain::{AttemptOutcome, RemotePlatform};
use serde_json::{json, Map, Value};
use std::time::Instant;
use tracing::{info, warn};

/// Field names a file URL is offered under, after the bare URL
pub const URL_FIELD_ALIASES: [&str; 4] = ["url", "file", "document_url", "input"];

/// The shapes an extractor is offered a file URL in, in order
pub fn extraction_shapes(file_url: &str) -> Vec<Value> {
    std::iter::once(Value::String(file_url.to_string()))
        .chain(URL_FIELD_ALIASES.iter().map(|alias| json!({ *alias: file_url })))
        .collect()
}

/// Run the extractor model on an uploaded file until one shape works
///
/// The first accepted response is normalized, its primary text pulled out
/// and cleaned. If every shape fails this is an error naming the number of
/// attempts and the last failure.
pub fn extract_with_shapes<P>(
    platform: &P,
    model_id: &str,
    file_url: &str,
) -> Result<String, NavigatorError>
where
    P: RemotePlatform,
{
    let shapes = extraction_shapes(file_url);
    let started = Instant::now();
    let mut last_error = String::from("no attempt made");

    for (index, shape) in shapes.iter().enumerate() {
        let attempt = index + 1;
        match platform.run_model(model_id, shape) {
            Ok(raw) => {
                let envelope = attempt_fields(&raw);
                if classify(&envelope) == AttemptOutcome::Failure {
                    last_error = envelope
                        .get("error")
                        .map(render_text)
                        .unwrap_or_else(|| format!("status {}", FAILURE_STATUS));
                    warn!("Extraction try {} reported failure: {}", attempt, last_error);
                    continue;
                }

                info!(
                    "Extraction try {} OK in {:.2}s",
                    attempt,
                    started.elapsed().as_secs_f64()
                );
                let text = document_text(&normalize_response(&raw));
                return Ok(normalize_text(&text));
            }
            Err(e) => {
                warn!("Extraction try {} failed: {}", attempt, e);
                last_error = e.to_string();
            }
        }
    }

    Err(NavigatorError::ExtractionExhausted {
        attempts: shapes.len(),
        last_error,
    })
}

/// The document text of an accepted response
///
/// A response whose only text is blank yields an empty string instead of
/// the stringified mapping.
fn document_text(fields: &Map<String, Value>) -> String {
    let present = first_present(PRIMARY_TEXT_FIELDS.iter().map(|name| fields.get(*name)));
    let blank_text = PRIMARY_TEXT_FIELDS
        .iter()
        .any(|name| matches!(fields.get(*name), Some(Value::String(_))));

    if present.is_none() && blank_text {
        String::new()
    } else {
        extract_primary_text(fields)
    }
}
