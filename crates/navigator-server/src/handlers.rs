//! HTTP request handlers for the navigator service.
//!
//! Every handler hands its platform work to a blocking thread: the
//! platform client is synchronous and each negotiation attempt is awaited
//! before the next one starts.

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router as AxumRouter,
};
use navigator_core::{ChatReply, IndexItem, Navigator, NavigatorError};
use navigator_domain::{NegotiationOutcome, RemotePlatform, SearchOutcome, DEFAULT_TOP_K};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::io::Write;
use std::sync::Arc;
use tracing::{info, warn};

/// The only accepted upload content type
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Multipart field carrying the uploaded document
pub const UPLOAD_FIELD: &str = "file";

/// Shared application state
pub struct AppState<P>
where
    P: RemotePlatform,
{
    /// The navigator all routes delegate to
    pub navigator: Arc<Navigator<P>>,
}

impl<P> Clone for AppState<P>
where
    P: RemotePlatform,
{
    fn clone(&self) -> Self {
        Self {
            navigator: Arc::clone(&self.navigator),
        }
    }
}

impl<P> AppState<P>
where
    P: RemotePlatform,
{
    /// Wrap a navigator for sharing across requests
    pub fn new(navigator: Navigator<P>) -> Self {
        Self {
            navigator: Arc::new(navigator),
        }
    }
}

/// Text extracted from an uploaded document
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Extracted, cleaned text
    pub text: String,
    /// Name of the uploaded file
    pub filename: String,
}

/// Documents to upsert into the index
#[derive(Debug, Deserialize)]
pub struct IndexRequest {
    /// Items to index
    pub items: Vec<IndexItem>,
}

/// Result of an index upsert
#[derive(Debug, Serialize, Deserialize)]
pub struct IndexResponse {
    /// Number of records sent
    pub upserted: usize,
}

/// Question for the retrieval pipeline
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    /// The question
    pub question: String,
    /// Extra inputs set on every payload shape tried
    #[serde(default)]
    pub extra_inputs: Option<Map<String, Value>>,
}

/// Pipeline answer, including the negotiation diagnostics
#[derive(Debug, Serialize)]
pub struct AskResponse {
    /// The negotiation outcome
    pub data: NegotiationOutcome,
}

/// Message for a single chat model
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// The message
    pub message: String,
    /// Model to use instead of the configured one
    #[serde(default)]
    pub llm_id: Option<String>,
}

/// Index search request
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    /// Query text
    pub q: String,
    /// Maximum number of hits; absent, null or zero means the default
    #[serde(default)]
    pub top_k: Option<usize>,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Overall health status
    pub status: String,
    /// Service name
    pub service: String,
    /// Service version
    pub version: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Upload was not a PDF
    UnsupportedMediaType(String),
    /// Request was well-formed JSON or multipart but unusable
    InvalidRequest(String),
    /// Navigator operation failed
    NavigatorError(NavigatorError),
    /// Internal server error
    InternalError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::UnsupportedMediaType(msg) => (StatusCode::UNSUPPORTED_MEDIA_TYPE, msg),
            AppError::InvalidRequest(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            AppError::NavigatorError(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            AppError::InternalError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

impl From<NavigatorError> for AppError {
    fn from(e: NavigatorError) -> Self {
        AppError::NavigatorError(e)
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(e: tokio::task::JoinError) -> Self {
        AppError::InternalError(format!("Worker task failed: {}", e))
    }
}

impl From<axum::extract::multipart::MultipartError> for AppError {
    fn from(e: axum::extract::multipart::MultipartError) -> Self {
        AppError::InvalidRequest(format!("Invalid multipart body: {}", e))
    }
}

fn require_text(name: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::InvalidRequest(format!("{} must not be empty", name)));
    }
    Ok(())
}

/// POST /upload - Extract text from an uploaded PDF
///
/// The document is spooled to a temporary file that is removed when the
/// request finishes, whatever the outcome.
async fn upload<P>(
    State(state): State<AppState<P>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError>
where
    P: RemotePlatform + Send + Sync + 'static,
{
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        if field.content_type() != Some(PDF_CONTENT_TYPE) {
            return Err(AppError::UnsupportedMediaType(
                "Only PDF files are supported.".to_string(),
            ));
        }

        let filename = field.file_name().unwrap_or("upload.pdf").to_string();
        let bytes = field.bytes().await?;
        info!("Received upload {} ({} bytes)", filename, bytes.len());

        let navigator = Arc::clone(&state.navigator);
        let text = tokio::task::spawn_blocking(move || -> Result<String, AppError> {
            let mut spool = tempfile::Builder::new()
                .suffix(".pdf")
                .tempfile()
                .map_err(|e| AppError::InternalError(format!("Failed to spool upload: {}", e)))?;
            spool
                .write_all(&bytes)
                .and_then(|_| spool.flush())
                .map_err(|e| AppError::InternalError(format!("Failed to spool upload: {}", e)))?;

            navigator
                .extract_text(spool.path())
                .map_err(|e| AppError::InternalError(format!("Extraction failed: {}", e)))
        })
        .await??;

        if text.trim().is_empty() {
            warn!("Extraction of {} produced no text", filename);
            return Err(AppError::InternalError(
                "Extraction failed: No text extracted.".to_string(),
            ));
        }

        return Ok(Json(UploadResponse { text, filename }));
    }

    Err(AppError::InvalidRequest(format!(
        "Missing multipart field '{}'",
        UPLOAD_FIELD
    )))
}

/// POST /index - Upsert documents into the configured index
async fn index<P>(
    State(state): State<AppState<P>>,
    Json(request): Json<IndexRequest>,
) -> Result<Json<IndexResponse>, AppError>
where
    P: RemotePlatform + Send + Sync + 'static,
{
    let navigator = Arc::clone(&state.navigator);
    let upserted =
        tokio::task::spawn_blocking(move || navigator.index_texts(request.items)).await??;
    Ok(Json(IndexResponse { upserted }))
}

/// POST /ask - Ask the retrieval pipeline
///
/// Remote failures come back in the body, never as an error status.
async fn ask<P>(
    State(state): State<AppState<P>>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>, AppError>
where
    P: RemotePlatform + Send + Sync + 'static,
{
    require_text("question", &request.question)?;

    let navigator = Arc::clone(&state.navigator);
    let extra = request.extra_inputs.unwrap_or_default();
    let data =
        tokio::task::spawn_blocking(move || navigator.ask_pipeline(&request.question, extra))
            .await?;
    Ok(Json(AskResponse { data }))
}

/// POST /chat - Talk to a single model
async fn chat<P>(
    State(state): State<AppState<P>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatReply>, AppError>
where
    P: RemotePlatform + Send + Sync + 'static,
{
    require_text("message", &request.message)?;

    let navigator = Arc::clone(&state.navigator);
    let reply = tokio::task::spawn_blocking(move || {
        navigator.chat_single_model(&request.message, request.llm_id.as_deref())
    })
    .await??;
    Ok(Json(reply))
}

/// POST /search - Search the configured index
async fn search<P>(
    State(state): State<AppState<P>>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchOutcome>, AppError>
where
    P: RemotePlatform + Send + Sync + 'static,
{
    require_text("q", &request.q)?;

    let navigator = Arc::clone(&state.navigator);
    let top_k = request.top_k.unwrap_or(DEFAULT_TOP_K);
    let outcome =
        tokio::task::spawn_blocking(move || navigator.search_index(&request.q, top_k)).await?;
    Ok(Json(outcome))
}

/// GET /health - Liveness check
async fn health_check() -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "healthy".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Create the axum router with all routes
pub fn create_router<P>(state: AppState<P>) -> AxumRouter
where
    P: RemotePlatform + Send + Sync + 'static,
{
    AxumRouter::new()
        .route("/upload", post(upload::<P>))
        .route("/index", post(index::<P>))
        .route("/ask", post(ask::<P>))
        .route("/chat", post(chat::<P>))
        .route("/search", post(search::<P>))
        .route("/health", get(health_check))
        .with_state(state)
}
