//! Navigator Server
//!
//! HTTP route layer over the negotiation core: document upload and text
//! extraction, index upsert, pipeline questions, single-model chat and
//! index search.

#![warn(missing_docs)]

pub mod config;
pub mod handlers;

use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::Router;
use config::NavigatorConfig;
use handlers::{create_router, AppState};
use navigator_core::Navigator;
use navigator_platform::HttpPlatform;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Build the CORS layer from the configured origins
///
/// An empty list allows any origin. Origins that are not valid header
/// values are skipped with a warning.
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if allowed_origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();
    layer.allow_origin(origins)
}

/// Wrap the routes in the layers every deployment uses
pub fn build_app<P>(state: AppState<P>, config: &NavigatorConfig) -> Router
where
    P: navigator_domain::RemotePlatform + Send + Sync + 'static,
{
    create_router(state)
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(cors_layer(&config.allowed_origins))
        .layer(TraceLayer::new_for_http())
}

/// Start the navigator HTTP server
///
/// Builds the platform client, wires it into a [`Navigator`] and serves
/// the routes until the listener fails.
pub async fn start_server(config: NavigatorConfig) -> Result<(), ServerError> {
    info!("Starting Navigator server");
    info!("Bind address: {}", config.bind_addr());
    info!("Platform: {}", config.platform.base_url);
    info!(
        "Assets: llm={} extractor={} index={} pipeline={}",
        config.assets.llm_id,
        config.assets.pdf_extractor_id,
        config.assets.index_id,
        config.assets.pipeline_id
    );

    // The blocking client owns a runtime of its own and cannot be built on an async thread
    let platform_config = config.platform.clone();
    let platform = tokio::task::spawn_blocking(move || {
        HttpPlatform::with_timeout(
            platform_config.base_url,
            platform_config.api_key,
            Duration::from_secs(platform_config.timeout_secs),
        )
    })
    .await
    .map_err(|e| ServerError::Server(e.to_string()))?
    .map_err(|e| ServerError::Server(e.to_string()))?;

    let state = AppState::new(Navigator::new(platform, config.assets.clone()));
    let app = build_app(state, &config);

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Navigator listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    Ok(())
}
