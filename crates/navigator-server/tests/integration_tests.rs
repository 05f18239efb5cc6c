//! Integration tests for the navigator service

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use navigator_core::{AssetIds, Navigator};
use navigator_domain::{RawResponse, SearchCall};
use navigator_platform::{MockCall, MockPlatform};
use navigator_server::{
    build_app,
    config::NavigatorConfig,
    handlers::{create_router, AppState, HealthCheckResponse, IndexResponse, UploadResponse},
};
use serde_json::{json, Value};
use tower::ServiceExt; // for oneshot

const BOUNDARY: &str = "navigator-test-boundary";

/// Helper to create test application state
fn create_test_state(platform: MockPlatform) -> AppState<MockPlatform> {
    let assets = AssetIds {
        llm_id: "llm-1".to_string(),
        pdf_extractor_id: "pdf-1".to_string(),
        index_id: "idx1".to_string(),
        pipeline_id: "pipe-1".to_string(),
    };
    AppState::new(Navigator::new(platform, assets))
}

fn json_request(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn multipart_request(filename: &str, content_type: &str, content: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
            filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn read_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// The spooled upload must be gone once the request is done
fn assert_spool_removed(platform: &MockPlatform) {
    match platform.calls().first() {
        Some(MockCall::Upload(path)) => {
            assert!(!path.exists(), "{} still exists", path.display())
        }
        other => panic!("expected an upload first, got {:?}", other),
    }
}

#[tokio::test]
async fn test_health_check_endpoint() {
    let app = create_router(create_test_state(MockPlatform::new()));

    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let health: HealthCheckResponse = serde_json::from_slice(&body).unwrap();

    assert_eq!(health.status, "healthy");
    assert_eq!(health.service, "navigator-server");
    assert!(!health.version.is_empty());
}

#[tokio::test]
async fn test_ask_negotiates_payload_shape() {
    let accepted = json!({"question": "What is the policy?", "index_id": "idx1"});
    let platform = MockPlatform::new().with_pipeline_response(
        "pipe-1",
        accepted.clone(),
        RawResponse::from_json(json!({"status": "ok", "output": "Answer text"})),
    );
    let app = create_router(create_test_state(platform));

    let response = app
        .oneshot(json_request("/ask", json!({"question": "What is the policy?"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["data"]["output"], json!("Answer text"));
    assert_eq!(body["data"]["_used_payload"], accepted);
    assert_eq!(body["data"]["_tried_payloads"].as_array().unwrap().len(), 15);
    assert!(body["data"]["_elapsed_local_s"].is_number());
}

#[tokio::test]
async fn test_ask_exhaustion_is_not_an_error_status() {
    let app = create_router(create_test_state(MockPlatform::new()));

    let response = app
        .oneshot(json_request(
            "/ask",
            json!({"question": "Anything?", "extra_inputs": {"language": "en"}}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["data"]["status"], json!("FAILED"));
    assert_eq!(body["data"]["_used_payload"], Value::Null);

    let tried = body["data"]["_tried_payloads"].as_array().unwrap();
    assert_eq!(tried.len(), 280);
    assert!(tried.iter().all(|payload| payload["language"] == json!("en")));
}

#[tokio::test]
async fn test_search_endpoint() {
    let calls = SearchCall::signatures("tariffs", 3);
    let platform = MockPlatform::new().with_search_response(
        &calls[1],
        RawResponse::Sequence(vec![json!({
            "id": "a1",
            "score": 0.92,
            "value": "clause text",
            "meta": {"law": "EO-123"}
        })]),
    );
    let app = create_router(create_test_state(platform.clone()));

    let response = app
        .oneshot(json_request("/search", json!({"q": "tariffs", "top_k": 3})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(
        body,
        json!({
            "status": "OK",
            "count": 1,
            "results": [{
                "id": "a1",
                "score": 0.92,
                "text": "clause text",
                "attributes": {"law": "EO-123"}
            }]
        })
    );
    assert_eq!(platform.call_count(), 2);
}

#[tokio::test]
async fn test_search_null_top_k_uses_default() {
    let platform = MockPlatform::new().with_search_response(
        &SearchCall::signatures("tariffs", 5)[0],
        RawResponse::Sequence(vec![json!("clause")]),
    );
    let app = create_router(create_test_state(platform.clone()));

    let response = app
        .oneshot(json_request("/search", json!({"q": "tariffs", "top_k": null})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["count"], json!(1));

    match platform.calls().first() {
        Some(MockCall::Search { call, .. }) => {
            assert_eq!(call, &SearchCall::signatures("tariffs", 5)[0])
        }
        other => panic!("expected a search, got {:?}", other),
    }
}

#[tokio::test]
async fn test_search_failure_reports_trace() {
    let app = create_router(create_test_state(MockPlatform::new()));

    let response = app
        .oneshot(json_request("/search", json!({"q": "tariffs"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["status"], json!("FAILED"));
    assert_eq!(body["error"], json!("All search call signatures failed"));
    assert_eq!(body["trace"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_index_endpoint() {
    let platform = MockPlatform::new();
    let app = create_router(create_test_state(platform.clone()));

    let response = app
        .oneshot(json_request(
            "/index",
            json!({"items": [
                {"id": "d1", "text": "first", "meta": {"law": "EO-123"}},
                {"text": "second"}
            ]}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let indexed: IndexResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(indexed.upserted, 2);

    let records = platform.upserted_records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id.as_deref(), Some("d1"));
    assert!(matches!(
        platform.calls().last(),
        Some(MockCall::Upsert { index_id, .. }) if index_id == "idx1"
    ));
}

#[tokio::test]
async fn test_index_failure_is_server_error() {
    let app = create_router(create_test_state(MockPlatform::new().failing_upserts()));

    let response = app
        .oneshot(json_request("/index", json!({"items": [{"text": "t"}]})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(read_json(response).await["error"]
        .as_str()
        .unwrap()
        .starts_with("Index error"));
}

#[tokio::test]
async fn test_upload_extracts_text() {
    let platform = MockPlatform::new().with_model_default(
        "pdf-1",
        RawResponse::from_json(json!({"text": "The agency\u{e2}\u{80}\u{99}s rule"})),
    );
    let app = create_router(create_test_state(platform.clone()));

    let response = app
        .oneshot(multipart_request("order.pdf", "application/pdf", b"%PDF-1.4 fake"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let uploaded: UploadResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(uploaded.filename, "order.pdf");
    assert_eq!(uploaded.text, "The agency\u{2019}s rule");

    assert_spool_removed(&platform);
}

#[tokio::test]
async fn test_upload_rejects_non_pdf() {
    let platform = MockPlatform::new();
    let app = create_router(create_test_state(platform.clone()));

    let response = app
        .oneshot(multipart_request("notes.txt", "text/plain", b"hello"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(platform.call_count(), 0);
}

#[tokio::test]
async fn test_upload_with_empty_extraction() {
    let platform = MockPlatform::new().with_model_default("pdf-1", RawResponse::Text("   ".into()));
    let app = create_router(create_test_state(platform.clone()));

    let response = app
        .oneshot(multipart_request("blank.pdf", "application/pdf", b"%PDF-1.4"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        read_json(response).await["error"],
        json!("Extraction failed: No text extracted.")
    );
    assert_spool_removed(&platform);
}

#[tokio::test]
async fn test_upload_extraction_exhausted() {
    let platform = MockPlatform::new();
    let app = create_router(create_test_state(platform.clone()));

    let response = app
        .oneshot(multipart_request("order.pdf", "application/pdf", b"%PDF-1.4"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let error = read_json(response).await["error"].as_str().unwrap().to_string();
    assert!(error.starts_with("Extraction failed: text extractor failed after 5 attempts"));
    assert_spool_removed(&platform);
}

#[tokio::test]
async fn test_built_app_serves_routes() {
    let config = NavigatorConfig::default_test_config();
    let app = build_app(create_test_state(MockPlatform::new()), &config);

    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .header("origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "http://localhost:3000"
    );
}
