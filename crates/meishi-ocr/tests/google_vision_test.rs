//! Integration tests for the Google Vision backend against a local stub server.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode, Uri},
    Json, Router,
};
use meishi_core::error::ErrorCode;
use meishi_ocr::{GoogleVisionOcr, OcrBackend, OcrConfig};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct Captured {
    uri: String,
    authorization: Option<String>,
    body: Value,
}

#[derive(Clone)]
struct Stub {
    status: StatusCode,
    response: Value,
    captured: Arc<Mutex<Captured>>,
}

async fn handle(
    State(stub): State<Stub>,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    *stub.captured.lock().unwrap() = Captured {
        uri: uri.to_string(),
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    };
    (stub.status, Json(stub.response))
}

/// Start a stub Vision server and return its base URL and captured request.
async fn spawn_stub(status: StatusCode, response: Value) -> (String, Arc<Mutex<Captured>>) {
    let captured = Arc::new(Mutex::new(Captured::default()));
    let stub = Stub {
        status,
        response,
        captured: captured.clone(),
    };
    let router = Router::new().fallback(handle).with_state(stub);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (format!("http://{}", addr), captured)
}

fn config(endpoint: &str) -> OcrConfig {
    OcrConfig {
        api_key: Some("test-key".to_string()),
        endpoint: Some(endpoint.to_string()),
        ..Default::default()
    }
}

fn hints() -> Vec<String> {
    vec!["ja".to_string(), "en".to_string()]
}

fn document_response() -> Value {
    json!({
        "responses": [{
            "fullTextAnnotation": {
                "text": "山田 太郎\n",
                "pages": [{
                    "blocks": [{
                        "boundingBox": {"vertices": [{"x": 10, "y": 10}, {"x": 110, "y": 10}, {"x": 110, "y": 30}, {"x": 10, "y": 30}]},
                        "paragraphs": [{"words": [
                            {"symbols": [{"text": "山"}, {"text": "田", "property": {"detectedBreak": {"type": "SPACE"}}}]},
                            {"symbols": [{"text": "太"}, {"text": "郎", "property": {"detectedBreak": {"type": "LINE_BREAK"}}}]}
                        ]}]
                    }]
                }]
            }
        }]
    })
}

#[tokio::test]
async fn test_detect_text_with_api_key() {
    let (endpoint, captured) = spawn_stub(StatusCode::OK, document_response()).await;
    let ocr = GoogleVisionOcr::new(config(&endpoint)).unwrap();

    let blocks = ocr.detect_text(b"\xFF\xD8\xFFimage", &hints()).await.unwrap();
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].text, "山田 太郎");
    assert_eq!(blocks[0].width, 100.0);

    let captured = captured.lock().unwrap();
    assert_eq!(captured.uri, "/v1/images:annotate?key=test-key");
    assert!(captured.authorization.is_none());
    let request = &captured.body["requests"][0];
    assert_eq!(request["features"][0]["type"], "DOCUMENT_TEXT_DETECTION");
    assert_eq!(request["imageContext"]["languageHints"], json!(["ja", "en"]));
    assert_eq!(request["image"]["content"], "/9j/aW1hZ2U=");
}

#[tokio::test]
async fn test_detect_text_with_access_token() {
    let (endpoint, captured) = spawn_stub(StatusCode::OK, json!({"responses": [{}]})).await;
    let ocr = GoogleVisionOcr::new(OcrConfig {
        api_key: None,
        access_token: Some("oauth-token".to_string()),
        ..config(&endpoint)
    })
    .unwrap();

    let blocks = ocr.detect_text(b"image", &hints()).await.unwrap();
    assert!(blocks.is_empty());

    let captured = captured.lock().unwrap();
    assert_eq!(captured.uri, "/v1/images:annotate");
    assert_eq!(captured.authorization.as_deref(), Some("Bearer oauth-token"));
}

#[tokio::test]
async fn test_no_responses_is_empty() {
    let (endpoint, _) = spawn_stub(StatusCode::OK, json!({})).await;
    let ocr = GoogleVisionOcr::new(config(&endpoint)).unwrap();
    assert!(ocr.detect_text(b"image", &[]).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_embedded_error_is_service_failure() {
    let response = json!({"responses": [{"error": {"code": 7, "message": "Billing disabled"}}]});
    let (endpoint, _) = spawn_stub(StatusCode::OK, response).await;
    let ocr = GoogleVisionOcr::new(config(&endpoint)).unwrap();

    let err = ocr.detect_text(b"image", &hints()).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::OcrBackendFailed);
    assert!(err.to_string().contains("Billing disabled"));
}

#[tokio::test]
async fn test_http_error_status() {
    let response = json!({"error": {"code": 403, "message": "API key not valid"}});
    let (endpoint, _) = spawn_stub(StatusCode::FORBIDDEN, response).await;
    let ocr = GoogleVisionOcr::new(config(&endpoint)).unwrap();

    let err = ocr.detect_text(b"image", &hints()).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::AuthInvalidKey);
    assert!(err.to_string().contains("API key not valid"));
}

#[tokio::test]
async fn test_server_error_status() {
    let (endpoint, _) = spawn_stub(StatusCode::INTERNAL_SERVER_ERROR, json!({})).await;
    let ocr = GoogleVisionOcr::new(config(&endpoint)).unwrap();

    let err = ocr.detect_text(b"image", &hints()).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::OcrBackendFailed);
    assert!(err.to_string().contains("500"));
}
