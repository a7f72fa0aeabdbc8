#![cfg(feature = "web")]

// Router tests for the file and validation paths — no remote calls.
//
// The graph and generation clients point at a closed local port; the
// exercised endpoints never reach them.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use graphseed::config::Config;
use graphseed::documents::DocumentStore;
use graphseed::generate::openai::OpenAiGenerator;
use graphseed::graph::client::GraphStoreClient;
use graphseed::web::{build_router, AppState};

fn test_state(tag: &str) -> AppState {
    let dir = std::env::temp_dir().join(format!("graphseed-web-{tag}-{}", std::process::id()));
    AppState {
        config: Arc::new(Config::load().unwrap()),
        store: Arc::new(DocumentStore::new(dir)),
        graph: Arc::new(GraphStoreClient::new("http://localhost:9", "test-key").unwrap()),
        generator: Arc::new(
            OpenAiGenerator::new("http://localhost:9", "test-key", "test-model").unwrap(),
        ),
    }
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_returns_ok() {
    let app = build_router(test_state("health"));
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn listing_an_empty_store_returns_no_files() {
    let app = build_router(test_state("list-empty"));
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/files")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["files"], serde_json::json!([]));
}

#[tokio::test]
async fn deleting_a_missing_file_reports_absence() {
    let app = build_router(test_state("delete-missing"));
    let request = Request::builder()
        .method("POST")
        .uri("/api/delete_file")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"file_name":"ghost.txt"}"#))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["message"]
        .as_str()
        .unwrap()
        .contains("does not exist"));
}

#[tokio::test]
async fn deleting_a_traversal_name_is_rejected() {
    let app = build_router(test_state("delete-traversal"));
    let request = Request::builder()
        .method("POST")
        .uri("/api/delete_file")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"file_name":"../secrets.txt"}"#))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_graph_requires_namespace_and_files() {
    let app = build_router(test_state("create-empty"));
    let request = Request::builder()
        .method("POST")
        .uri("/api/create_graph")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"namespace":"","files":[]}"#))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_graph_with_a_missing_file_is_not_found() {
    let app = build_router(test_state("create-missing"));
    let request = Request::builder()
        .method("POST")
        .uri("/api/create_graph")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"namespace":"papers","files":["nope.txt"]}"#))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("nope.txt"));
}

#[tokio::test]
async fn query_requires_namespace_and_question() {
    let app = build_router(test_state("query-empty"));
    let request = Request::builder()
        .method("POST")
        .uri("/api/query")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"namespace":"papers","question":"  "}"#))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
