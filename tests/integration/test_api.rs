//! HTTP router tests driven through `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use campus_concierge::config::Config;
use campus_concierge::{create_router, ApiState, ChatResponse, DatasetStore, QueryExecutor};

use super::test_pipeline::create_datasets;

fn create_app(dir: &TempDir) -> Router {
    let mut config = Config::default();
    config.data.dir = dir.path().to_string_lossy().to_string();
    let store = Arc::new(DatasetStore::load(config.data_dir()).unwrap());
    let executor = QueryExecutor::from_config(store, &config).unwrap();
    create_router(Arc::new(ApiState::new(Arc::new(executor))), &config.server)
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

async fn get_json(app: Router, uri: &str) -> Value {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

async fn post_chat(app: Router, body: Value) -> ChatResponse {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

#[tokio::test]
async fn test_healthz() {
    let dir = create_datasets();
    let body = get_json(create_app(&dir), "/healthz").await;
    assert_eq!(body, serde_json::json!({"status": "ok"}));
}

#[tokio::test]
async fn test_chat_answers_and_echoes_category() {
    let dir = create_datasets();
    let reply = post_chat(
        create_app(&dir),
        serde_json::json!({"content": "田中先生のオフィスアワーは?", "category": "faculty-page", "type": "text"}),
    )
    .await;

    assert_eq!(reply.sender, "bot");
    assert_eq!(reply.category, "faculty-page");
    assert!(reply.content.contains("田中 先生のオフィスアワー"));
    assert!(chrono::DateTime::parse_from_rfc3339(&reply.timestamp).is_ok());
}

#[tokio::test]
async fn test_chat_declared_category_overrides_classification() {
    let dir = create_datasets();
    let reply = post_chat(
        create_app(&dir),
        serde_json::json!({"content": "サッカー", "category": "clubs"}),
    )
    .await;

    assert!(reply.content.starts_with("【サッカー部】"));
    assert_eq!(reply.category, "clubs");
}

#[tokio::test]
async fn test_chat_without_category() {
    let dir = create_datasets();
    let reply = post_chat(create_app(&dir), serde_json::json!({"content": "学生証 再発行"})).await;

    assert_eq!(reply.category, "");
    assert!(reply.content.contains("[faq#1]"));
}

#[tokio::test]
async fn test_chat_category_is_never_null() {
    let dir = create_datasets();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"content": "こんにちは"}"#))
        .unwrap();
    let response = create_app(&dir).oneshot(request).await.unwrap();
    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body["category"], "");
}

#[tokio::test]
async fn test_chat_rejects_missing_content() {
    let dir = create_datasets();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"category": "clubs"}"#))
        .unwrap();
    let response = create_app(&dir).oneshot(request).await.unwrap();
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_debug_data_counts() {
    let dir = create_datasets();
    let body = get_json(create_app(&dir), "/admin/debug-data").await;

    assert_eq!(body["faculty_count"], 2);
    assert_eq!(body["club_count"], 2);
    assert_eq!(body["calendar_count"], 4);
    assert_eq!(body["skipped_files"], 1);
    assert_eq!(body["datasets"].as_array().unwrap().len(), 4);
    assert!(body["cwd"].is_string());
    assert!(body["metrics"]["uptime_seconds"].is_i64());
    assert!(body["metrics"]["dataset_load_errors_total"].as_u64().unwrap() >= 1);
}

#[tokio::test]
async fn test_teachers_listing() {
    let dir = create_datasets();

    let all = get_json(create_app(&dir), "/admin/teachers").await;
    assert_eq!(all["count"], 2);
    assert!(all.get("like").is_none());

    let filtered = get_json(create_app(&dir), "/admin/teachers?like=%E6%AF%94%E5%98%89").await;
    assert_eq!(filtered["like"], "比嘉");
    assert_eq!(filtered["count"], 1);
    assert_eq!(filtered["names"][0], "比嘉 正");
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let dir = create_datasets();
    let app = create_app(&dir);
    post_chat(app.clone(), serde_json::json!({"content": "サッカー部ある?"})).await;

    let response = app
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let text = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(text.contains("campus_queries_total"));
    assert!(text.contains("campus_uptime_seconds"));
}
