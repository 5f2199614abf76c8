//! HTTP request handlers.

use axum::{
    extract::{Query as QueryParams, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::dataset::DatasetSummary;
use crate::directory::DirectoryResolver;
use crate::metrics::{get_metrics, MetricsSnapshot};
use crate::query::{Query, QueryExecutor};

/// Application state shared across handlers.
pub struct ApiState {
    pub executor: Arc<QueryExecutor>,
}

impl ApiState {
    pub fn new(executor: Arc<QueryExecutor>) -> Self {
        Self { executor }
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Chat message from the frontend.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub content: String,
    /// Caller-declared category; overrides classification when it names an intent.
    #[serde(default)]
    pub category: Option<String>,
    /// Message type sent by the frontend ("text", "voice", ...). Not used for routing.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

/// Bot reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub content: String,
    pub sender: String,
    /// RFC 3339 timestamp.
    pub timestamp: String,
    /// The request's category, echoed verbatim; empty when none was sent.
    pub category: String,
}

/// Dataset diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct DebugDataResponse {
    /// Working directory of the server process.
    pub cwd: String,
    #[serde(flatten)]
    pub summary: DatasetSummary,
    /// Process-wide counters.
    pub metrics: MetricsSnapshot,
}

/// Faculty name listing parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct TeachersQuery {
    #[serde(default)]
    pub like: Option<String>,
}

/// Faculty names, filtered or sampled.
#[derive(Debug, Clone, Serialize)]
pub struct TeachersResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub like: Option<String>,
    /// Matching names when filtered, all named records otherwise.
    pub count: usize,
    pub names: Vec<String>,
}

/// Names returned for a filtered listing.
const MAX_MATCHING_NAMES: usize = 50;
/// Names returned when no filter is given.
const SAMPLE_NAMES: usize = 20;

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/chat
pub async fn chat_handler(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<ChatRequest>,
) -> Json<ChatResponse> {
    let mut query = Query::new(request.content.as_str());
    if let Some(category) = &request.category {
        query = query.with_category(category);
    }

    let answer = state.executor.execute(&query).await;
    info!(
        intent = %answer.intent,
        source = ?answer.source,
        kind = request.kind.as_deref().unwrap_or("text"),
        "Chat answered"
    );

    Json(ChatResponse {
        content: answer.content,
        sender: "bot".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        category: request.category.unwrap_or_default(),
    })
}

/// GET /healthz
pub async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// GET /admin/debug-data
pub async fn debug_data_handler(State(state): State<Arc<ApiState>>) -> Json<DebugDataResponse> {
    let cwd = std::env::current_dir()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    Json(DebugDataResponse {
        cwd,
        summary: state.executor.store().summary(),
        metrics: get_metrics().snapshot(),
    })
}

/// GET /admin/teachers?like=
pub async fn teachers_handler(
    State(state): State<Arc<ApiState>>,
    QueryParams(params): QueryParams<TeachersQuery>,
) -> Json<TeachersResponse> {
    let directory = DirectoryResolver::new(state.executor.store().clone());
    let like = params.like.filter(|l| !l.trim().is_empty());

    let response = match like {
        Some(fragment) => {
            let names = directory.names_like(fragment.trim());
            TeachersResponse {
                count: names.len(),
                names: names
                    .into_iter()
                    .take(MAX_MATCHING_NAMES)
                    .map(str::to_string)
                    .collect(),
                like: Some(fragment),
            }
        }
        None => {
            let names = directory.names_like("");
            TeachersResponse {
                like: None,
                count: names.len(),
                names: names.into_iter().take(SAMPLE_NAMES).map(str::to_string).collect(),
            }
        }
    };
    Json(response)
}

/// GET /metrics
pub async fn metrics_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        get_metrics().export_prometheus(),
    )
}
