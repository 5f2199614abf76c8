//! HTTP router and CORS configuration.

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::api::handlers::{
    chat_handler, debug_data_handler, health_handler, metrics_handler, teachers_handler, ApiState,
};
use crate::config::ServerConfig;

/// Create the HTTP router.
///
/// Endpoints:
/// - POST /api/chat                 - Answer a chat message
/// - GET  /healthz                  - Liveness probe
/// - GET  /admin/debug-data         - Loaded datasets and record counts
/// - GET  /admin/teachers?like=...  - Faculty names
/// - GET  /metrics                  - Prometheus metrics
pub fn create_router(state: Arc<ApiState>, config: &ServerConfig) -> Router {
    Router::new()
        .route("/api/chat", post(chat_handler))
        .route("/healthz", get(health_handler))
        .route("/admin/debug-data", get(debug_data_handler))
        .route("/admin/teachers", get(teachers_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
        .layer(cors_layer(&config.cors_origins))
        .layer(TraceLayer::new_for_http())
}

/// CORS for the configured origins; `*` allows any origin.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    if origins.iter().any(|o| o == "*") {
        return cors.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    cors.allow_origin(AllowOrigin::list(allowed))
}
