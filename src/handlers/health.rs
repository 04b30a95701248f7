//! Liveness and readiness probes.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;

use crate::AppState;

/// Liveness probe. The process answering is the whole check.
async fn liveness_check() -> impl IntoResponse {
    Json(json!({
        "status": "up",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Readiness probe. Ready means the database answers a ping.
async fn readiness_check(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, Json<serde_json::Value>)> {
    let start = Instant::now();

    let db_check_start = Instant::now();
    let db_result = crate::db::check_connection(&state.db).await;
    let db_latency = db_check_start.elapsed().as_millis() as u64;

    if db_result.is_ok() {
        Ok((
            StatusCode::OK,
            Json(json!({
                "status": "ready",
                "checks": {
                    "database": { "status": "up", "latency_ms": db_latency }
                },
                "response_time_ms": start.elapsed().as_millis()
            })),
        ))
    } else {
        Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "not_ready",
                "checks": {
                    "database": {
                        "status": "down",
                        "error": db_result.err().map(|e| e.to_string())
                    }
                },
                "response_time_ms": start.elapsed().as_millis()
            })),
        ))
    }
}

/// Service status under the versioned API prefix, name and environment
/// included.
pub async fn api_status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "environment": state.config.environment,
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

pub fn health_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(liveness_check))
        .route("/health/ready", get(readiness_check))
}
