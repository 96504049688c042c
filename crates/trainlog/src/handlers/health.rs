//! Health check endpoints for Kubernetes-style probes.
//!
//! - `/livez` - Basic liveness probe (immediate 200, no checks)
//! - `/healthz` - Storage probe (reads the exercise keys)

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use trainlog_core::storage::TableName;

use crate::state::AppState;

/// GET /livez - Basic liveness probe.
pub async fn livez() -> StatusCode {
    StatusCode::OK
}

/// GET /healthz - Storage probe.
///
/// Returns 200 when the database answers, 503 otherwise.
pub async fn healthz(State(state): State<AppState>) -> Response {
    let db = state.api.database();
    match db.table(TableName::Exercises).get_all_keys().await {
        Ok(keys) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "healthy": true,
                "database": db.name(),
                "exercises": keys.len(),
            })),
        )
            .into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({
                    "healthy": false,
                    "error": e.to_string(),
                })),
            )
                .into_response()
        }
    }
}
