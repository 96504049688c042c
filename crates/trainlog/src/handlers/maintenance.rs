use axum::{extract::State, Json};
use trainlog_core::api::ReconcileReport;

use super::AppError;
use crate::state::AppState;

/// POST /api/maintenance/reconcile - rebuild back-references.
pub async fn reconcile(State(state): State<AppState>) -> Result<Json<ReconcileReport>, AppError> {
    let report = state.api.reconcile().await?;
    Ok(Json(report))
}
