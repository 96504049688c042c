//! Activity handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    Json,
};
use uuid::Uuid;

use trainlog_core::api::{ActivityBody, ActivityListQuery, HistoryQuery, IdsBody};

use super::{envelope, AppError};
use crate::state::AppState;

/// GET /api/activities
pub async fn list_activities(
    State(state): State<AppState>,
    Query(query): Query<ActivityListQuery>,
) -> Result<Response, AppError> {
    let response = state.api.activities().list(&query).await?;
    Ok(envelope(StatusCode::OK, response))
}

/// GET /api/activities/{id}
pub async fn get_activity(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let response = state.api.activities().get(id).await?;
    Ok(envelope(StatusCode::OK, response))
}

/// POST /api/activities
pub async fn create_activity(
    State(state): State<AppState>,
    Json(body): Json<ActivityBody>,
) -> Result<Response, AppError> {
    let response = state.api.activities().create(body).await?;
    Ok(envelope(StatusCode::CREATED, response))
}

/// PUT /api/activities/{id}
pub async fn update_activity(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(mut body): Json<ActivityBody>,
) -> Result<Response, AppError> {
    body.id = Some(id);
    let response = state.api.activities().update(body).await?;
    Ok(envelope(StatusCode::OK, response))
}

/// DELETE /api/activities/{id}
pub async fn delete_activity(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let response = state.api.activities().delete(id).await?;
    Ok(envelope(StatusCode::OK, response))
}

/// POST /api/activities/delete
pub async fn delete_activities(
    State(state): State<AppState>,
    Json(body): Json<IdsBody>,
) -> Result<Response, AppError> {
    let response = state.api.activities().delete_many(&body.ids).await?;
    Ok(envelope(StatusCode::OK, response))
}

/// GET /api/activities/history
pub async fn activity_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Response, AppError> {
    let response = state.api.activities().get_history(&query).await?;
    Ok(envelope(StatusCode::OK, response))
}
