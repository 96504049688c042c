//! Workout handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    Json,
};
use uuid::Uuid;

use trainlog_core::api::{IdsBody, WorkoutBody, WorkoutListQuery};

use super::{envelope, AppError};
use crate::state::AppState;

/// GET /api/workouts
pub async fn list_workouts(
    State(state): State<AppState>,
    Query(query): Query<WorkoutListQuery>,
) -> Result<Response, AppError> {
    let response = state.api.workouts().list(&query).await?;
    Ok(envelope(StatusCode::OK, response))
}

/// GET /api/workouts/{id}
pub async fn get_workout(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let response = state.api.workouts().get(id).await?;
    Ok(envelope(StatusCode::OK, response))
}

/// POST /api/workouts
pub async fn create_workout(
    State(state): State<AppState>,
    Json(body): Json<WorkoutBody>,
) -> Result<Response, AppError> {
    let response = state.api.workouts().create(body).await?;
    Ok(envelope(StatusCode::CREATED, response))
}

/// PUT /api/workouts/{id}
pub async fn update_workout(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(mut body): Json<WorkoutBody>,
) -> Result<Response, AppError> {
    body.id = Some(id);
    let response = state.api.workouts().update(body).await?;
    Ok(envelope(StatusCode::OK, response))
}

/// DELETE /api/workouts/{id}
pub async fn delete_workout(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let response = state.api.workouts().delete(id).await?;
    Ok(envelope(StatusCode::OK, response))
}

/// POST /api/workouts/delete
pub async fn delete_workouts(
    State(state): State<AppState>,
    Json(body): Json<IdsBody>,
) -> Result<Response, AppError> {
    let response = state.api.workouts().delete_many(&body.ids).await?;
    Ok(envelope(StatusCode::OK, response))
}

/// POST /api/workouts/copy
pub async fn copy_workouts(
    State(state): State<AppState>,
    Json(body): Json<IdsBody>,
) -> Result<Response, AppError> {
    let response = state.api.workouts().copy(&body.ids).await?;
    Ok(envelope(StatusCode::CREATED, response))
}
