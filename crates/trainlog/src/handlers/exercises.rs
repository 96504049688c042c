//! Exercise handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    Json,
};
use uuid::Uuid;

use trainlog_core::api::{ExerciseForm, ExerciseListQuery, IdsBody};

use super::{envelope, AppError};
use crate::state::AppState;

/// GET /api/exercises
pub async fn list_exercises(
    State(state): State<AppState>,
    Query(query): Query<ExerciseListQuery>,
) -> Result<Response, AppError> {
    let response = state.api.exercises().list(&query).await?;
    Ok(envelope(StatusCode::OK, response))
}

/// GET /api/exercises/{id}
pub async fn get_exercise(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let response = state.api.exercises().get(id).await?;
    Ok(envelope(StatusCode::OK, response))
}

/// POST /api/exercises
pub async fn create_exercise(
    State(state): State<AppState>,
    Json(form): Json<ExerciseForm>,
) -> Result<Response, AppError> {
    let response = state.api.exercises().create(form).await?;
    Ok(envelope(StatusCode::CREATED, response))
}

/// PUT /api/exercises/{id}
pub async fn update_exercise(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(mut form): Json<ExerciseForm>,
) -> Result<Response, AppError> {
    form.id = Some(id);
    let response = state.api.exercises().update(form).await?;
    Ok(envelope(StatusCode::OK, response))
}

/// DELETE /api/exercises/{id}
pub async fn delete_exercise(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let response = state.api.exercises().delete(id).await?;
    Ok(envelope(StatusCode::OK, response))
}

/// POST /api/exercises/delete
pub async fn delete_exercises(
    State(state): State<AppState>,
    Json(body): Json<IdsBody>,
) -> Result<Response, AppError> {
    let response = state.api.exercises().delete_many(&body.ids).await?;
    Ok(envelope(StatusCode::OK, response))
}
