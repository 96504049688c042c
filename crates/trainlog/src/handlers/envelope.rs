//! Rendering of the response envelope over HTTP.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use trainlog_core::api::{ApiResponse, ErrorCode};

/// Maps an application error code to an HTTP status code.
pub fn error_code_to_status(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::ImageTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        ErrorCode::UnknownExercise | ErrorCode::UnknownWorkout => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorCode::RoundShapeMismatch => StatusCode::CONFLICT,
        ErrorCode::InvalidInput => StatusCode::BAD_REQUEST,
    }
}

/// Renders the envelope with `status` on success, or the status of its
/// error code when the request was rejected.
pub fn envelope<T: Serialize>(status: StatusCode, response: ApiResponse<T>) -> Response {
    let status = response
        .error()
        .map(|error| error_code_to_status(error.code))
        .unwrap_or(status);
    (status, Json(response)).into_response()
}
