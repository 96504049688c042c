//! The uniform response envelope returned by every request handler.

use serde::{Deserialize, Serialize};

/// Stable application error codes for failures the caller must surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    ImageTooLarge,
    UnknownExercise,
    UnknownWorkout,
    RoundShapeMismatch,
    InvalidInput,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: Option<T>,
    pub success: bool,
    pub error: Option<ApiError>,
}

/// `{ data: { data, success, error } }`, the same shape a remote endpoint returns.
///
/// A missing row is a success with `data: null`. Validation failures are
/// `success: false` with an [`ApiError`]. Storage failures never end up here;
/// handlers return them as `Err`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: Envelope<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self::found(Some(data))
    }

    pub fn found(data: Option<T>) -> Self {
        Self {
            data: Envelope {
                data,
                success: true,
                error: None,
            },
        }
    }

    pub fn failure(code: ErrorCode, message: impl Into<String>) -> Self {
        let message = message.into();
        tracing::warn!(?code, %message, "Request rejected");
        Self {
            data: Envelope {
                data: None,
                success: false,
                error: Some(ApiError { code, message }),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        self.data.success
    }

    pub fn error(&self) -> Option<&ApiError> {
        self.data.error.as_ref()
    }

    pub fn payload(&self) -> Option<&T> {
        self.data.data.as_ref()
    }

    pub fn into_payload(self) -> Option<T> {
        self.data.data
    }
}
