use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur when attaching an image to an exercise.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ImageError {
    #[error("Image is too large: {size} bytes (max {limit} bytes)")]
    TooLarge { size: usize, limit: usize },
}

/// Errors that can occur when changing a recorded activity.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ActivityError {
    #[error("Rounds for slot {slot} do not match the recorded shape")]
    RoundShapeMismatch { slot: Uuid },
    #[error("Slot {slot} is not part of this activity")]
    UnknownSlot { slot: Uuid },
}
