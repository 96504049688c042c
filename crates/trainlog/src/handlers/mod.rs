pub mod activities;
mod envelope;
pub mod error;
pub mod exercises;
pub mod health;
pub mod maintenance;
pub mod workouts;

pub use envelope::envelope;
pub use error::AppError;
