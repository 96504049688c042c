mod activity;
mod deletion;
mod error;
mod exercise;
mod image;
mod types;
mod workout;

pub use activity::{sort_index, Activity, ActivityResult};
pub use deletion::Deletion;
pub use error::{ActivityError, ImageError};
pub use exercise::{Exercise, ExerciseChanges};
pub use image::{data_url, Image, ImageUpload, MAX_IMAGE_BYTES};
pub use types::{ExerciseType, MassUnit, Round};
pub use workout::{MembershipDiff, Workout, WorkoutExercise};
