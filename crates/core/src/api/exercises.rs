use uuid::Uuid;

use super::operations::filter_exercises;
use super::{ApiResponse, ErrorCode, ExerciseForm, ExerciseListQuery, LocalApi};
use crate::storage::{get_all, get_one, Entity, EntityMeta, Result};
use crate::training::{Exercise, ImageError, Workout};

/// Handlers for `/exercises`.
pub struct ExerciseHandlers<'a> {
    api: &'a LocalApi,
}

impl<'a> ExerciseHandlers<'a> {
    pub(super) fn new(api: &'a LocalApi) -> Self {
        Self { api }
    }

    /// The stored row, or a null payload when absent.
    pub async fn get(&self, id: Uuid) -> Result<ApiResponse<Exercise>> {
        let exercise = get_one::<Exercise>(self.api.database(), id).await?;
        Ok(ApiResponse::found(exercise))
    }

    pub async fn list(&self, query: &ExerciseListQuery) -> Result<ApiResponse<Vec<Exercise>>> {
        let exercises = get_all::<Exercise>(self.api.database()).await?;
        let listed = filter_exercises(exercises, query, self.api.locale().archived_suffix());
        Ok(ApiResponse::ok(listed))
    }

    pub async fn create(&self, form: ExerciseForm) -> Result<ApiResponse<Exercise>> {
        if form.title.trim().is_empty() {
            return Ok(blank_title());
        }
        let db = self.api.database();
        let id = form.id;
        if let Some(id) = id {
            if get_one::<Exercise>(db, id).await?.is_some() {
                return Ok(ApiResponse::failure(
                    ErrorCode::InvalidInput,
                    format!("exercise {id} already exists"),
                ));
            }
        }

        let mut exercise = match form.into_exercise() {
            Ok(exercise) => exercise,
            Err(e) => return Ok(image_failure(e)),
        };
        if let Some(id) = id {
            exercise.meta = EntityMeta::with_id(id);
        }

        exercise.save(db).await?;
        tracing::info!(exercise_id = %exercise.id(), title = %exercise.title, "Created exercise");
        Ok(ApiResponse::ok(exercise))
    }

    /// Applies the form to an existing exercise.
    ///
    /// Once a workout uses the exercise only its title, description and image
    /// change; the measurement fields are kept as recorded.
    pub async fn update(&self, form: ExerciseForm) -> Result<ApiResponse<Exercise>> {
        let Some(id) = form.id else {
            return Ok(ApiResponse::failure(
                ErrorCode::InvalidInput,
                "exercise id is required",
            ));
        };
        if form.title.trim().is_empty() {
            return Ok(blank_title());
        }
        let db = self.api.database();
        let Some(mut exercise) = get_one::<Exercise>(db, id).await? else {
            return Ok(ApiResponse::found(None));
        };

        let changes = if exercise.is_in_workout {
            form.changes().presentation_only()
        } else {
            form.changes()
        };
        exercise.update(changes);

        if form.remove_image {
            exercise.clear_image();
        } else if let Some(upload) = &form.image {
            if let Err(e) = exercise.set_image(upload) {
                return Ok(image_failure(e));
            }
        }

        exercise.save(db).await?;
        tracing::info!(exercise_id = %id, frozen = exercise.is_in_workout, "Updated exercise");
        Ok(ApiResponse::ok(exercise))
    }

    /// Archives or removes the exercise, then returns the refreshed list.
    pub async fn delete(&self, id: Uuid) -> Result<ApiResponse<Vec<Exercise>>> {
        self.delete_many(&[id]).await
    }

    /// Archives or removes each exercise in turn, then returns the refreshed list.
    pub async fn delete_many(&self, ids: &[Uuid]) -> Result<ApiResponse<Vec<Exercise>>> {
        let db = self.api.database();
        let workouts = get_all::<Workout>(db).await?;

        for id in ids {
            match get_one::<Exercise>(db, *id).await? {
                Some(exercise) => {
                    exercise.delete(db, Some(&workouts)).await?;
                }
                None => tracing::debug!(exercise_id = %id, "Exercise already gone"),
            }
        }

        self.list(&ExerciseListQuery::default()).await
    }
}

fn blank_title<T>() -> ApiResponse<T> {
    ApiResponse::failure(ErrorCode::InvalidInput, "exercise title is required")
}

fn image_failure<T>(error: ImageError) -> ApiResponse<T> {
    ApiResponse::failure(ErrorCode::ImageTooLarge, error.to_string())
}
