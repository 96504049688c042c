use std::collections::HashSet;

use uuid::Uuid;

use super::operations::{filter_workouts, index_by_id, join_workout};
use super::{ApiResponse, ErrorCode, LocalApi, WorkoutBody, WorkoutListQuery, WorkoutView};
use crate::storage::{get_all, get_many, get_one, Database, Entity, EntityMeta, Result};
use crate::training::{Activity, Exercise, Workout, WorkoutExercise};

/// Handlers for `/workouts`.
pub struct WorkoutHandlers<'a> {
    api: &'a LocalApi,
}

impl<'a> WorkoutHandlers<'a> {
    pub(super) fn new(api: &'a LocalApi) -> Self {
        Self { api }
    }

    /// The stored row, or a null payload when absent.
    pub async fn get(&self, id: Uuid) -> Result<ApiResponse<Workout>> {
        let workout = get_one::<Workout>(self.api.database(), id).await?;
        Ok(ApiResponse::found(workout))
    }

    /// Matching workouts with each slot joined to its current exercise row.
    pub async fn list(&self, query: &WorkoutListQuery) -> Result<ApiResponse<Vec<WorkoutView>>> {
        let db = self.api.database();
        let workouts = get_all::<Workout>(db).await?;
        let exercises = index_by_id(&get_all::<Exercise>(db).await?);

        let views = filter_workouts(workouts, query, self.api.locale().archived_suffix())
            .into_iter()
            .map(|workout| join_workout(workout, &exercises))
            .collect();
        Ok(ApiResponse::ok(views))
    }

    /// Saves a new workout and registers it with every exercise it uses.
    pub async fn create(&self, body: WorkoutBody) -> Result<ApiResponse<Workout>> {
        if body.title.trim().is_empty() {
            return Ok(ApiResponse::failure(
                ErrorCode::InvalidInput,
                "workout title is required",
            ));
        }
        let db = self.api.database();
        if let Some(id) = body.id {
            if get_one::<Workout>(db, id).await?.is_some() {
                return Ok(ApiResponse::failure(
                    ErrorCode::InvalidInput,
                    format!("workout {id} already exists"),
                ));
            }
        }
        let slots: Vec<WorkoutExercise> = body.exercises.into_iter().map(|s| s.into_slot()).collect();
        let requested: Vec<Uuid> = slots.iter().map(|s| s.exercise).collect();
        if let Some(missing) = first_missing_exercise(db, &requested).await? {
            return Ok(unknown_exercise(missing));
        }

        let mut workout = Workout::new(body.title).with_exercises(slots);
        workout.description = body.description;
        if let Some(id) = body.id {
            workout.meta = EntityMeta::with_id(id);
        }

        workout.save(db).await?;
        workout.link_exercises(db, &workout.exercise_ids()).await?;
        tracing::info!(workout_id = %workout.id(), slots = workout.exercises.len(), "Created workout");
        Ok(ApiResponse::ok(workout))
    }

    /// Updates a workout.
    ///
    /// A workout with recorded activities only takes new titles and break
    /// settings. Otherwise the slot list is replaced and exercise
    /// back-references follow the change.
    pub async fn update(&self, body: WorkoutBody) -> Result<ApiResponse<Workout>> {
        let Some(id) = body.id else {
            return Ok(ApiResponse::failure(
                ErrorCode::InvalidInput,
                "workout id is required",
            ));
        };
        if body.title.trim().is_empty() {
            return Ok(ApiResponse::failure(
                ErrorCode::InvalidInput,
                "workout title is required",
            ));
        }
        let db = self.api.database();
        let Some(mut workout) = get_one::<Workout>(db, id).await? else {
            return Ok(ApiResponse::found(None));
        };

        if workout.is_in_activity {
            let incoming: Vec<WorkoutExercise> = body
                .exercises
                .into_iter()
                .filter(|s| s.id.is_some())
                .map(|s| s.into_slot())
                .collect();
            workout.set_title(body.title, body.description);
            workout.update_breaks(&incoming);
            workout.save(db).await?;
            tracing::info!(workout_id = %id, "Updated breaks of workout with activities");
            return Ok(ApiResponse::ok(workout));
        }

        let slots: Vec<WorkoutExercise> = body.exercises.into_iter().map(|s| s.into_slot()).collect();
        let current = workout.exercise_ids();
        let added: Vec<Uuid> = slots
            .iter()
            .map(|s| s.exercise)
            .filter(|id| !current.contains(id))
            .collect();
        if let Some(missing) = first_missing_exercise(db, &added).await? {
            return Ok(unknown_exercise(missing));
        }

        workout.set_title(body.title, body.description);
        let diff = workout.set_exercises(slots);
        workout.save(db).await?;
        workout.link_exercises(db, &diff.added).await?;
        workout.unlink_exercises(db, &diff.removed).await?;
        tracing::info!(
            workout_id = %id,
            added = diff.added.len(),
            removed = diff.removed.len(),
            "Updated workout"
        );
        Ok(ApiResponse::ok(workout))
    }

    /// Archives or removes the workout, then returns the refreshed list.
    pub async fn delete(&self, id: Uuid) -> Result<ApiResponse<Vec<WorkoutView>>> {
        self.delete_many(&[id]).await
    }

    /// Archives or removes each workout in turn, then returns the refreshed list.
    pub async fn delete_many(&self, ids: &[Uuid]) -> Result<ApiResponse<Vec<WorkoutView>>> {
        let db = self.api.database();
        let activities = get_all::<Activity>(db).await?;

        for id in ids {
            match get_one::<Workout>(db, *id).await? {
                Some(workout) => {
                    workout.delete(db, Some(&activities)).await?;
                }
                None => tracing::debug!(workout_id = %id, "Workout already gone"),
            }
        }

        self.list(&WorkoutListQuery::default()).await
    }

    /// Duplicates each workout under a new identity with a copy marker in
    /// the title. Unknown ids are skipped.
    pub async fn copy(&self, ids: &[Uuid]) -> Result<ApiResponse<Vec<Workout>>> {
        let db = self.api.database();
        let suffix = self.api.locale().copy_suffix();
        let mut copies = Vec::with_capacity(ids.len());

        for source in get_many::<Workout>(db, ids).await? {
            let copy = source.duplicate(suffix);
            copy.save(db).await?;
            copy.link_exercises(db, &copy.exercise_ids()).await?;
            tracing::info!(source_id = %source.id(), workout_id = %copy.id(), "Copied workout");
            copies.push(copy);
        }

        Ok(ApiResponse::ok(copies))
    }
}

async fn first_missing_exercise(db: &Database, ids: &[Uuid]) -> Result<Option<Uuid>> {
    if ids.is_empty() {
        return Ok(None);
    }
    let found: HashSet<Uuid> = get_many::<Exercise>(db, ids)
        .await?
        .iter()
        .map(|exercise| exercise.id())
        .collect();
    Ok(ids.iter().find(|id| !found.contains(id)).copied())
}

fn unknown_exercise<T>(id: Uuid) -> ApiResponse<T> {
    ApiResponse::failure(ErrorCode::UnknownExercise, format!("exercise {id} does not exist"))
}
