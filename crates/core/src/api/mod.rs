//! Request handlers over the offline data layer.
//!
//! [`LocalApi`] answers the same requests a remote server would, with the
//! same [`ApiResponse`] envelope, so a client can swap one for the other at
//! the network layer.

mod activities;
mod exercises;
mod locale;
pub mod maintenance;
pub mod operations;
mod requests;
mod response;
mod views;
mod workouts;

pub use activities::ActivityHandlers;
pub use exercises::ExerciseHandlers;
pub use locale::Locale;
pub use maintenance::ReconcileReport;
pub use requests::{
    ActivityBody, ActivityListQuery, ExerciseForm, ExerciseListQuery, HistoryQuery, IdsBody,
    SlotInput, WorkoutBody, WorkoutListQuery,
};
pub use response::{ApiError, ApiResponse, Envelope, ErrorCode};
pub use views::{
    ActivityView, ExerciseSummary, History, HistoryEntry, Page, ResultView, SlotView, WorkoutView,
};
pub use workouts::WorkoutHandlers;

use crate::storage::{Database, Result};

/// Entry point to the request handlers of one database.
#[derive(Debug, Clone)]
pub struct LocalApi {
    db: Database,
    locale: Locale,
}

impl LocalApi {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            locale: Locale::default(),
        }
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub async fn init(&self) -> Result<()> {
        self.db.init().await
    }

    pub fn disconnect(&self) {
        self.db.disconnect();
    }

    pub async fn drop_database(&self) -> Result<()> {
        self.db.drop_database().await
    }

    pub fn exercises(&self) -> ExerciseHandlers<'_> {
        ExerciseHandlers::new(self)
    }

    pub fn workouts(&self) -> WorkoutHandlers<'_> {
        WorkoutHandlers::new(self)
    }

    pub fn activities(&self) -> ActivityHandlers<'_> {
        ActivityHandlers::new(self)
    }

    /// Rebuilds every back-reference from the forward references.
    pub async fn reconcile(&self) -> Result<ReconcileReport> {
        maintenance::reconcile(&self.db).await
    }
}


#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::test_support::api;
    use super::*;
    use crate::storage::{Entity, RepositoryError};
    use crate::training::{Exercise, ExerciseType, Workout};

    async fn exercise(api: &LocalApi, title: &str) -> Exercise {
        api.exercises()
            .create(ExerciseForm::new(title, ExerciseType::Repeats))
            .await
            .unwrap()
            .into_payload()
            .unwrap()
    }

    async fn workout(api: &LocalApi, title: &str, exercise: &Exercise) -> Workout {
        api.workouts()
            .create(WorkoutBody::new(title, vec![SlotInput::new(exercise.id())]))
            .await
            .unwrap()
            .into_payload()
            .unwrap()
    }

    fn activity_body(workout: &Workout) -> ActivityBody {
        ActivityBody {
            id: None,
            date: Utc::now(),
            workout: workout.id(),
            description: None,
            duration: None,
            results: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_exercise_archive_then_release() {
        let api = api();
        let e = exercise(&api, "Squat").await;
        let w = workout(&api, "Legs", &e).await;

        let stored = api.exercises().get(e.id()).await.unwrap().into_payload().unwrap();
        assert!(stored.is_in_workout);
        assert_eq!(stored.in_workouts, vec![w.id()]);

        api.exercises().delete(e.id()).await.unwrap();
        let stored = api.exercises().get(e.id()).await.unwrap().into_payload().unwrap();
        assert!(stored.archived);

        api.workouts().delete(w.id()).await.unwrap();
        assert!(api.workouts().get(w.id()).await.unwrap().payload().is_none());
        let stored = api.exercises().get(e.id()).await.unwrap().into_payload().unwrap();
        assert!(stored.in_workouts.is_empty());
        assert!(!stored.is_in_workout);

        api.exercises().delete(e.id()).await.unwrap();
        assert!(api.exercises().get(e.id()).await.unwrap().payload().is_none());
    }

    #[tokio::test]
    async fn test_workout_archive_then_cascade() {
        let api = api();
        let e = exercise(&api, "Squat").await;
        let w = workout(&api, "Legs", &e).await;
        let a = api
            .activities()
            .create(activity_body(&w))
            .await
            .unwrap()
            .into_payload()
            .unwrap();

        let stored = api.workouts().get(w.id()).await.unwrap().into_payload().unwrap();
        assert_eq!(stored.in_activities, vec![a.id()]);
        assert!(stored.is_in_activity);

        api.workouts().delete(w.id()).await.unwrap();
        let stored = api.workouts().get(w.id()).await.unwrap().into_payload().unwrap();
        assert!(stored.archived);

        api.activities().delete(a.id()).await.unwrap();
        assert!(api.workouts().get(w.id()).await.unwrap().payload().is_none());
    }

    #[tokio::test]
    async fn test_archived_workout_releases_exercise_across_reconcile() {
        let api = api();
        let e = exercise(&api, "Squat").await;
        let w = workout(&api, "Legs", &e).await;
        api.activities().create(activity_body(&w)).await.unwrap();
        api.workouts().delete(w.id()).await.unwrap();

        let report = api.reconcile().await.unwrap();
        assert!(report.is_clean(), "{report:?}");

        let mut form = ExerciseForm::new("Front squat", ExerciseType::Time);
        form.id = Some(e.id());
        let updated = api.exercises().update(form).await.unwrap().into_payload().unwrap();
        assert!(updated.in_workouts.is_empty());
        assert_eq!(updated.kind, ExerciseType::Time);

        api.exercises().delete(e.id()).await.unwrap();
        assert!(api.exercises().get(e.id()).await.unwrap().payload().is_none());
    }

    #[tokio::test]
    async fn test_archived_listing_uses_locale_suffix() {
        let api = api().with_locale(Locale::Ru);
        let e = exercise(&api, "Присед").await;
        let w = workout(&api, "Ноги", &e).await;
        api.exercises().delete(e.id()).await.unwrap();

        let plain = api
            .exercises()
            .list(&ExerciseListQuery::default())
            .await
            .unwrap()
            .into_payload()
            .unwrap();
        assert!(plain.is_empty());

        let editing = api
            .exercises()
            .list(&ExerciseListQuery {
                archived: false,
                workout_id: Some(w.id()),
            })
            .await
            .unwrap()
            .into_payload()
            .unwrap();
        assert_eq!(editing.len(), 1);
        assert_eq!(editing[0].title, "Присед (в архиве)");

        let stored = api.exercises().get(e.id()).await.unwrap().into_payload().unwrap();
        assert_eq!(stored.title, "Присед");
    }

    #[tokio::test]
    async fn test_disconnected_api_surfaces_storage_error() {
        let api = api();
        api.init().await.unwrap();
        api.disconnect();

        let err = api.exercises().get(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, RepositoryError::ConnectionFailed(_)));

        api.init().await.unwrap();
        assert!(api.exercises().get(Uuid::new_v4()).await.is_ok());
    }

    #[tokio::test]
    async fn test_drop_database_clears_rows() {
        let api = api();
        exercise(&api, "Squat").await;

        api.drop_database().await.unwrap();

        let listed = api
            .exercises()
            .list(&ExerciseListQuery::default())
            .await
            .unwrap()
            .into_payload()
            .unwrap();
        assert!(listed.is_empty());
    }
}
