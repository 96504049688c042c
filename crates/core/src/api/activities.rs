use uuid::Uuid;

use super::operations::{
    filter_activities, history_start, index_by_id, join_activity, page_range, pivot_history,
    sort_newest_first,
};
use super::{
    ActivityBody, ActivityListQuery, ActivityView, ApiResponse, ErrorCode, History, HistoryQuery,
    LocalApi, Page,
};
use crate::storage::{get_all, get_one, Entity, EntityMeta, Result};
use crate::training::{Activity, ActivityError, ActivityResult, Exercise, Workout};

/// Handlers for `/activities`.
pub struct ActivityHandlers<'a> {
    api: &'a LocalApi,
}

impl<'a> ActivityHandlers<'a> {
    pub(super) fn new(api: &'a LocalApi) -> Self {
        Self { api }
    }

    /// The stored row, or a null payload when absent.
    pub async fn get(&self, id: Uuid) -> Result<ApiResponse<Activity>> {
        let activity = get_one::<Activity>(self.api.database(), id).await?;
        Ok(ApiResponse::found(activity))
    }

    /// One page of activities, newest first, joined with their workout title
    /// and the current exercise metadata.
    pub async fn list(&self, query: &ActivityListQuery) -> Result<ApiResponse<Page<ActivityView>>> {
        let db = self.api.database();
        let activities = get_all::<Activity>(db).await?;
        let workouts = index_by_id(&get_all::<Workout>(db).await?);
        let exercises = index_by_id(&get_all::<Exercise>(db).await?);

        let matched = filter_activities(activities, &workouts, query.search_value.as_deref());
        let total = matched.len();
        let range = page_range(total, query.page, query.by_page);

        let items = matched
            .into_iter()
            .skip(range.start)
            .take(range.len())
            .filter_map(|activity| {
                let workout = workouts.get(&activity.workout)?;
                Some(join_activity(activity, workout, &exercises))
            })
            .collect();

        Ok(ApiResponse::ok(Page { items, total }))
    }

    /// Records a session of a workout.
    ///
    /// Results are always shaped after the workout's slots and their
    /// exercises. Round values sent with the request fill that snapshot and
    /// must match its shape.
    pub async fn create(&self, body: ActivityBody) -> Result<ApiResponse<Activity>> {
        let db = self.api.database();
        let Some(workout) = get_one::<Workout>(db, body.workout).await? else {
            return Ok(ApiResponse::failure(
                ErrorCode::UnknownWorkout,
                format!("workout {} does not exist", body.workout),
            ));
        };
        if let Some(id) = body.id {
            if get_one::<Activity>(db, id).await?.is_some() {
                return Ok(ApiResponse::failure(
                    ErrorCode::InvalidInput,
                    format!("activity {id} already exists"),
                ));
            }
        }

        let results = blank_results(&workout, &get_all::<Exercise>(db).await?);
        let mut activity = Activity::new(workout.id(), body.date, results);
        if let Err(e) = activity.update_results(&body.results) {
            return Ok(results_failure(e));
        }
        activity.description = body.description;
        activity.duration = body.duration;
        if let Some(id) = body.id {
            activity.meta = EntityMeta::with_id(id);
        }

        activity.save(db).await?;
        activity.attach(db).await?;
        tracing::info!(activity_id = %activity.id(), workout_id = %workout.id(), "Recorded activity");
        Ok(ApiResponse::ok(activity))
    }

    /// Changes date, details and round values of a recorded session.
    ///
    /// The workout stays the one it was recorded against and the rounds keep
    /// their recorded count and shape.
    pub async fn update(&self, body: ActivityBody) -> Result<ApiResponse<Activity>> {
        let Some(id) = body.id else {
            return Ok(ApiResponse::failure(
                ErrorCode::InvalidInput,
                "activity id is required",
            ));
        };
        let db = self.api.database();
        let Some(mut activity) = get_one::<Activity>(db, id).await? else {
            return Ok(ApiResponse::found(None));
        };

        if body.workout != activity.workout {
            return Ok(ApiResponse::failure(
                ErrorCode::InvalidInput,
                "the workout of a recorded activity cannot change",
            ));
        }
        if let Err(e) = activity.update_results(&body.results) {
            return Ok(results_failure(e));
        }
        activity.set_date(body.date);
        activity.set_details(body.description, body.duration);

        activity.save(db).await?;
        tracing::info!(activity_id = %id, "Updated activity");
        Ok(ApiResponse::ok(activity))
    }

    /// Removes the activity, then returns the first page of the refreshed list.
    pub async fn delete(&self, id: Uuid) -> Result<ApiResponse<Page<ActivityView>>> {
        self.delete_many(&[id]).await
    }

    /// Removes each activity in turn, then returns the first page of the
    /// refreshed list.
    pub async fn delete_many(&self, ids: &[Uuid]) -> Result<ApiResponse<Page<ActivityView>>> {
        let db = self.api.database();
        for id in ids {
            match get_one::<Activity>(db, *id).await? {
                Some(activity) => {
                    activity.delete(db).await?;
                }
                None => tracing::debug!(activity_id = %id, "Activity already gone"),
            }
        }

        self.list(&ActivityListQuery::default()).await
    }

    /// Per-slot results of earlier sessions of a workout.
    ///
    /// The window holds up to `by_page` sessions, newest first, starting
    /// right after `activity_id` when given. Every current slot of the workout
    /// is present, empty when never performed.
    pub async fn get_history(&self, query: &HistoryQuery) -> Result<ApiResponse<History>> {
        let db = self.api.database();
        let Some(workout) = get_one::<Workout>(db, query.workout_id).await? else {
            return Ok(ApiResponse::found(None));
        };

        let mut activities: Vec<Activity> = get_all::<Activity>(db)
            .await?
            .into_iter()
            .filter(|activity| activity.workout == workout.id())
            .collect();
        sort_newest_first(&mut activities);

        let total = activities.len();
        let start = history_start(
            &activities,
            query.activity_id,
            query.page,
            query.by_page,
            query.offset,
        )
        .min(total);
        let end = start.saturating_add(query.by_page).min(total);

        let items = pivot_history(&workout, &activities[start..end]);
        Ok(ApiResponse::ok(History { items, total }))
    }
}

fn results_failure<T>(error: ActivityError) -> ApiResponse<T> {
    let code = match error {
        ActivityError::RoundShapeMismatch { .. } => ErrorCode::RoundShapeMismatch,
        ActivityError::UnknownSlot { .. } => ErrorCode::InvalidInput,
    };
    ApiResponse::failure(code, error.to_string())
}

fn blank_results(workout: &Workout, exercises: &[Exercise]) -> Vec<ActivityResult> {
    workout
        .exercises
        .iter()
        .filter_map(|slot| {
            let exercise = exercises.iter().find(|e| e.id() == slot.exercise);
            if exercise.is_none() {
                tracing::warn!(workout_id = %workout.id(), slot_id = %slot.id, "Skipping slot of a removed exercise");
            }
            exercise.map(|exercise| ActivityResult::blank(slot, exercise))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::api;
    use crate::api::{ExerciseForm, SlotInput, WorkoutBody};
    use crate::training::{ExerciseType, Round, WorkoutExercise};
    use chrono::{DateTime, TimeZone, Utc};

    fn date(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, day, 9, 0, 0).unwrap()
    }

    async fn setup(api: &LocalApi) -> (Exercise, Workout) {
        let mut form = ExerciseForm::new("Lunge", ExerciseType::Repeats);
        form.each_side = true;
        let lunge = api.exercises().create(form).await.unwrap().into_payload().unwrap();
        let mut slot = SlotInput::new(lunge.id());
        slot.rounds = 2;
        let legs = api
            .workouts()
            .create(WorkoutBody::new("Leg day", vec![slot]))
            .await
            .unwrap()
            .into_payload()
            .unwrap();
        (lunge, legs)
    }

    fn body(workout: &Workout, day: u32) -> ActivityBody {
        ActivityBody {
            id: None,
            date: date(day),
            workout: workout.id(),
            description: None,
            duration: None,
            results: Vec::new(),
        }
    }

    async fn record(api: &LocalApi, workout: &Workout, day: u32) -> Activity {
        api.activities()
            .create(body(workout, day))
            .await
            .unwrap()
            .into_payload()
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_prepares_blank_results_and_attaches() {
        let api = api();
        let (lunge, legs) = setup(&api).await;

        let activity = record(&api, &legs, 1).await;

        assert_eq!(activity.index, date(1).timestamp_millis());
        assert_eq!(activity.results.len(), 1);
        let result = &activity.results[0];
        assert_eq!(result.id, legs.exercises[0].id);
        assert_eq!(result.original_id, lunge.id());
        assert_eq!(result.rounds, vec![Round::Sides { left: 0.0, right: 0.0 }; 2]);

        let legs = api.workouts().get(legs.id()).await.unwrap().into_payload().unwrap();
        assert_eq!(legs.in_activities, vec![activity.id()]);
        assert!(legs.is_in_activity);
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_workout() {
        let api = api();
        let mut orphan = body(&Workout::new("Ghost"), 1);
        orphan.workout = Uuid::new_v4();

        let response = api.activities().create(orphan).await.unwrap();

        assert_eq!(response.error().unwrap().code, ErrorCode::UnknownWorkout);
    }

    #[tokio::test]
    async fn test_create_takes_snapshot_from_exercise() {
        let api = api();
        let (lunge, legs) = setup(&api).await;
        let slot = legs.exercises[0].id;
        let mut request = body(&legs, 1);
        request.results = vec![ActivityResult {
            original_id: Uuid::new_v4(),
            id: slot,
            kind: ExerciseType::Distance,
            rounds: vec![
                Round::Sides { left: 12.0, right: 11.0 },
                Round::Sides { left: 10.0, right: 10.0 },
            ],
            comments: Some("heavy".to_string()),
        }];

        let activity = api.activities().create(request).await.unwrap().into_payload().unwrap();

        let result = &activity.results[0];
        assert_eq!(result.original_id, lunge.id());
        assert_eq!(result.kind, ExerciseType::Repeats);
        assert_eq!(result.rounds[0], Round::Sides { left: 12.0, right: 11.0 });
        assert_eq!(result.comments.as_deref(), Some("heavy"));
    }

    #[tokio::test]
    async fn test_create_rejects_results_of_wrong_shape() {
        let api = api();
        let (lunge, legs) = setup(&api).await;
        let mut request = body(&legs, 1);
        request.results = vec![ActivityResult {
            original_id: lunge.id(),
            id: legs.exercises[0].id,
            kind: ExerciseType::Repeats,
            rounds: vec![Round::Single(5.0); 5],
            comments: None,
        }];

        let response = api.activities().create(request).await.unwrap();

        assert_eq!(response.error().unwrap().code, ErrorCode::RoundShapeMismatch);
        let legs = api.workouts().get(legs.id()).await.unwrap().into_payload().unwrap();
        assert!(legs.in_activities.is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_foreign_slot() {
        let api = api();
        let (lunge, legs) = setup(&api).await;
        let mut request = body(&legs, 1);
        request.results = vec![ActivityResult::blank(
            &WorkoutExercise::new(lunge.id()),
            &lunge,
        )];

        let response = api.activities().create(request).await.unwrap();

        assert_eq!(response.error().unwrap().code, ErrorCode::InvalidInput);
    }

    #[tokio::test]
    async fn test_create_rejects_existing_id() {
        let api = api();
        let (_, legs) = setup(&api).await;
        let activity = record(&api, &legs, 1).await;
        let mut request = body(&legs, 5);
        request.id = Some(activity.id());

        let response = api.activities().create(request).await.unwrap();

        assert_eq!(response.error().unwrap().code, ErrorCode::InvalidInput);
        let stored = api.activities().get(activity.id()).await.unwrap().into_payload().unwrap();
        assert_eq!(stored.date, date(1));
        let legs = api.workouts().get(legs.id()).await.unwrap().into_payload().unwrap();
        assert_eq!(legs.in_activities, vec![activity.id()]);
    }

    #[tokio::test]
    async fn test_update_rederives_index_and_checks_shape() {
        let api = api();
        let (_, legs) = setup(&api).await;
        let activity = record(&api, &legs, 1).await;

        let mut result = activity.results[0].clone();
        result.rounds = vec![
            Round::Sides { left: 10.0, right: 9.0 },
            Round::Sides { left: 8.0, right: 8.0 },
        ];
        let mut change = body(&legs, 4);
        change.id = Some(activity.id());
        change.results = vec![result];
        let updated = api.activities().update(change).await.unwrap().into_payload().unwrap();
        assert_eq!(updated.index, date(4).timestamp_millis());
        assert_eq!(updated.results[0].rounds[0], Round::Sides { left: 10.0, right: 9.0 });

        let mut bad = updated.results[0].clone();
        bad.rounds = vec![Round::Single(1.0), Round::Single(1.0)];
        let mut change = body(&legs, 4);
        change.id = Some(activity.id());
        change.results = vec![bad];
        let response = api.activities().update(change).await.unwrap();
        assert_eq!(response.error().unwrap().code, ErrorCode::RoundShapeMismatch);
    }

    #[tokio::test]
    async fn test_update_keeps_workout() {
        let api = api();
        let (_, legs) = setup(&api).await;
        let activity = record(&api, &legs, 1).await;

        let mut change = body(&legs, 1);
        change.id = Some(activity.id());
        change.workout = Uuid::new_v4();
        let response = api.activities().update(change).await.unwrap();

        assert_eq!(response.error().unwrap().code, ErrorCode::InvalidInput);
    }

    #[tokio::test]
    async fn test_list_pages_and_joins() {
        let api = api();
        let (lunge, legs) = setup(&api).await;
        for day in 1..=3 {
            record(&api, &legs, day).await;
        }

        let query = ActivityListQuery {
            page: 1,
            by_page: 2,
            search_value: Some("LEG".to_string()),
        };
        let page = api.activities().list(&query).await.unwrap().into_payload().unwrap();

        assert_eq!(page.total, 3);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].date, date(3));
        assert_eq!(page.items[0].workout_title, "Leg day");
        assert_eq!(page.items[0].results[0].exercise.as_ref().unwrap().id, lunge.id());

        let query = ActivityListQuery {
            search_value: Some("arms".to_string()),
            ..Default::default()
        };
        let page = api.activities().list(&query).await.unwrap().into_payload().unwrap();
        assert_eq!(page.total, 0);
    }

    #[tokio::test]
    async fn test_delete_last_activity_removes_archived_workout() {
        let api = api();
        let (lunge, legs) = setup(&api).await;
        let first = record(&api, &legs, 1).await;
        let second = record(&api, &legs, 2).await;
        api.workouts().delete(legs.id()).await.unwrap();

        api.activities().delete(first.id()).await.unwrap();
        let still = api.workouts().get(legs.id()).await.unwrap().into_payload().unwrap();
        assert!(still.archived);
        assert_eq!(still.in_activities, vec![second.id()]);

        api.activities().delete(second.id()).await.unwrap();
        assert!(api.workouts().get(legs.id()).await.unwrap().payload().is_none());
        let lunge = api.exercises().get(lunge.id()).await.unwrap().into_payload().unwrap();
        assert!(!lunge.is_in_workout);
    }

    #[tokio::test]
    async fn test_history_without_activities_lists_every_slot() {
        let api = api();
        let (_, legs) = setup(&api).await;

        let history = api
            .activities()
            .get_history(&HistoryQuery::new(legs.id()))
            .await
            .unwrap()
            .into_payload()
            .unwrap();

        assert_eq!(history.total, 0);
        assert_eq!(history.items.len(), 1);
        assert!(history.items[&legs.exercises[0].id].is_empty());
    }

    #[tokio::test]
    async fn test_history_window_before_activity() {
        let api = api();
        let (_, legs) = setup(&api).await;
        let mut sessions = Vec::new();
        for day in 1..=4 {
            sessions.push(record(&api, &legs, day).await);
        }

        let mut query = HistoryQuery::new(legs.id());
        query.activity_id = Some(sessions[2].id());
        query.by_page = 1;
        let history = api
            .activities()
            .get_history(&query)
            .await
            .unwrap()
            .into_payload()
            .unwrap();

        assert_eq!(history.total, 4);
        let series = &history.items[&legs.exercises[0].id];
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].activity_id, sessions[1].id());
        assert_eq!(series[0].date, date(2));
    }

    #[tokio::test]
    async fn test_history_unknown_workout_is_null() {
        let api = api();

        let response = api
            .activities()
            .get_history(&HistoryQuery::new(Uuid::new_v4()))
            .await
            .unwrap();

        assert!(response.is_success());
        assert!(response.payload().is_none());
    }
}
