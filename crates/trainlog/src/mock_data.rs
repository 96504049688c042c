//! Demo rows for a fresh database.

use chrono::{Duration, Utc};
use trainlog_core::api::{ActivityBody, ExerciseForm, LocalApi, SlotInput, WorkoutBody};
use trainlog_core::storage::{Entity, Result, TableName};
use trainlog_core::training::{ExerciseType, MassUnit, Round};

/// Seeds a few exercises, one workout using them and two recorded sessions.
///
/// Returns the number of rows created. Nothing is written when the database
/// already holds exercises, archived ones included.
pub async fn seed_demo_data(api: &LocalApi) -> Result<usize> {
    let existing = api
        .database()
        .table(TableName::Exercises)
        .get_all_keys()
        .await?;
    if !existing.is_empty() {
        tracing::info!(exercises = existing.len(), "Database not empty, skipping seed");
        return Ok(0);
    }

    let mut squat = ExerciseForm::new("Back squat", ExerciseType::Weight);
    squat.weight = Some(80.0);
    squat.repeats = Some(5);
    squat.mass_unit = Some(MassUnit::Kg);

    let mut lunge = ExerciseForm::new("Walking lunge", ExerciseType::Repeats);
    lunge.each_side = true;
    lunge.repeats = Some(10);

    let mut plank = ExerciseForm::new("Plank", ExerciseType::Time);
    plank.time = Some(60);
    plank.description = Some("Elbows under shoulders".to_string());

    let mut ids = Vec::new();
    for form in [squat, lunge, plank] {
        if let Some(exercise) = api.exercises().create(form).await?.into_payload() {
            ids.push(exercise.id());
        }
    }

    let slots = ids
        .iter()
        .map(|id| {
            let mut slot = SlotInput::new(*id);
            slot.rounds = 3;
            slot.round_break = 90;
            slot
        })
        .collect();
    let Some(workout) = api
        .workouts()
        .create(WorkoutBody::new("Leg day", slots))
        .await?
        .into_payload()
    else {
        return Ok(ids.len());
    };

    let mut created = ids.len() + 1;
    for days_ago in [7, 2] {
        let body = ActivityBody {
            id: None,
            date: Utc::now() - Duration::days(days_ago),
            workout: workout.id(),
            description: Some("Demo session".to_string()),
            duration: Some(45 * 60),
            results: Vec::new(),
        };
        let Some(mut activity) = api.activities().create(body).await?.into_payload() else {
            continue;
        };

        // Fill the blank rounds so the history has something to show.
        let progress = if days_ago > 3 { 0.0 } else { 1.0 };
        for result in &mut activity.results {
            for round in &mut result.rounds {
                *round = match *round {
                    Round::Single(_) => Round::Single(8.0 + progress),
                    Round::Sides { .. } => Round::Sides {
                        left: 10.0,
                        right: 9.0 + progress,
                    },
                };
            }
        }
        let update = ActivityBody {
            id: Some(activity.id()),
            date: activity.date,
            workout: activity.workout,
            description: activity.description.clone(),
            duration: activity.duration,
            results: activity.results.clone(),
        };
        api.activities().update(update).await?;
        created += 1;
    }

    tracing::info!(rows = created, "Seeded demo data");
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use trainlog_core::api::{ExerciseListQuery, HistoryQuery};

    #[tokio::test]
    async fn test_seed_demo_data() {
        let state = crate::state::AppState::in_memory();

        let created = seed_demo_data(&state.api).await.unwrap();

        assert_eq!(created, 6);
        let exercises = state
            .api
            .exercises()
            .list(&ExerciseListQuery::default())
            .await
            .unwrap()
            .into_payload()
            .unwrap();
        assert_eq!(exercises.len(), 3);
        assert!(exercises.iter().all(|e| e.is_in_workout));
    }

    #[tokio::test]
    async fn test_seed_history_has_both_sessions() {
        let state = crate::state::AppState::in_memory();
        seed_demo_data(&state.api).await.unwrap();
        let workout = state
            .api
            .workouts()
            .list(&Default::default())
            .await
            .unwrap()
            .into_payload()
            .unwrap()
            .remove(0);

        let history = state
            .api
            .activities()
            .get_history(&HistoryQuery::new(workout.id))
            .await
            .unwrap()
            .into_payload()
            .unwrap();

        assert_eq!(history.total, 2);
        assert!(history.items.values().all(|series| series.len() == 2));
    }

    #[tokio::test]
    async fn test_seed_skips_populated_database() {
        let state = crate::state::AppState::in_memory();
        seed_demo_data(&state.api).await.unwrap();

        assert_eq!(seed_demo_data(&state.api).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_seed_skips_database_with_only_archived_exercises() {
        let state = crate::state::AppState::in_memory();
        let mut exercise = trainlog_core::training::Exercise::new("Row", ExerciseType::Repeats);
        exercise.archived = true;
        exercise.save(state.api.database()).await.unwrap();

        assert_eq!(seed_demo_data(&state.api).await.unwrap(), 0);
        let all = state
            .api
            .exercises()
            .list(&ExerciseListQuery {
                archived: true,
                workout_id: None,
            })
            .await
            .unwrap()
            .into_payload()
            .unwrap();
        assert_eq!(all.len(), 1);
    }
}
