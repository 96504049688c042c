//! Response payloads that join rows from more than one table.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::storage::Entity;
use crate::training::{
    Activity, ActivityResult, Exercise, ExerciseType, MassUnit, Round, Workout, WorkoutExercise,
};

/// A workout slot joined with the live exercise row.
///
/// `details` is `None` when the membership points at a removed exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotView {
    #[serde(flatten)]
    pub slot: WorkoutExercise,
    pub details: Option<Exercise>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutView {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub title: String,
    pub description: Option<String>,
    pub archived: bool,
    pub is_in_activity: bool,
    pub in_activities: Vec<Uuid>,
    pub exercises: Vec<SlotView>,
}

impl WorkoutView {
    pub fn new(workout: Workout, exercises: Vec<SlotView>) -> Self {
        Self {
            id: workout.id(),
            created_at: workout.meta.created_at,
            updated_at: workout.meta.updated_at,
            title: workout.title,
            description: workout.description,
            archived: workout.archived,
            is_in_activity: workout.is_in_activity,
            in_activities: workout.in_activities,
            exercises,
        }
    }
}

/// Current presentation metadata of an exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseSummary {
    pub id: Uuid,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: ExerciseType,
    pub each_side: bool,
    pub is_hours: bool,
    pub repeats: Option<u32>,
    pub weight: Option<f64>,
    pub time: Option<u32>,
    pub mass_unit: Option<MassUnit>,
}

impl From<&Exercise> for ExerciseSummary {
    fn from(exercise: &Exercise) -> Self {
        Self {
            id: exercise.id(),
            title: exercise.title.clone(),
            kind: exercise.kind,
            each_side: exercise.each_side,
            is_hours: exercise.is_hours,
            repeats: exercise.repeats,
            weight: exercise.weight,
            time: exercise.time,
            mass_unit: exercise.mass_unit,
        }
    }
}

/// A recorded result with the live exercise metadata alongside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultView {
    #[serde(flatten)]
    pub result: ActivityResult,
    pub exercise: Option<ExerciseSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityView {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub date: DateTime<Utc>,
    pub index: i64,
    pub workout: Uuid,
    pub workout_title: String,
    pub description: Option<String>,
    pub duration: Option<u32>,
    pub results: Vec<ResultView>,
}

impl ActivityView {
    pub fn new(activity: Activity, workout_title: String, results: Vec<ResultView>) -> Self {
        Self {
            id: activity.id(),
            created_at: activity.meta.created_at,
            updated_at: activity.meta.updated_at,
            date: activity.date,
            index: activity.index,
            workout: activity.workout,
            workout_title,
            description: activity.description,
            duration: activity.duration,
            results,
        }
    }
}

/// One page of a listing. `total` counts every match, not just this page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
}

/// One session in a slot's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub activity_id: Uuid,
    pub date: DateTime<Utc>,
    pub results: Vec<Round>,
    pub comments: Option<String>,
}

/// Per-slot time series of a workout, keyed by membership id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct History {
    pub items: BTreeMap<Uuid, Vec<HistoryEntry>>,
    /// Number of recorded sessions of the workout.
    pub total: usize,
}
