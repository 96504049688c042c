//! Typed request payloads for the request handlers.
//!
//! Form-style payloads arrive with booleans and numbers as strings; the field
//! helpers in [`crate::serde`] coerce them at the boundary.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::serde::{
    deserialize_flag, deserialize_optional_number, deserialize_optional_string,
};
use crate::storage::new_id;
use crate::training::{
    ActivityResult, Exercise, ExerciseChanges, ExerciseType, ImageError, ImageUpload, MassUnit,
    WorkoutExercise,
};

fn default_page() -> usize {
    1
}

fn default_by_page() -> usize {
    10
}

fn default_rounds() -> u32 {
    1
}

/// Query for listing exercises.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExerciseListQuery {
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub archived: bool,
    /// Also include archived exercises still used by this workout.
    #[serde(default, alias = "workoutId")]
    pub workout_id: Option<Uuid>,
}

/// Create or update payload for an exercise.
#[derive(Debug, Clone, Deserialize)]
pub struct ExerciseForm {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: ExerciseType,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub each_side: bool,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub is_hours: bool,
    #[serde(default, deserialize_with = "deserialize_optional_number")]
    pub repeats: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_optional_number")]
    pub weight: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_optional_number")]
    pub time: Option<u32>,
    #[serde(default)]
    pub mass_unit: Option<MassUnit>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<ImageUpload>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub remove_image: bool,
}

impl ExerciseForm {
    pub fn new(title: impl Into<String>, kind: ExerciseType) -> Self {
        Self {
            id: None,
            title: title.into(),
            kind,
            each_side: false,
            is_hours: false,
            repeats: None,
            weight: None,
            time: None,
            mass_unit: None,
            description: None,
            image: None,
            remove_image: false,
        }
    }

    /// Every field of the form as a change set.
    pub fn changes(&self) -> ExerciseChanges {
        ExerciseChanges {
            title: Some(self.title.clone()),
            description: Some(self.description.clone()),
            kind: Some(self.kind),
            each_side: Some(self.each_side),
            is_hours: Some(self.is_hours),
            repeats: Some(self.repeats),
            weight: Some(self.weight),
            time: Some(self.time),
            mass_unit: Some(self.mass_unit),
        }
    }

    /// Builds a new exercise, inlining the attached image.
    pub fn into_exercise(self) -> Result<Exercise, ImageError> {
        let mut exercise = Exercise::new(self.title.clone(), self.kind);
        exercise.update(self.changes());
        if let Some(upload) = &self.image {
            exercise = exercise.with_image(upload)?;
        }
        Ok(exercise)
    }
}

/// Query for listing workouts.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkoutListQuery {
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub archived: bool,
    /// Return every row regardless of archive state.
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub all: bool,
    /// Also include workouts referenced by this activity.
    #[serde(default, alias = "inActivity")]
    pub in_activity: Option<Uuid>,
}

/// One slot of a workout payload. A missing id creates a new slot.
#[derive(Debug, Clone, Deserialize)]
pub struct SlotInput {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub exercise: Uuid,
    #[serde(default = "default_rounds")]
    pub rounds: u32,
    #[serde(default)]
    pub round_break: u32,
    #[serde(default)]
    pub break_time: u32,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub break_enable: bool,
}

impl SlotInput {
    pub fn new(exercise: Uuid) -> Self {
        Self {
            id: None,
            exercise,
            rounds: default_rounds(),
            round_break: 0,
            break_time: 0,
            break_enable: false,
        }
    }

    pub fn into_slot(self) -> WorkoutExercise {
        WorkoutExercise {
            id: self.id.unwrap_or_else(new_id),
            exercise: self.exercise,
            rounds: self.rounds,
            round_break: self.round_break,
            break_time: self.break_time,
            break_enable: self.break_enable,
        }
    }
}

/// Create or update payload for a workout.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkoutBody {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub title: String,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub description: Option<String>,
    #[serde(default)]
    pub exercises: Vec<SlotInput>,
}

impl WorkoutBody {
    pub fn new(title: impl Into<String>, exercises: Vec<SlotInput>) -> Self {
        Self {
            id: None,
            title: title.into(),
            description: None,
            exercises,
        }
    }
}

/// Query for listing activities.
#[derive(Debug, Clone, Deserialize)]
pub struct ActivityListQuery {
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_by_page", alias = "byPage")]
    pub by_page: usize,
    /// Case-insensitive substring of the workout title.
    #[serde(default, alias = "searchValue", deserialize_with = "deserialize_optional_string")]
    pub search_value: Option<String>,
}

impl Default for ActivityListQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            by_page: default_by_page(),
            search_value: None,
        }
    }
}

/// Create or update payload for an activity.
#[derive(Debug, Clone, Deserialize)]
pub struct ActivityBody {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub date: DateTime<Utc>,
    pub workout: Uuid,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_number")]
    pub duration: Option<u32>,
    #[serde(default)]
    pub results: Vec<ActivityResult>,
}

/// Query for the per-slot history of a workout.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryQuery {
    #[serde(alias = "workoutId")]
    pub workout_id: Uuid,
    /// Show the sessions preceding this activity instead of a page.
    #[serde(default, alias = "activityId")]
    pub activity_id: Option<Uuid>,
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_by_page", alias = "byPage")]
    pub by_page: usize,
    #[serde(default)]
    pub offset: usize,
}

impl HistoryQuery {
    pub fn new(workout_id: Uuid) -> Self {
        Self {
            workout_id,
            activity_id: None,
            page: default_page(),
            by_page: default_by_page(),
            offset: 0,
        }
    }
}

/// Ids for batch operations.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdsBody {
    pub ids: Vec<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exercise_form_coerces_form_strings() {
        let json = r#"{
            "title": "Farmer walk",
            "type": "weight",
            "each_side": "on",
            "weight": "32.5",
            "repeats": "",
            "mass_unit": "kg",
            "description": ""
        }"#;

        let form: ExerciseForm = serde_json::from_str(json).unwrap();

        assert_eq!(form.kind, ExerciseType::Weight);
        assert!(form.each_side);
        assert!(!form.is_hours);
        assert_eq!(form.weight, Some(32.5));
        assert_eq!(form.repeats, None);
        assert_eq!(form.mass_unit, Some(MassUnit::Kg));
        assert_eq!(form.description, None);
    }

    #[test]
    fn test_into_exercise_copies_fields() {
        let mut form = ExerciseForm::new("Run", ExerciseType::TimeDistance);
        form.time = Some(1200);
        form.is_hours = true;

        let exercise = form.into_exercise().unwrap();

        assert_eq!(exercise.title, "Run");
        assert_eq!(exercise.kind, ExerciseType::TimeDistance);
        assert_eq!(exercise.time, Some(1200));
        assert!(exercise.is_hours);
        assert!(!exercise.archived);
    }

    #[test]
    fn test_slot_input_keeps_or_generates_id() {
        let exercise = Uuid::new_v4();
        let existing = Uuid::new_v4();
        let mut input = SlotInput::new(exercise);
        input.id = Some(existing);

        assert_eq!(input.clone().into_slot().id, existing);
        input.id = None;
        assert_ne!(input.into_slot().id, existing);
    }

    #[test]
    fn test_activity_list_query_accepts_camel_case() {
        let query: ActivityListQuery =
            serde_json::from_str(r#"{"page": 2, "byPage": 5, "searchValue": "leg"}"#).unwrap();

        assert_eq!(query.page, 2);
        assert_eq!(query.by_page, 5);
        assert_eq!(query.search_value.as_deref(), Some("leg"));
    }

    #[test]
    fn test_history_query_defaults() {
        let id = Uuid::new_v4();
        let query: HistoryQuery =
            serde_json::from_str(&format!(r#"{{"workout_id": "{id}"}}"#)).unwrap();

        assert_eq!(query.workout_id, id);
        assert_eq!(query.page, 1);
        assert_eq!(query.by_page, 10);
        assert_eq!(query.offset, 0);
        assert!(query.activity_id.is_none());
    }
}
