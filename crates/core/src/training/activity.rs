//! The activity model: one recorded session of a workout.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ActivityError, Deletion, Exercise, ExerciseType, Round, Workout, WorkoutExercise};
use crate::storage::{get_one, Database, Entity, EntityMeta, Result, TableName};

/// Results of one workout slot within an activity.
///
/// `kind` is copied from the exercise when recorded so the rounds can still be
/// interpreted after the exercise changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityResult {
    /// Exercise id at the time of recording.
    pub original_id: Uuid,
    /// Workout slot id.
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: ExerciseType,
    pub rounds: Vec<Round>,
    #[serde(default)]
    pub comments: Option<String>,
}

impl ActivityResult {
    /// An empty result for `slot`, shaped after `exercise`.
    pub fn blank(slot: &WorkoutExercise, exercise: &Exercise) -> Self {
        Self {
            original_id: exercise.id(),
            id: slot.id,
            kind: exercise.kind,
            rounds: vec![Round::empty(exercise.each_side); slot.rounds as usize],
            comments: None,
        }
    }
}

/// A recorded session. Round shapes are a snapshot and never change afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    #[serde(flatten)]
    pub meta: EntityMeta,
    pub date: DateTime<Utc>,
    /// Sort key derived from `date`.
    pub index: i64,
    pub workout: Uuid,
    #[serde(default)]
    pub description: Option<String>,
    /// Total duration in seconds.
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub results: Vec<ActivityResult>,
}

/// Numeric sort key for an activity date.
pub fn sort_index(date: DateTime<Utc>) -> i64 {
    date.timestamp_millis()
}

impl Activity {
    pub fn new(workout: Uuid, date: DateTime<Utc>, results: Vec<ActivityResult>) -> Self {
        Self {
            meta: EntityMeta::new(),
            date,
            index: sort_index(date),
            workout,
            description: None,
            duration: None,
            results,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_duration(mut self, seconds: u32) -> Self {
        self.duration = Some(seconds);
        self
    }

    /// Moves the activity to another date and re-derives its sort key.
    pub fn set_date(&mut self, date: DateTime<Utc>) -> &mut Self {
        self.date = date;
        self.index = sort_index(date);
        self.touch();
        self
    }

    pub fn set_details(&mut self, description: Option<String>, duration: Option<u32>) -> &mut Self {
        self.description = description;
        self.duration = duration;
        self.touch();
        self
    }

    pub fn result(&self, slot_id: Uuid) -> Option<&ActivityResult> {
        self.results.iter().find(|r| r.id == slot_id)
    }

    /// Replaces round values and comments slot by slot.
    ///
    /// Every incoming result must name a recorded slot and keep its round
    /// count and shapes; nothing is changed if any of them does not.
    pub fn update_results(&mut self, incoming: &[ActivityResult]) -> std::result::Result<&mut Self, ActivityError> {
        for result in incoming {
            let recorded = self
                .result(result.id)
                .ok_or(ActivityError::UnknownSlot { slot: result.id })?;
            let same_shape = recorded.rounds.len() == result.rounds.len()
                && recorded
                    .rounds
                    .iter()
                    .zip(&result.rounds)
                    .all(|(a, b)| a.same_shape(b));
            if !same_shape {
                return Err(ActivityError::RoundShapeMismatch { slot: result.id });
            }
        }

        for result in incoming {
            if let Some(recorded) = self.results.iter_mut().find(|r| r.id == result.id) {
                recorded.rounds = result.rounds.clone();
                recorded.comments = result.comments.clone();
            }
        }
        self.touch();
        Ok(self)
    }

    /// Adds this activity to its workout's back-references.
    pub async fn attach(&self, db: &Database) -> Result<()> {
        match get_one::<Workout>(db, self.workout).await? {
            Some(mut workout) => {
                workout.add_activity(self.id());
                workout.save(db).await
            }
            None => {
                tracing::warn!(activity_id = %self.id(), workout_id = %self.workout, "Activity workout does not exist");
                Ok(())
            }
        }
    }

    /// Removes the activity and its workout back-reference. An archived
    /// workout left without activities is removed as well.
    pub async fn delete(self, db: &Database) -> Result<Deletion<Self>> {
        self.remove(db).await?;

        if let Some(mut workout) = get_one::<Workout>(db, self.workout).await? {
            workout.remove_activity(self.id());
            if workout.is_orphaned() {
                tracing::info!(workout_id = %workout.id(), "Removing archived workout without activities");
                workout.unlink_exercises(db, &workout.exercise_ids()).await?;
                workout.remove(db).await?;
            } else {
                workout.save(db).await?;
            }
        }

        Ok(Deletion::Removed(self))
    }
}

#[async_trait]
impl Entity for Activity {
    const TABLE: TableName = TableName::Activities;
    const ENTITY_TYPE: &'static str = "Activity";

    fn meta(&self) -> &EntityMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut EntityMeta {
        &mut self.meta
    }
}
