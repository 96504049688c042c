//! The workout model and its exercise memberships.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Activity, Deletion, Exercise};
use crate::storage::{get_all, get_one, new_id, Database, Entity, EntityMeta, Result, TableName};

/// One slot of a workout: how a single exercise is performed inside it.
///
/// The slot id is distinct from the exercise id and is what activity results
/// and history are keyed by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutExercise {
    pub id: Uuid,
    /// Referenced exercise id.
    pub exercise: Uuid,
    pub rounds: u32,
    /// Rest between rounds, in seconds.
    pub round_break: u32,
    /// Rest before the next exercise, in seconds.
    pub break_time: u32,
    pub break_enable: bool,
}

impl WorkoutExercise {
    pub fn new(exercise: Uuid) -> Self {
        Self {
            id: new_id(),
            exercise,
            rounds: 1,
            round_break: 0,
            break_time: 0,
            break_enable: false,
        }
    }

    pub fn with_rounds(mut self, rounds: u32, round_break: u32) -> Self {
        self.rounds = rounds;
        self.round_break = round_break;
        self
    }

    pub fn with_break(mut self, break_time: u32) -> Self {
        self.break_time = break_time;
        self.break_enable = true;
        self
    }
}

/// Exercise ids added and removed by a membership change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MembershipDiff {
    pub added: Vec<Uuid>,
    pub removed: Vec<Uuid>,
}

/// An ordered list of exercise slots.
///
/// `in_activities` is the back-reference index of the activities recorded
/// against this workout. `is_in_activity` always mirrors whether it is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workout {
    #[serde(flatten)]
    pub meta: EntityMeta,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub is_in_activity: bool,
    #[serde(default)]
    pub in_activities: Vec<Uuid>,
    #[serde(default)]
    pub exercises: Vec<WorkoutExercise>,
}

impl Workout {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            meta: EntityMeta::new(),
            title: title.into(),
            description: None,
            archived: false,
            is_in_activity: false,
            in_activities: Vec::new(),
            exercises: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_exercises(mut self, exercises: Vec<WorkoutExercise>) -> Self {
        self.exercises = exercises;
        self
    }

    /// Distinct referenced exercise ids, in slot order.
    pub fn exercise_ids(&self) -> Vec<Uuid> {
        let mut ids: Vec<Uuid> = Vec::with_capacity(self.exercises.len());
        for slot in &self.exercises {
            if !ids.contains(&slot.exercise) {
                ids.push(slot.exercise);
            }
        }
        ids
    }

    pub fn references_exercise(&self, exercise_id: Uuid) -> bool {
        self.exercises.iter().any(|slot| slot.exercise == exercise_id)
    }

    pub fn slot(&self, slot_id: Uuid) -> Option<&WorkoutExercise> {
        self.exercises.iter().find(|slot| slot.id == slot_id)
    }

    /// Duplicates the workout under a new identity, with fresh slot ids and
    /// no back-references.
    pub fn duplicate(&self, title_suffix: &str) -> Self {
        let mut copy = Self::new(format!("{}{title_suffix}", self.title));
        copy.description = self.description.clone();
        copy.exercises = self
            .exercises
            .iter()
            .map(|slot| WorkoutExercise {
                id: new_id(),
                ..slot.clone()
            })
            .collect();
        copy
    }

    /// Replaces the whole slot list and reports which exercises came and went.
    pub fn set_exercises(&mut self, exercises: Vec<WorkoutExercise>) -> MembershipDiff {
        let before = self.exercise_ids();
        self.exercises = exercises;
        let after = self.exercise_ids();
        self.touch();

        MembershipDiff {
            added: after.iter().filter(|id| !before.contains(id)).copied().collect(),
            removed: before.iter().filter(|id| !after.contains(id)).copied().collect(),
        }
    }

    /// Changes only the break settings of existing slots, matched by slot id.
    ///
    /// Slot identity, order, rounds and exercise references stay frozen once an
    /// activity has been recorded against the workout.
    pub fn update_breaks(&mut self, slots: &[WorkoutExercise]) -> &mut Self {
        for incoming in slots {
            if let Some(slot) = self.exercises.iter_mut().find(|s| s.id == incoming.id) {
                slot.round_break = incoming.round_break;
                slot.break_time = incoming.break_time;
                slot.break_enable = incoming.break_enable;
            }
        }
        self.touch();
        self
    }

    pub fn set_title(&mut self, title: impl Into<String>, description: Option<String>) -> &mut Self {
        self.title = title.into();
        self.description = description;
        self.touch();
        self
    }

    pub fn add_activity(&mut self, activity_id: Uuid) -> &mut Self {
        if !self.in_activities.contains(&activity_id) {
            self.in_activities.push(activity_id);
        }
        self.is_in_activity = true;
        self.touch();
        self
    }

    pub fn remove_activity(&mut self, activity_id: Uuid) -> &mut Self {
        self.in_activities.retain(|id| *id != activity_id);
        self.is_in_activity = !self.in_activities.is_empty();
        self.touch();
        self
    }

    /// True for an archived workout that no activity needs anymore.
    pub fn is_orphaned(&self) -> bool {
        self.archived && self.in_activities.is_empty()
    }

    /// Adds this workout to the back-references of `exercise_ids`.
    ///
    /// Missing exercises are skipped. Each exercise is written independently,
    /// so a failure part way leaves earlier exercises updated.
    pub async fn link_exercises(&self, db: &Database, exercise_ids: &[Uuid]) -> Result<()> {
        for exercise_id in exercise_ids {
            match get_one::<Exercise>(db, *exercise_id).await? {
                Some(mut exercise) => {
                    exercise.add_workout(self.id());
                    exercise.save(db).await?;
                }
                None => {
                    tracing::warn!(workout_id = %self.id(), %exercise_id, "Linked exercise does not exist");
                }
            }
        }
        Ok(())
    }

    /// Removes this workout from the back-references of `exercise_ids`.
    pub async fn unlink_exercises(&self, db: &Database, exercise_ids: &[Uuid]) -> Result<()> {
        for exercise_id in exercise_ids {
            match get_one::<Exercise>(db, *exercise_id).await? {
                Some(mut exercise) => {
                    exercise.remove_workout(self.id());
                    exercise.save(db).await?;
                }
                None => {
                    tracing::warn!(workout_id = %self.id(), %exercise_id, "Unlinked exercise does not exist");
                }
            }
        }
        Ok(())
    }

    /// Archives the workout if an activity still references it, otherwise
    /// removes the row. Either way the exercises forget this workout.
    ///
    /// `activities` is an optional pre-fetched copy of the activities table;
    /// when `None` the table is read.
    pub async fn delete(mut self, db: &Database, activities: Option<&[Activity]>) -> Result<Deletion<Self>> {
        let fetched;
        let activities = match activities {
            Some(activities) => activities,
            None => {
                fetched = get_all::<Activity>(db).await?;
                &fetched
            }
        };

        let id = self.id();
        self.in_activities.retain(|activity_id| {
            activities
                .iter()
                .any(|a| a.id() == *activity_id && a.workout == id)
        });
        for activity in activities.iter().filter(|a| a.workout == id) {
            if !self.in_activities.contains(&activity.id()) {
                self.in_activities.push(activity.id());
            }
        }
        self.is_in_activity = !self.in_activities.is_empty();

        self.unlink_exercises(db, &self.exercise_ids()).await?;

        if self.is_in_activity {
            self.archived = true;
            self.touch();
            self.save(db).await?;
            tracing::info!(workout_id = %id, "Archived workout still used by an activity");
            Ok(Deletion::Archived(self))
        } else {
            self.remove(db).await?;
            Ok(Deletion::Removed(self))
        }
    }
}

#[async_trait]
impl Entity for Workout {
    const TABLE: TableName = TableName::Workouts;
    const ENTITY_TYPE: &'static str = "Workout";

    fn meta(&self) -> &EntityMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut EntityMeta {
        &mut self.meta
    }
}
