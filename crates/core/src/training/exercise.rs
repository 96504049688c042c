//! The exercise model.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Deletion, Image, ImageError, ImageUpload, MassUnit, Workout, ExerciseType};
use crate::storage::{get_all, Database, Entity, EntityMeta, Result, TableName};

/// A reusable exercise definition.
///
/// `in_workouts` is the back-reference index of the workouts that use this
/// exercise. `is_in_workout` always mirrors whether it is non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    #[serde(flatten)]
    pub meta: EntityMeta,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: ExerciseType,
    #[serde(default)]
    pub each_side: bool,
    /// Display durations as hours instead of minutes.
    #[serde(default)]
    pub is_hours: bool,
    #[serde(default)]
    pub image: Option<Image>,
    #[serde(default)]
    pub repeats: Option<u32>,
    #[serde(default)]
    pub weight: Option<f64>,
    /// Target time in seconds.
    #[serde(default)]
    pub time: Option<u32>,
    #[serde(default)]
    pub mass_unit: Option<MassUnit>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub is_in_workout: bool,
    #[serde(default)]
    pub in_workouts: Vec<Uuid>,
}

/// A shallow set of field changes for [`Exercise::update`].
///
/// `None` leaves a field as is. Nested options clear the field with `Some(None)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExerciseChanges {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub kind: Option<ExerciseType>,
    pub each_side: Option<bool>,
    pub is_hours: Option<bool>,
    pub repeats: Option<Option<u32>>,
    pub weight: Option<Option<f64>>,
    pub time: Option<Option<u32>>,
    pub mass_unit: Option<Option<MassUnit>>,
}

impl ExerciseChanges {
    /// Drops every change that would alter how rounds are measured.
    ///
    /// Recorded activities store rounds in the shape the exercise had at the
    /// time, so once a workout uses the exercise only its presentation may change.
    pub fn presentation_only(self) -> Self {
        Self {
            title: self.title,
            description: self.description,
            ..Self::default()
        }
    }
}

impl Exercise {
    pub fn new(title: impl Into<String>, kind: ExerciseType) -> Self {
        Self {
            meta: EntityMeta::new(),
            title: title.into(),
            kind,
            each_side: false,
            is_hours: false,
            image: None,
            repeats: None,
            weight: None,
            time: None,
            mass_unit: None,
            description: None,
            archived: false,
            is_in_workout: false,
            in_workouts: Vec::new(),
        }
    }

    pub fn with_each_side(mut self, each_side: bool) -> Self {
        self.each_side = each_side;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_repeats(mut self, repeats: u32) -> Self {
        self.repeats = Some(repeats);
        self
    }

    pub fn with_weight(mut self, weight: f64, unit: MassUnit) -> Self {
        self.weight = Some(weight);
        self.mass_unit = Some(unit);
        self
    }

    pub fn with_time(mut self, seconds: u32) -> Self {
        self.time = Some(seconds);
        self
    }

    /// Attaches an uploaded image, inlining it as a data URL.
    pub fn with_image(mut self, upload: &ImageUpload) -> std::result::Result<Self, ImageError> {
        self.image = Some(Image::from_upload(upload)?);
        Ok(self)
    }

    /// Shallow-merges `changes` and bumps `updated_at`.
    pub fn update(&mut self, changes: ExerciseChanges) -> &mut Self {
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(kind) = changes.kind {
            self.kind = kind;
        }
        if let Some(each_side) = changes.each_side {
            self.each_side = each_side;
        }
        if let Some(is_hours) = changes.is_hours {
            self.is_hours = is_hours;
        }
        if let Some(repeats) = changes.repeats {
            self.repeats = repeats;
        }
        if let Some(weight) = changes.weight {
            self.weight = weight;
        }
        if let Some(time) = changes.time {
            self.time = time;
        }
        if let Some(mass_unit) = changes.mass_unit {
            self.mass_unit = mass_unit;
        }
        self.touch();
        self
    }

    /// Replaces (or first attaches) the image.
    pub fn set_image(&mut self, upload: &ImageUpload) -> std::result::Result<&mut Self, ImageError> {
        match self.image.as_mut() {
            Some(image) => {
                image.update(upload)?;
            }
            None => self.image = Some(Image::from_upload(upload)?),
        }
        self.touch();
        Ok(self)
    }

    pub fn clear_image(&mut self) -> &mut Self {
        self.image = None;
        self.touch();
        self
    }

    /// Records that `workout_id` uses this exercise.
    pub fn add_workout(&mut self, workout_id: Uuid) -> &mut Self {
        if !self.in_workouts.contains(&workout_id) {
            self.in_workouts.push(workout_id);
        }
        self.is_in_workout = true;
        self.touch();
        self
    }

    /// Forgets that `workout_id` uses this exercise.
    pub fn remove_workout(&mut self, workout_id: Uuid) -> &mut Self {
        self.in_workouts.retain(|id| *id != workout_id);
        self.is_in_workout = !self.in_workouts.is_empty();
        self.touch();
        self
    }

    /// Archives the exercise if any live workout still references it, otherwise
    /// removes the row. Archived workouts have already released their
    /// exercises and do not count.
    ///
    /// `workouts` is an optional pre-fetched copy of the workouts table; when
    /// `None` the table is read.
    pub async fn delete(mut self, db: &Database, workouts: Option<&[Workout]>) -> Result<Deletion<Self>> {
        let fetched;
        let workouts = match workouts {
            Some(workouts) => workouts,
            None => {
                fetched = get_all::<Workout>(db).await?;
                &fetched
            }
        };

        let referenced = self.is_in_workout
            || workouts
                .iter()
                .any(|w| !w.archived && w.references_exercise(self.id()));

        if referenced {
            self.archived = true;
            self.touch();
            self.save(db).await?;
            tracing::info!(exercise_id = %self.id(), "Archived exercise still used by a workout");
            Ok(Deletion::Archived(self))
        } else {
            self.remove(db).await?;
            Ok(Deletion::Removed(self))
        }
    }
}

#[async_trait]
impl Entity for Exercise {
    const TABLE: TableName = TableName::Exercises;
    const ENTITY_TYPE: &'static str = "Exercise";

    fn meta(&self) -> &EntityMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut EntityMeta {
        &mut self.meta
    }
}
