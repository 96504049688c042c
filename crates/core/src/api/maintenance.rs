//! Repair pass for the back-reference index.
//!
//! Multi-row mutations are not transactional, so an interrupted write can
//! leave `in_workouts` or `in_activities` out of step with the forward
//! references. [`reconcile`] rebuilds both from the rows that hold the
//! forward references.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::storage::{get_all, Database, Entity, Result};
use crate::training::{Activity, Exercise, Workout};

/// What a reconciliation pass changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileReport {
    pub exercises_updated: usize,
    pub workouts_updated: usize,
    /// Archived workouts without activities that were removed.
    pub workouts_removed: usize,
    /// Activities whose workout no longer exists. They are left untouched.
    pub dangling_activities: usize,
}

impl ReconcileReport {
    pub fn is_clean(&self) -> bool {
        *self == Self::default()
    }
}

/// Recomputes every back-reference and `is_in_*` flag, and removes archived
/// workouts that no activity references.
pub async fn reconcile(db: &Database) -> Result<ReconcileReport> {
    let activities = get_all::<Activity>(db).await?;
    let workouts = get_all::<Workout>(db).await?;
    let exercises = get_all::<Exercise>(db).await?;
    let mut report = ReconcileReport::default();

    let mut by_workout: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for activity in &activities {
        by_workout.entry(activity.workout).or_default().push(activity.id());
    }
    report.dangling_activities = activities
        .iter()
        .filter(|a| !workouts.iter().any(|w| w.id() == a.workout))
        .count();

    let mut live = Vec::with_capacity(workouts.len());
    for mut workout in workouts {
        let expected = by_workout.remove(&workout.id()).unwrap_or_default();
        if workout.archived && expected.is_empty() {
            workout.remove(db).await?;
            report.workouts_removed += 1;
            continue;
        }
        if replace_references(&mut workout.in_activities, expected)
            || workout.is_in_activity != !workout.in_activities.is_empty()
        {
            workout.is_in_activity = !workout.in_activities.is_empty();
            workout.touch();
            workout.save(db).await?;
            report.workouts_updated += 1;
        }
        live.push(workout);
    }

    for mut exercise in exercises {
        // Archived workouts release their exercises.
        let expected: Vec<Uuid> = live
            .iter()
            .filter(|w| !w.archived && w.references_exercise(exercise.id()))
            .map(|w| w.id())
            .collect();
        if replace_references(&mut exercise.in_workouts, expected)
            || exercise.is_in_workout != !exercise.in_workouts.is_empty()
        {
            exercise.is_in_workout = !exercise.in_workouts.is_empty();
            exercise.touch();
            exercise.save(db).await?;
            report.exercises_updated += 1;
        }
    }

    if report.is_clean() {
        tracing::debug!(database = db.name(), "Back-references are consistent");
    } else {
        tracing::info!(database = db.name(), ?report, "Reconciled back-references");
    }
    Ok(report)
}

/// Replaces `current` with `expected`, keeping the existing order of ids
/// present in both. Returns whether the set changed.
fn replace_references(current: &mut Vec<Uuid>, expected: Vec<Uuid>) -> bool {
    let mut next: Vec<Uuid> = current
        .iter()
        .filter(|id| expected.contains(id))
        .copied()
        .collect();
    for id in expected {
        if !next.contains(&id) {
            next.push(id);
        }
    }
    let changed = next.len() != current.len() || next.iter().any(|id| !current.contains(id));
    *current = next;
    changed
}
