//! Pure listing, paging and joining logic behind the request handlers.

use std::collections::{BTreeMap, HashMap};
use std::ops::Range;

use uuid::Uuid;

use super::requests::{ExerciseListQuery, WorkoutListQuery};
use super::views::{ActivityView, ExerciseSummary, HistoryEntry, ResultView, SlotView, WorkoutView};
use crate::storage::Entity;
use crate::training::{Activity, Exercise, Workout};

/// Appends the archived marker to an archived row's title.
pub fn mark_archived(title: &mut String, archived: bool, suffix: &str) {
    if archived && !title.ends_with(suffix) {
        title.push_str(suffix);
    }
}

/// Exercises matching the archive filter, plus archived ones still used by
/// `workout_id`, sorted by title.
pub fn filter_exercises(
    exercises: Vec<Exercise>,
    query: &ExerciseListQuery,
    archived_suffix: &str,
) -> Vec<Exercise> {
    let mut matched: Vec<Exercise> = exercises
        .into_iter()
        .filter(|exercise| {
            exercise.archived == query.archived
                || query
                    .workout_id
                    .is_some_and(|id| exercise.in_workouts.contains(&id))
        })
        .map(|mut exercise| {
            mark_archived(&mut exercise.title, exercise.archived, archived_suffix);
            exercise
        })
        .collect();
    matched.sort_by(|a, b| a.title.cmp(&b.title));
    matched
}

/// Workouts matching the archive filter (or every row with `all`), plus
/// those referenced by `in_activity`, sorted by title.
pub fn filter_workouts(
    workouts: Vec<Workout>,
    query: &WorkoutListQuery,
    archived_suffix: &str,
) -> Vec<Workout> {
    let mut matched: Vec<Workout> = workouts
        .into_iter()
        .filter(|workout| {
            query.all
                || workout.archived == query.archived
                || query
                    .in_activity
                    .is_some_and(|id| workout.in_activities.contains(&id))
        })
        .map(|mut workout| {
            mark_archived(&mut workout.title, workout.archived, archived_suffix);
            workout
        })
        .collect();
    matched.sort_by(|a, b| a.title.cmp(&b.title));
    matched
}

/// Index of rows by id.
pub fn index_by_id<E: Entity + Clone>(rows: &[E]) -> HashMap<Uuid, E> {
    rows.iter().map(|row| (row.id(), row.clone())).collect()
}

/// Joins every slot with its exercise. A slot whose exercise is gone keeps
/// its place with no details.
pub fn join_workout(workout: Workout, exercises: &HashMap<Uuid, Exercise>) -> WorkoutView {
    let slots = workout
        .exercises
        .iter()
        .map(|slot| SlotView {
            slot: slot.clone(),
            details: exercises.get(&slot.exercise).cloned(),
        })
        .collect();
    WorkoutView::new(workout, slots)
}

/// Attaches the workout title and live exercise metadata to an activity.
pub fn join_activity(
    activity: Activity,
    workout: &Workout,
    exercises: &HashMap<Uuid, Exercise>,
) -> ActivityView {
    let results = activity
        .results
        .iter()
        .map(|result| {
            let exercise = workout
                .slot(result.id)
                .map(|slot| slot.exercise)
                .unwrap_or(result.original_id);
            ResultView {
                result: result.clone(),
                exercise: exercises.get(&exercise).map(ExerciseSummary::from),
            }
        })
        .collect();
    ActivityView::new(activity, workout.title.clone(), results)
}

/// Activities whose workout still exists and, with a search term, whose
/// workout title contains it ignoring case. Newest first.
pub fn filter_activities(
    activities: Vec<Activity>,
    workouts: &HashMap<Uuid, Workout>,
    search: Option<&str>,
) -> Vec<Activity> {
    let needle = search.map(str::to_lowercase);
    let mut matched: Vec<Activity> = activities
        .into_iter()
        .filter(|activity| match workouts.get(&activity.workout) {
            Some(workout) => needle
                .as_deref()
                .is_none_or(|needle| workout.title.to_lowercase().contains(needle)),
            None => false,
        })
        .collect();
    sort_newest_first(&mut matched);
    matched
}

pub fn sort_newest_first(activities: &mut [Activity]) {
    activities.sort_by(|a, b| b.index.cmp(&a.index));
}

/// Row range of a 1-based page, clamped to `total`.
pub fn page_range(total: usize, page: usize, by_page: usize) -> Range<usize> {
    let start = page.max(1).saturating_sub(1).saturating_mul(by_page).min(total);
    let end = start.saturating_add(by_page).min(total);
    start..end
}

/// Where a history window starts within `activities` (newest first).
///
/// Right after `activity_id` when it is present, otherwise at the requested
/// page shifted by `offset`.
pub fn history_start(
    activities: &[Activity],
    activity_id: Option<Uuid>,
    page: usize,
    by_page: usize,
    offset: usize,
) -> usize {
    let position = activity_id.and_then(|id| activities.iter().position(|a| a.id() == id));
    match position {
        Some(position) => position + 1,
        None => page
            .max(1)
            .saturating_sub(1)
            .saturating_mul(by_page)
            .saturating_add(offset),
    }
}

/// Pivots sessions into one time series per workout slot.
///
/// Every current slot gets an entry, empty when it was never performed.
pub fn pivot_history(workout: &Workout, window: &[Activity]) -> BTreeMap<Uuid, Vec<HistoryEntry>> {
    let mut items: BTreeMap<Uuid, Vec<HistoryEntry>> = workout
        .exercises
        .iter()
        .map(|slot| (slot.id, Vec::new()))
        .collect();

    for activity in window {
        for result in &activity.results {
            if let Some(entries) = items.get_mut(&result.id) {
                entries.push(HistoryEntry {
                    activity_id: activity.id(),
                    date: activity.date,
                    results: result.rounds.clone(),
                    comments: result.comments.clone(),
                });
            }
        }
    }
    items
}
