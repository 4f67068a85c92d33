//! Record store operations, one module per table.
//!
//! Every operation commits on its own; nothing spans several tables except
//! the read-only snapshot and the reset.

mod exercises;
mod overview;
mod personal_bests;
mod users;
mod workout_exercises;
mod workouts;

pub use overview::{Overview, StoreSnapshot};
pub use personal_bests::{PersonalBestFilter, PersonalBestOutcome};

use diesel::QueryResult;

use crate::db::error::{Entity, Result, StoreError};

/// Row order for list operations. Lists are always ordered by identity so
/// two reads without writes in between return the same sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListOrder {
    #[default]
    Ascending,
    /// Newest rows first, as the exercise list screen shows them.
    LatestFirst,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExerciseFilter {
    pub muscle_group: Option<String>,
}

impl ExerciseFilter {
    pub fn muscle_group(group: impl Into<String>) -> Self {
        Self {
            muscle_group: Some(group.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkoutFilter {
    pub user_id: Option<i32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkoutExerciseFilter {
    pub workout_id: Option<i32>,
    pub exercise_id: Option<i32>,
}

pub(crate) trait QueryResultExt<T> {
    fn for_entity(self, entity: Entity) -> Result<T>;
}

impl<T> QueryResultExt<T> for QueryResult<T> {
    fn for_entity(self, entity: Entity) -> Result<T> {
        self.map_err(|e| StoreError::from_diesel(entity, e))
    }
}

/// Affected count for an update that has nothing to write: 1 when the row
/// exists, 0 otherwise.
pub(crate) fn existing_rows(count: i64) -> usize {
    usize::try_from(count).unwrap_or_default()
}
