use chrono::{DateTime, Utc};
use diesel::{AsChangeset, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::db::schema;

/// Current wall-clock time in the epoch-millisecond form the store persists.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

fn millis_to_utc(millis: Option<i64>) -> Option<DateTime<Utc>> {
    millis.and_then(DateTime::from_timestamp_millis)
}

// Exercise models
#[derive(Queryable, Selectable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = schema::exercises)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Exercise {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub muscle_group: Option<String>,
}

#[derive(Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = schema::exercises)]
pub struct NewExercise {
    pub name: String,
    pub description: Option<String>,
    pub muscle_group: Option<String>,
}

impl NewExercise {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            muscle_group: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_muscle_group(mut self, muscle_group: impl Into<String>) -> Self {
        self.muscle_group = Some(muscle_group.into());
        self
    }
}

/// Partial update for an exercise. `None` leaves a column alone; for the
/// nullable columns `Some(None)` clears the value.
#[derive(AsChangeset, Debug, Clone, Default)]
#[diesel(table_name = schema::exercises)]
pub struct ExerciseChanges {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub muscle_group: Option<Option<String>>,
}

impl ExerciseChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.muscle_group.is_none()
    }
}

impl fmt::Display for Exercise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.muscle_group {
            Some(group) => write!(f, "{} ({})", self.name, group),
            None => write!(f, "{}", self.name),
        }
    }
}

// User models
#[derive(Queryable, Selectable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct User {
    pub id: i32,
    pub name: String,
}

#[derive(Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = schema::users)]
pub struct NewUser {
    pub name: String,
}

impl NewUser {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(AsChangeset, Debug, Clone, Default)]
#[diesel(table_name = schema::users)]
pub struct UserChanges {
    pub name: Option<String>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
    }
}

// Workout models
#[derive(Queryable, Selectable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = schema::workouts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Workout {
    pub id: i32,
    pub user_id: Option<i32>,
    pub name: Option<String>,
    /// Epoch milliseconds.
    pub created_at: Option<i64>,
}

impl Workout {
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        millis_to_utc(self.created_at)
    }

    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("Workout #{}", self.id))
    }
}

#[derive(Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = schema::workouts)]
pub struct NewWorkout {
    pub user_id: Option<i32>,
    pub name: Option<String>,
    pub created_at: Option<i64>,
}

impl NewWorkout {
    /// A workout stamped with the current time.
    pub fn new(user_id: Option<i32>, name: impl Into<String>) -> Self {
        Self {
            user_id,
            name: Some(name.into()),
            created_at: Some(now_millis()),
        }
    }
}

#[derive(AsChangeset, Debug, Clone, Default)]
#[diesel(table_name = schema::workouts)]
pub struct WorkoutChanges {
    pub user_id: Option<Option<i32>>,
    pub name: Option<Option<String>>,
    pub created_at: Option<Option<i64>>,
}

impl WorkoutChanges {
    pub fn is_empty(&self) -> bool {
        self.user_id.is_none() && self.name.is_none() && self.created_at.is_none()
    }
}

// Workout exercise models
#[derive(Queryable, Selectable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = schema::workout_exercises)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct WorkoutExercise {
    pub id: i32,
    pub workout_id: Option<i32>,
    pub exercise_id: Option<i32>,
    /// Stored in the `order` column.
    pub position: Option<i32>,
    pub reps: Option<i32>,
    pub weight: Option<f64>,
}

#[derive(Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = schema::workout_exercises)]
pub struct NewWorkoutExercise {
    pub workout_id: Option<i32>,
    pub exercise_id: Option<i32>,
    pub position: Option<i32>,
    pub reps: Option<i32>,
    pub weight: Option<f64>,
}

#[derive(AsChangeset, Debug, Clone, Default)]
#[diesel(table_name = schema::workout_exercises)]
pub struct WorkoutExerciseChanges {
    pub workout_id: Option<Option<i32>>,
    pub exercise_id: Option<Option<i32>>,
    pub position: Option<Option<i32>>,
    pub reps: Option<Option<i32>>,
    pub weight: Option<Option<f64>>,
}

impl WorkoutExerciseChanges {
    pub fn is_empty(&self) -> bool {
        self.workout_id.is_none()
            && self.exercise_id.is_none()
            && self.position.is_none()
            && self.reps.is_none()
            && self.weight.is_none()
    }
}

// Personal best models
#[derive(Queryable, Selectable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = schema::personal_bests)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PersonalBest {
    pub id: i32,
    pub user_id: Option<i32>,
    pub exercise_id: Option<i32>,
    pub weight: Option<f64>,
    pub reps: Option<i32>,
    /// Epoch milliseconds.
    pub date: Option<i64>,
}

impl PersonalBest {
    /// Heavier wins; equal weights are compared on reps.
    pub fn is_beaten_by(&self, weight: f64, reps: i32) -> bool {
        let current_weight = self.weight.unwrap_or(f64::MIN);
        if weight != current_weight {
            return weight > current_weight;
        }
        reps > self.reps.unwrap_or(i32::MIN)
    }
}

#[derive(Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = schema::personal_bests)]
pub struct NewPersonalBest {
    pub user_id: Option<i32>,
    pub exercise_id: Option<i32>,
    pub weight: Option<f64>,
    pub reps: Option<i32>,
    pub date: Option<i64>,
}

#[derive(AsChangeset, Debug, Clone, Default)]
#[diesel(table_name = schema::personal_bests)]
pub struct PersonalBestChanges {
    pub user_id: Option<Option<i32>>,
    pub exercise_id: Option<Option<i32>>,
    pub weight: Option<Option<f64>>,
    pub reps: Option<Option<i32>>,
    pub date: Option<Option<i64>>,
}

impl PersonalBestChanges {
    pub fn is_empty(&self) -> bool {
        self.user_id.is_none()
            && self.exercise_id.is_none()
            && self.weight.is_none()
            && self.reps.is_none()
            && self.date.is_none()
    }
}

/// A personal best joined with the name of its exercise, as listed on the
/// overview screen. The name is absent when the exercise row is gone.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PersonalBestEntry {
    pub personal_best: PersonalBest,
    pub exercise_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn best(weight: Option<f64>, reps: Option<i32>) -> PersonalBest {
        PersonalBest {
            id: 1,
            user_id: Some(1),
            exercise_id: Some(1),
            weight,
            reps,
            date: None,
        }
    }

    #[test]
    fn heavier_weight_beats_best() {
        assert!(best(Some(100.0), Some(5)).is_beaten_by(102.5, 1));
        assert!(!best(Some(100.0), Some(5)).is_beaten_by(97.5, 12));
    }

    #[test]
    fn equal_weight_compares_reps() {
        assert!(best(Some(100.0), Some(5)).is_beaten_by(100.0, 6));
        assert!(!best(Some(100.0), Some(5)).is_beaten_by(100.0, 5));
    }

    #[test]
    fn empty_best_is_beaten_by_anything() {
        assert!(best(None, None).is_beaten_by(0.0, 0));
    }

    #[test]
    fn empty_changes_are_detected() {
        assert!(ExerciseChanges::default().is_empty());
        assert!(
            !ExerciseChanges {
                muscle_group: Some(None),
                ..Default::default()
            }
            .is_empty()
        );
        assert!(WorkoutChanges::default().is_empty());
        assert!(PersonalBestChanges::default().is_empty());
    }

    #[test]
    fn workout_timestamps_convert_to_utc() {
        let workout = Workout {
            id: 3,
            user_id: None,
            name: None,
            created_at: Some(1_700_000_000_000),
        };
        assert_eq!(
            workout.created_at_utc().map(|t| t.timestamp()),
            Some(1_700_000_000)
        );
        assert_eq!(workout.display_name(), "Workout #3");
    }

    #[test]
    fn exercise_display_includes_muscle_group() {
        let exercise = Exercise {
            id: 1,
            name: "Squat".to_string(),
            description: None,
            muscle_group: Some("Legs".to_string()),
        };
        assert_eq!(exercise.to_string(), "Squat (Legs)");
    }
}
