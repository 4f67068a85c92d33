use crate::db::{self, ListOrder, Overview, PersonalBestOutcome};
use crate::db::models::{
    Exercise, ExerciseChanges, NewExercise, NewPersonalBest, NewUser, NewWorkout,
    NewWorkoutExercise, PersonalBest, PersonalBestChanges, PersonalBestEntry, User, UserChanges,
    Workout, WorkoutChanges, WorkoutExercise, WorkoutExerciseChanges,
};

#[derive(Debug, Clone, Copy, uniffi::Enum)]
pub enum SortOrder {
    Ascending,
    LatestFirst,
}

impl From<SortOrder> for ListOrder {
    fn from(order: SortOrder) -> Self {
        match order {
            SortOrder::Ascending => ListOrder::Ascending,
            SortOrder::LatestFirst => ListOrder::LatestFirst,
        }
    }
}

// Exercises
#[derive(Debug, Clone, uniffi::Record)]
pub struct ExerciseRecord {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub muscle_group: Option<String>,
}

impl From<Exercise> for ExerciseRecord {
    fn from(e: Exercise) -> Self {
        ExerciseRecord {
            id: e.id,
            name: e.name,
            description: e.description,
            muscle_group: e.muscle_group,
        }
    }
}

/// The exercise form. Saving an edit writes every field, as the form shows
/// all of them.
#[derive(Debug, Clone, uniffi::Record)]
pub struct ExerciseInput {
    pub name: String,
    pub description: Option<String>,
    pub muscle_group: Option<String>,
}

impl From<ExerciseInput> for NewExercise {
    fn from(input: ExerciseInput) -> Self {
        NewExercise {
            name: input.name,
            description: input.description,
            muscle_group: input.muscle_group,
        }
    }
}

impl From<ExerciseInput> for ExerciseChanges {
    fn from(input: ExerciseInput) -> Self {
        ExerciseChanges {
            name: Some(input.name),
            description: Some(input.description),
            muscle_group: Some(input.muscle_group),
        }
    }
}

// Users
#[derive(Debug, Clone, uniffi::Record)]
pub struct UserRecord {
    pub id: i32,
    pub name: String,
}

impl From<User> for UserRecord {
    fn from(u: User) -> Self {
        UserRecord {
            id: u.id,
            name: u.name,
        }
    }
}

pub(crate) fn new_user(name: String) -> NewUser {
    NewUser { name }
}

pub(crate) fn user_changes(name: String) -> UserChanges {
    UserChanges { name: Some(name) }
}

// Workouts
#[derive(Debug, Clone, uniffi::Record)]
pub struct WorkoutRecord {
    pub id: i32,
    pub user_id: Option<i32>,
    pub name: Option<String>,
    /// Epoch milliseconds.
    pub created_at: Option<i64>,
}

impl From<Workout> for WorkoutRecord {
    fn from(w: Workout) -> Self {
        WorkoutRecord {
            id: w.id,
            user_id: w.user_id,
            name: w.name,
            created_at: w.created_at,
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct WorkoutInput {
    pub user_id: Option<i32>,
    pub name: Option<String>,
}

impl From<WorkoutInput> for NewWorkout {
    fn from(input: WorkoutInput) -> Self {
        NewWorkout {
            user_id: input.user_id,
            name: input.name,
            created_at: Some(db::models::now_millis()),
        }
    }
}

impl From<WorkoutInput> for WorkoutChanges {
    fn from(input: WorkoutInput) -> Self {
        WorkoutChanges {
            user_id: Some(input.user_id),
            name: Some(input.name),
            created_at: None,
        }
    }
}

// Workout exercises
#[derive(Debug, Clone, uniffi::Record)]
pub struct WorkoutExerciseRecord {
    pub id: i32,
    pub workout_id: Option<i32>,
    pub exercise_id: Option<i32>,
    pub position: Option<i32>,
    pub reps: Option<i32>,
    pub weight: Option<f64>,
}

impl From<WorkoutExercise> for WorkoutExerciseRecord {
    fn from(e: WorkoutExercise) -> Self {
        WorkoutExerciseRecord {
            id: e.id,
            workout_id: e.workout_id,
            exercise_id: e.exercise_id,
            position: e.position,
            reps: e.reps,
            weight: e.weight,
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct WorkoutExerciseInput {
    pub workout_id: Option<i32>,
    pub exercise_id: Option<i32>,
    pub position: Option<i32>,
    pub reps: Option<i32>,
    pub weight: Option<f64>,
}

impl From<WorkoutExerciseInput> for NewWorkoutExercise {
    fn from(input: WorkoutExerciseInput) -> Self {
        NewWorkoutExercise {
            workout_id: input.workout_id,
            exercise_id: input.exercise_id,
            position: input.position,
            reps: input.reps,
            weight: input.weight,
        }
    }
}

impl From<WorkoutExerciseInput> for WorkoutExerciseChanges {
    fn from(input: WorkoutExerciseInput) -> Self {
        WorkoutExerciseChanges {
            workout_id: Some(input.workout_id),
            exercise_id: Some(input.exercise_id),
            position: Some(input.position),
            reps: Some(input.reps),
            weight: Some(input.weight),
        }
    }
}

// Personal bests
#[derive(Debug, Clone, uniffi::Record)]
pub struct PersonalBestRecord {
    pub id: i32,
    pub user_id: Option<i32>,
    pub exercise_id: Option<i32>,
    pub weight: Option<f64>,
    pub reps: Option<i32>,
    /// Epoch milliseconds.
    pub date: Option<i64>,
}

impl From<PersonalBest> for PersonalBestRecord {
    fn from(b: PersonalBest) -> Self {
        PersonalBestRecord {
            id: b.id,
            user_id: b.user_id,
            exercise_id: b.exercise_id,
            weight: b.weight,
            reps: b.reps,
            date: b.date,
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct PersonalBestInput {
    pub user_id: Option<i32>,
    pub exercise_id: Option<i32>,
    pub weight: Option<f64>,
    pub reps: Option<i32>,
    pub date: Option<i64>,
}

impl From<PersonalBestInput> for NewPersonalBest {
    fn from(input: PersonalBestInput) -> Self {
        NewPersonalBest {
            user_id: input.user_id,
            exercise_id: input.exercise_id,
            weight: input.weight,
            reps: input.reps,
            date: input.date,
        }
    }
}

impl From<PersonalBestInput> for PersonalBestChanges {
    fn from(input: PersonalBestInput) -> Self {
        PersonalBestChanges {
            user_id: Some(input.user_id),
            exercise_id: Some(input.exercise_id),
            weight: Some(input.weight),
            reps: Some(input.reps),
            date: Some(input.date),
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct PersonalBestEntryRecord {
    pub personal_best: PersonalBestRecord,
    pub exercise_name: Option<String>,
}

impl From<PersonalBestEntry> for PersonalBestEntryRecord {
    fn from(entry: PersonalBestEntry) -> Self {
        PersonalBestEntryRecord {
            personal_best: entry.personal_best.into(),
            exercise_name: entry.exercise_name,
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct PersonalBestResult {
    pub personal_best_id: i32,
    pub is_new_record: bool,
}

impl From<PersonalBestOutcome> for PersonalBestResult {
    fn from(outcome: PersonalBestOutcome) -> Self {
        let is_new_record = outcome.is_new_record();
        let personal_best_id = match outcome {
            PersonalBestOutcome::Created(id) | PersonalBestOutcome::Improved(id) => id,
            PersonalBestOutcome::Unchanged(best) => best.id,
        };
        PersonalBestResult {
            personal_best_id,
            is_new_record,
        }
    }
}

// Home tab
#[derive(Debug, Clone, uniffi::Record)]
pub struct OverviewRecord {
    pub exercise_count: i64,
    pub first_workout_name: Option<String>,
}

impl From<Overview> for OverviewRecord {
    fn from(o: Overview) -> Self {
        OverviewRecord {
            exercise_count: o.exercise_count,
            first_workout_name: o.first_workout_name,
        }
    }
}
