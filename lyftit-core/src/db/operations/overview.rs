use diesel::prelude::*;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::QueryResultExt;
use crate::db::Store;
use crate::db::error::{Entity, Result, StoreError};
use crate::db::models::{
    Exercise, NewExercise, PersonalBest, User, Workout, WorkoutExercise, now_millis,
};
use crate::db::schema::{exercises, personal_bests, users, workout_exercises, workouts};

/// Figures shown on the home tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overview {
    pub exercise_count: i64,
    pub first_workout_name: Option<String>,
}

/// Every row of every table, read in one transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub exercises: Vec<Exercise>,
    pub users: Vec<User>,
    pub workouts: Vec<Workout>,
    pub workout_exercises: Vec<WorkoutExercise>,
    pub personal_bests: Vec<PersonalBest>,
}

impl StoreSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn row_count(&self) -> usize {
        self.exercises.len()
            + self.users.len()
            + self.workouts.len()
            + self.workout_exercises.len()
            + self.personal_bests.len()
    }
}

const DEMO_USERS: [(i32, &str); 3] = [(1, "Alice"), (2, "Bob"), (3, "Charlie")];

impl Store {
    pub async fn overview(&self) -> Result<Overview> {
        self.interact(|conn| {
            let exercise_count = exercises::table
                .count()
                .get_result::<i64>(conn)
                .for_entity(Entity::Exercise)?;
            let first_workout_name = workouts::table
                .order(workouts::id.asc())
                .select(workouts::name)
                .first::<Option<String>>(conn)
                .optional()
                .for_entity(Entity::Workout)?
                .flatten();
            Ok(Overview {
                exercise_count,
                first_workout_name,
            })
        })
        .await
    }

    pub async fn snapshot(&self) -> Result<StoreSnapshot> {
        self.interact(|conn| {
            conn.transaction::<_, StoreError, _>(|conn| {
                Ok(StoreSnapshot {
                    exercises: exercises::table
                        .order(exercises::id.asc())
                        .select(Exercise::as_select())
                        .load(conn)
                        .for_entity(Entity::Exercise)?,
                    users: users::table
                        .order(users::id.asc())
                        .select(User::as_select())
                        .load(conn)
                        .for_entity(Entity::User)?,
                    workouts: workouts::table
                        .order(workouts::id.asc())
                        .select(Workout::as_select())
                        .load(conn)
                        .for_entity(Entity::Workout)?,
                    workout_exercises: workout_exercises::table
                        .order(workout_exercises::id.asc())
                        .select(WorkoutExercise::as_select())
                        .load(conn)
                        .for_entity(Entity::WorkoutExercise)?,
                    personal_bests: personal_bests::table
                        .order(personal_bests::id.asc())
                        .select(PersonalBest::as_select())
                        .load(conn)
                        .for_entity(Entity::PersonalBest)?,
                })
            })
        })
        .await
    }

    /// Puts one sample row in each table unless it is already there. Returns
    /// how many rows were actually inserted.
    pub async fn seed_demo_data(&self) -> Result<usize> {
        self.interact(|conn| {
            conn.immediate_transaction::<_, StoreError, _>(|conn| {
                let now = now_millis();
                let mut inserted = diesel::insert_or_ignore_into(exercises::table)
                    .values(
                        &NewExercise::new("Bench Press")
                            .with_description("Barbell bench press")
                            .with_muscle_group("Chest"),
                    )
                    .execute(conn)
                    .for_entity(Entity::Exercise)?;
                let bench_press = exercises::table
                    .filter(exercises::name.eq("Bench Press"))
                    .select(exercises::id)
                    .first::<i32>(conn)
                    .for_entity(Entity::Exercise)?;

                for (id, name) in DEMO_USERS {
                    inserted += diesel::insert_or_ignore_into(users::table)
                        .values((users::id.eq(id), users::name.eq(name)))
                        .execute(conn)
                        .for_entity(Entity::User)?;
                }

                inserted += diesel::insert_or_ignore_into(workouts::table)
                    .values((
                        workouts::id.eq(1),
                        workouts::user_id.eq(1),
                        workouts::name.eq("Push Day"),
                        workouts::created_at.eq(now),
                    ))
                    .execute(conn)
                    .for_entity(Entity::Workout)?;

                inserted += diesel::insert_or_ignore_into(workout_exercises::table)
                    .values((
                        workout_exercises::id.eq(1),
                        workout_exercises::workout_id.eq(1),
                        workout_exercises::exercise_id.eq(bench_press),
                        workout_exercises::position.eq(1),
                        workout_exercises::reps.eq(10),
                        workout_exercises::weight.eq(60.0),
                    ))
                    .execute(conn)
                    .for_entity(Entity::WorkoutExercise)?;

                inserted += diesel::insert_or_ignore_into(personal_bests::table)
                    .values((
                        personal_bests::id.eq(1),
                        personal_bests::user_id.eq(1),
                        personal_bests::exercise_id.eq(bench_press),
                        personal_bests::weight.eq(100.0),
                        personal_bests::reps.eq(5),
                        personal_bests::date.eq(now),
                    ))
                    .execute(conn)
                    .for_entity(Entity::PersonalBest)?;

                debug!("Demo seed inserted {} rows", inserted);
                Ok(inserted)
            })
        })
        .await
    }

    /// Deletes every row, children before parents. Returns the rows removed.
    pub async fn clear_all_tables(&self) -> Result<usize> {
        self.interact(|conn| {
            conn.immediate_transaction::<_, StoreError, _>(|conn| {
                let removed = diesel::delete(personal_bests::table)
                    .execute(conn)
                    .for_entity(Entity::PersonalBest)?
                    + diesel::delete(workout_exercises::table)
                        .execute(conn)
                        .for_entity(Entity::WorkoutExercise)?
                    + diesel::delete(workouts::table)
                        .execute(conn)
                        .for_entity(Entity::Workout)?
                    + diesel::delete(users::table)
                        .execute(conn)
                        .for_entity(Entity::User)?
                    + diesel::delete(exercises::table)
                        .execute(conn)
                        .for_entity(Entity::Exercise)?;
                info!("Cleared {} rows from the training store", removed);
                Ok(removed)
            })
        })
        .await
    }
}
