use diesel::prelude::*;
use log::debug;

use super::{ListOrder, QueryResultExt, WorkoutExerciseFilter, existing_rows};
use crate::db::Store;
use crate::db::error::{Entity, Result, StoreError};
use crate::db::models::{NewWorkoutExercise, WorkoutExercise, WorkoutExerciseChanges};
use crate::db::schema::workout_exercises;

impl Store {
    pub async fn insert_workout_exercise(&self, entry: NewWorkoutExercise) -> Result<i32> {
        debug!(
            "Inserting exercise {:?} into workout {:?} at {:?}",
            entry.exercise_id, entry.workout_id, entry.position
        );
        self.interact(move |conn| {
            diesel::insert_into(workout_exercises::table)
                .values(&entry)
                .returning(workout_exercises::id)
                .get_result::<i32>(conn)
                .for_entity(Entity::WorkoutExercise)
        })
        .await
    }

    /// Adds an exercise after the last entry of the workout.
    pub async fn append_workout_exercise(
        &self,
        workout_id: i32,
        exercise_id: i32,
        reps: Option<i32>,
        weight: Option<f64>,
    ) -> Result<WorkoutExercise> {
        self.interact(move |conn| {
            conn.immediate_transaction::<_, StoreError, _>(|conn| {
                let max_position: Option<i32> = workout_exercises::table
                    .filter(workout_exercises::workout_id.eq(workout_id))
                    .select(diesel::dsl::max(workout_exercises::position))
                    .first(conn)
                    .for_entity(Entity::WorkoutExercise)?;
                let next_position = match max_position {
                    None => 1,
                    Some(last) => last.checked_add(1).ok_or_else(|| StoreError::Constraint {
                        entity: Entity::WorkoutExercise,
                        detail: format!("workout {} has no position after {}", workout_id, last),
                    })?,
                };
                debug!(
                    "Appending exercise {} to workout {} at position {}",
                    exercise_id, workout_id, next_position
                );

                diesel::insert_into(workout_exercises::table)
                    .values(&NewWorkoutExercise {
                        workout_id: Some(workout_id),
                        exercise_id: Some(exercise_id),
                        position: Some(next_position),
                        reps,
                        weight,
                    })
                    .returning(WorkoutExercise::as_returning())
                    .get_result(conn)
                    .for_entity(Entity::WorkoutExercise)
            })
        })
        .await
    }

    pub async fn get_workout_exercise(&self, entry_id: i32) -> Result<Option<WorkoutExercise>> {
        self.interact(move |conn| {
            workout_exercises::table
                .find(entry_id)
                .select(WorkoutExercise::as_select())
                .first(conn)
                .optional()
                .for_entity(Entity::WorkoutExercise)
        })
        .await
    }

    /// Lists entries. In ascending order rows come by position within their
    /// workout, ties broken by id.
    pub async fn list_workout_exercises(
        &self,
        filter: WorkoutExerciseFilter,
        order: ListOrder,
    ) -> Result<Vec<WorkoutExercise>> {
        self.interact(move |conn| {
            let mut query = workout_exercises::table
                .select(WorkoutExercise::as_select())
                .into_boxed();
            if let Some(workout_id) = filter.workout_id {
                query = query.filter(workout_exercises::workout_id.eq(workout_id));
            }
            if let Some(exercise_id) = filter.exercise_id {
                query = query.filter(workout_exercises::exercise_id.eq(exercise_id));
            }
            query = match order {
                ListOrder::Ascending => query
                    .order(workout_exercises::position.asc())
                    .then_order_by(workout_exercises::id.asc()),
                ListOrder::LatestFirst => query.order(workout_exercises::id.desc()),
            };
            query.load(conn).for_entity(Entity::WorkoutExercise)
        })
        .await
    }

    pub async fn update_workout_exercise(
        &self,
        entry_id: i32,
        changes: WorkoutExerciseChanges,
    ) -> Result<usize> {
        debug!("Updating workout exercise {}: {:?}", entry_id, changes);
        self.interact(move |conn| {
            if changes.is_empty() {
                return workout_exercises::table
                    .find(entry_id)
                    .count()
                    .get_result::<i64>(conn)
                    .map(existing_rows)
                    .for_entity(Entity::WorkoutExercise);
            }
            diesel::update(workout_exercises::table.find(entry_id))
                .set(&changes)
                .execute(conn)
                .for_entity(Entity::WorkoutExercise)
        })
        .await
    }

    pub async fn delete_workout_exercise(&self, entry_id: i32) -> Result<usize> {
        debug!("Deleting workout exercise {}", entry_id);
        self.interact(move |conn| {
            diesel::delete(workout_exercises::table.find(entry_id))
                .execute(conn)
                .for_entity(Entity::WorkoutExercise)
        })
        .await
    }
}
