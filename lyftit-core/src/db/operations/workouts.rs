use diesel::prelude::*;
use log::debug;

use super::{ListOrder, QueryResultExt, WorkoutFilter, existing_rows};
use crate::db::Store;
use crate::db::error::{Entity, Result};
use crate::db::models::{NewWorkout, Workout, WorkoutChanges};
use crate::db::schema::workouts;

impl Store {
    /// Inserts a workout. `user_id` is not checked against `users` unless the
    /// store was opened with foreign key enforcement.
    pub async fn insert_workout(&self, workout: NewWorkout) -> Result<i32> {
        debug!("Inserting workout {:?} for user {:?}", workout.name, workout.user_id);
        self.interact(move |conn| {
            diesel::insert_into(workouts::table)
                .values(&workout)
                .returning(workouts::id)
                .get_result::<i32>(conn)
                .for_entity(Entity::Workout)
        })
        .await
    }

    pub async fn get_workout(&self, workout_id: i32) -> Result<Option<Workout>> {
        self.interact(move |conn| {
            workouts::table
                .find(workout_id)
                .select(Workout::as_select())
                .first(conn)
                .optional()
                .for_entity(Entity::Workout)
        })
        .await
    }

    pub async fn list_workouts(
        &self,
        filter: WorkoutFilter,
        order: ListOrder,
    ) -> Result<Vec<Workout>> {
        self.interact(move |conn| {
            let mut query = workouts::table.select(Workout::as_select()).into_boxed();
            if let Some(user_id) = filter.user_id {
                query = query.filter(workouts::user_id.eq(user_id));
            }
            query = match order {
                ListOrder::Ascending => query.order(workouts::id.asc()),
                ListOrder::LatestFirst => query.order(workouts::id.desc()),
            };
            query.load(conn).for_entity(Entity::Workout)
        })
        .await
    }

    /// The workout with the lowest id, shown on the home screen.
    pub async fn first_workout(&self) -> Result<Option<Workout>> {
        self.interact(|conn| {
            workouts::table
                .order(workouts::id.asc())
                .select(Workout::as_select())
                .first(conn)
                .optional()
                .for_entity(Entity::Workout)
        })
        .await
    }

    pub async fn update_workout(&self, workout_id: i32, changes: WorkoutChanges) -> Result<usize> {
        debug!("Updating workout {}: {:?}", workout_id, changes);
        self.interact(move |conn| {
            if changes.is_empty() {
                return workouts::table
                    .find(workout_id)
                    .count()
                    .get_result::<i64>(conn)
                    .map(existing_rows)
                    .for_entity(Entity::Workout);
            }
            diesel::update(workouts::table.find(workout_id))
                .set(&changes)
                .execute(conn)
                .for_entity(Entity::Workout)
        })
        .await
    }

    /// Deletes a workout. Its workout exercise rows are not removed.
    pub async fn delete_workout(&self, workout_id: i32) -> Result<usize> {
        debug!("Deleting workout {}", workout_id);
        self.interact(move |conn| {
            diesel::delete(workouts::table.find(workout_id))
                .execute(conn)
                .for_entity(Entity::Workout)
        })
        .await
    }
}
