use diesel::prelude::*;
use log::debug;

use super::{ExerciseFilter, ListOrder, QueryResultExt, existing_rows};
use crate::db::Store;
use crate::db::error::{Entity, Result};
use crate::db::models::{Exercise, ExerciseChanges, NewExercise};
use crate::db::schema::exercises;

impl Store {
    /// Inserts an exercise and returns its id. A name already in use fails
    /// with `StoreError::UniqueViolation`.
    pub async fn insert_exercise(&self, exercise: NewExercise) -> Result<i32> {
        debug!("Inserting exercise {}", exercise.name);
        self.interact(move |conn| {
            diesel::insert_into(exercises::table)
                .values(&exercise)
                .returning(exercises::id)
                .get_result::<i32>(conn)
                .for_entity(Entity::Exercise)
        })
        .await
    }

    pub async fn get_exercise(&self, exercise_id: i32) -> Result<Option<Exercise>> {
        self.interact(move |conn| {
            exercises::table
                .find(exercise_id)
                .select(Exercise::as_select())
                .first(conn)
                .optional()
                .for_entity(Entity::Exercise)
        })
        .await
    }

    pub async fn find_exercise_by_name(&self, name: &str) -> Result<Option<Exercise>> {
        let name = name.to_string();
        self.interact(move |conn| {
            exercises::table
                .filter(exercises::name.eq(name))
                .select(Exercise::as_select())
                .first(conn)
                .optional()
                .for_entity(Entity::Exercise)
        })
        .await
    }

    pub async fn list_exercises(
        &self,
        filter: ExerciseFilter,
        order: ListOrder,
    ) -> Result<Vec<Exercise>> {
        self.interact(move |conn| {
            let mut query = exercises::table.select(Exercise::as_select()).into_boxed();
            if let Some(group) = filter.muscle_group {
                query = query.filter(exercises::muscle_group.eq(group));
            }
            query = match order {
                ListOrder::Ascending => query.order(exercises::id.asc()),
                ListOrder::LatestFirst => query.order(exercises::id.desc()),
            };
            query.load(conn).for_entity(Entity::Exercise)
        })
        .await
    }

    pub async fn count_exercises(&self) -> Result<i64> {
        self.interact(|conn| {
            exercises::table
                .count()
                .get_result::<i64>(conn)
                .for_entity(Entity::Exercise)
        })
        .await
    }

    /// Returns the number of rows changed; 0 means no exercise has that id.
    pub async fn update_exercise(&self, exercise_id: i32, changes: ExerciseChanges) -> Result<usize> {
        debug!("Updating exercise {}: {:?}", exercise_id, changes);
        self.interact(move |conn| {
            if changes.is_empty() {
                return exercises::table
                    .find(exercise_id)
                    .count()
                    .get_result::<i64>(conn)
                    .map(existing_rows)
                    .for_entity(Entity::Exercise);
            }
            diesel::update(exercises::table.find(exercise_id))
                .set(&changes)
                .execute(conn)
                .for_entity(Entity::Exercise)
        })
        .await
    }

    /// Deletes an exercise. Rows that reference it are left in place.
    pub async fn delete_exercise(&self, exercise_id: i32) -> Result<usize> {
        debug!("Deleting exercise {}", exercise_id);
        self.interact(move |conn| {
            diesel::delete(exercises::table.find(exercise_id))
                .execute(conn)
                .for_entity(Entity::Exercise)
        })
        .await
    }

    pub async fn get_or_create_exercise(&self, name: &str) -> Result<Exercise> {
        let name = name.to_string();
        self.interact(move |conn| {
            if let Some(exercise) = exercises::table
                .filter(exercises::name.eq(&name))
                .select(Exercise::as_select())
                .first(conn)
                .optional()
                .for_entity(Entity::Exercise)?
            {
                return Ok(exercise);
            }

            diesel::insert_into(exercises::table)
                .values(&NewExercise::new(name))
                .returning(Exercise::as_returning())
                .get_result(conn)
                .for_entity(Entity::Exercise)
        })
        .await
    }
}
