use diesel::prelude::*;
use log::{debug, info};

use super::{ListOrder, QueryResultExt, existing_rows};
use crate::db::Store;
use crate::db::error::{Entity, Result, StoreError};
use crate::db::models::{
    NewPersonalBest, PersonalBest, PersonalBestChanges, PersonalBestEntry, now_millis,
};
use crate::db::schema::{exercises, personal_bests};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PersonalBestFilter {
    pub user_id: Option<i32>,
    pub exercise_id: Option<i32>,
}

/// What [`Store::record_personal_best`] did with a new performance.
#[derive(Debug, Clone, PartialEq)]
pub enum PersonalBestOutcome {
    /// First record for this user and exercise.
    Created(i32),
    /// The existing record was beaten and raised.
    Improved(i32),
    /// The existing record still stands.
    Unchanged(PersonalBest),
}

impl PersonalBestOutcome {
    pub fn is_new_record(&self) -> bool {
        !matches!(self, PersonalBestOutcome::Unchanged(_))
    }
}

impl Store {
    pub async fn insert_personal_best(&self, best: NewPersonalBest) -> Result<i32> {
        debug!(
            "Inserting personal best for user {:?} on exercise {:?}",
            best.user_id, best.exercise_id
        );
        self.interact(move |conn| {
            diesel::insert_into(personal_bests::table)
                .values(&best)
                .returning(personal_bests::id)
                .get_result::<i32>(conn)
                .for_entity(Entity::PersonalBest)
        })
        .await
    }

    pub async fn get_personal_best(&self, best_id: i32) -> Result<Option<PersonalBest>> {
        self.interact(move |conn| {
            personal_bests::table
                .find(best_id)
                .select(PersonalBest::as_select())
                .first(conn)
                .optional()
                .for_entity(Entity::PersonalBest)
        })
        .await
    }

    pub async fn list_personal_bests(
        &self,
        filter: PersonalBestFilter,
        order: ListOrder,
    ) -> Result<Vec<PersonalBest>> {
        self.interact(move |conn| {
            let mut query = personal_bests::table
                .select(PersonalBest::as_select())
                .into_boxed();
            if let Some(user_id) = filter.user_id {
                query = query.filter(personal_bests::user_id.eq(user_id));
            }
            if let Some(exercise_id) = filter.exercise_id {
                query = query.filter(personal_bests::exercise_id.eq(exercise_id));
            }
            query = match order {
                ListOrder::Ascending => query.order(personal_bests::id.asc()),
                ListOrder::LatestFirst => query.order(personal_bests::id.desc()),
            };
            query.load(conn).for_entity(Entity::PersonalBest)
        })
        .await
    }

    /// Personal bests with the name of their exercise, in id order.
    pub async fn list_personal_best_entries(&self) -> Result<Vec<PersonalBestEntry>> {
        self.interact(|conn| {
            let rows: Vec<(PersonalBest, Option<String>)> = personal_bests::table
                .left_join(
                    exercises::table
                        .on(personal_bests::exercise_id.eq(exercises::id.nullable())),
                )
                .order(personal_bests::id.asc())
                .select((PersonalBest::as_select(), exercises::name.nullable()))
                .load(conn)
                .for_entity(Entity::PersonalBest)?;
            Ok(rows
                .into_iter()
                .map(|(personal_best, exercise_name)| PersonalBestEntry {
                    personal_best,
                    exercise_name,
                })
                .collect())
        })
        .await
    }

    pub async fn update_personal_best(
        &self,
        best_id: i32,
        changes: PersonalBestChanges,
    ) -> Result<usize> {
        debug!("Updating personal best {}: {:?}", best_id, changes);
        self.interact(move |conn| {
            if changes.is_empty() {
                return personal_bests::table
                    .find(best_id)
                    .count()
                    .get_result::<i64>(conn)
                    .map(existing_rows)
                    .for_entity(Entity::PersonalBest);
            }
            diesel::update(personal_bests::table.find(best_id))
                .set(&changes)
                .execute(conn)
                .for_entity(Entity::PersonalBest)
        })
        .await
    }

    pub async fn delete_personal_best(&self, best_id: i32) -> Result<usize> {
        debug!("Deleting personal best {}", best_id);
        self.interact(move |conn| {
            diesel::delete(personal_bests::table.find(best_id))
                .execute(conn)
                .for_entity(Entity::PersonalBest)
        })
        .await
    }

    /// Records a performance, keeping one best per user and exercise. The
    /// stored best is raised only when the new one is heavier, or equally
    /// heavy with more reps.
    pub async fn record_personal_best(
        &self,
        user_id: i32,
        exercise_id: i32,
        weight: f64,
        reps: i32,
    ) -> Result<PersonalBestOutcome> {
        self.interact(move |conn| {
            conn.immediate_transaction::<_, StoreError, _>(|conn| {
                let current = personal_bests::table
                    .filter(personal_bests::user_id.eq(user_id))
                    .filter(personal_bests::exercise_id.eq(exercise_id))
                    .order(personal_bests::id.asc())
                    .select(PersonalBest::as_select())
                    .first(conn)
                    .optional()
                    .for_entity(Entity::PersonalBest)?;

                match current {
                    None => {
                        let id = diesel::insert_into(personal_bests::table)
                            .values(&NewPersonalBest {
                                user_id: Some(user_id),
                                exercise_id: Some(exercise_id),
                                weight: Some(weight),
                                reps: Some(reps),
                                date: Some(now_millis()),
                            })
                            .returning(personal_bests::id)
                            .get_result::<i32>(conn)
                            .for_entity(Entity::PersonalBest)?;
                        info!(
                            "First personal best for user {} on exercise {}: {}kg x {}",
                            user_id, exercise_id, weight, reps
                        );
                        Ok(PersonalBestOutcome::Created(id))
                    }
                    Some(best) if best.is_beaten_by(weight, reps) => {
                        diesel::update(personal_bests::table.find(best.id))
                            .set(&PersonalBestChanges {
                                weight: Some(Some(weight)),
                                reps: Some(Some(reps)),
                                date: Some(Some(now_millis())),
                                ..Default::default()
                            })
                            .execute(conn)
                            .for_entity(Entity::PersonalBest)?;
                        info!(
                            "New personal best for user {} on exercise {}: {}kg x {}",
                            user_id, exercise_id, weight, reps
                        );
                        Ok(PersonalBestOutcome::Improved(best.id))
                    }
                    Some(best) => Ok(PersonalBestOutcome::Unchanged(best)),
                }
            })
        })
        .await
    }
}
