use diesel::prelude::*;
use log::debug;

use super::{ListOrder, QueryResultExt, existing_rows};
use crate::db::Store;
use crate::db::error::{Entity, Result};
use crate::db::models::{NewUser, User, UserChanges};
use crate::db::schema::users;

impl Store {
    pub async fn insert_user(&self, user: NewUser) -> Result<i32> {
        debug!("Inserting user {}", user.name);
        self.interact(move |conn| {
            diesel::insert_into(users::table)
                .values(&user)
                .returning(users::id)
                .get_result::<i32>(conn)
                .for_entity(Entity::User)
        })
        .await
    }

    pub async fn get_user(&self, user_id: i32) -> Result<Option<User>> {
        self.interact(move |conn| {
            users::table
                .find(user_id)
                .select(User::as_select())
                .first(conn)
                .optional()
                .for_entity(Entity::User)
        })
        .await
    }

    pub async fn list_users(&self, order: ListOrder) -> Result<Vec<User>> {
        self.interact(move |conn| {
            let query = users::table.select(User::as_select());
            let rows = match order {
                ListOrder::Ascending => query.order(users::id.asc()).load(conn),
                ListOrder::LatestFirst => query.order(users::id.desc()).load(conn),
            };
            rows.for_entity(Entity::User)
        })
        .await
    }

    pub async fn update_user(&self, user_id: i32, changes: UserChanges) -> Result<usize> {
        debug!("Updating user {}: {:?}", user_id, changes);
        self.interact(move |conn| {
            if changes.is_empty() {
                return users::table
                    .find(user_id)
                    .count()
                    .get_result::<i64>(conn)
                    .map(existing_rows)
                    .for_entity(Entity::User);
            }
            diesel::update(users::table.find(user_id))
                .set(&changes)
                .execute(conn)
                .for_entity(Entity::User)
        })
        .await
    }

    /// Deletes a user. Their workouts and personal bests keep the dangling id.
    pub async fn delete_user(&self, user_id: i32) -> Result<usize> {
        debug!("Deleting user {}", user_id);
        self.interact(move |conn| {
            diesel::delete(users::table.find(user_id))
                .execute(conn)
                .for_entity(Entity::User)
        })
        .await
    }
}
