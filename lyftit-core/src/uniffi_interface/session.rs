use log::debug;
use std::future::Future;

use crate::db::{
    self, ExerciseFilter, PersonalBestFilter, Store, WorkoutExerciseFilter, WorkoutFilter,
};
use crate::runtime::global_runtime;
use crate::uniffi_interface::errors::LyftitError;
use crate::uniffi_interface::objects::{
    ExerciseInput, ExerciseRecord, OverviewRecord, PersonalBestEntryRecord, PersonalBestInput,
    PersonalBestRecord, PersonalBestResult, SortOrder, UserRecord, WorkoutExerciseInput,
    WorkoutExerciseRecord, WorkoutInput, WorkoutRecord, new_user, user_changes,
};

/// The app's handle on its training database, opened once at startup and
/// shared by every screen.
#[derive(uniffi::Object)]
pub struct Session {
    pub(crate) store: Store,
}

impl Session {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

/// Runs store work on the global runtime; callers arrive on the foreign
/// executor, which has no tokio context.
pub(crate) async fn on_runtime<T, F>(work: F) -> Result<T, LyftitError>
where
    F: Future<Output = db::Result<T>> + Send + 'static,
    T: Send + 'static,
{
    let rt = global_runtime().await.map_err(LyftitError::with_display)?;
    rt.spawn(work)
        .await
        .map_err(LyftitError::with_display)?
        .map_err(Into::into)
}

fn count(rows: usize) -> u64 {
    rows as u64
}

fn records<T, R: From<T>>(rows: Vec<T>) -> Vec<R> {
    rows.into_iter().map(R::from).collect()
}

#[uniffi::export]
impl Session {
    // Exercises
    pub async fn insert_exercise(&self, input: ExerciseInput) -> Result<i32, LyftitError> {
        debug!("Saving exercise {}", input.name);
        let store = self.store.clone();
        on_runtime(async move { store.insert_exercise(input.into()).await }).await
    }

    pub async fn get_exercise(&self, id: i32) -> Result<Option<ExerciseRecord>, LyftitError> {
        let store = self.store.clone();
        let exercise = on_runtime(async move { store.get_exercise(id).await }).await?;
        Ok(exercise.map(Into::into))
    }

    pub async fn list_exercises(
        &self,
        muscle_group: Option<String>,
        order: SortOrder,
    ) -> Result<Vec<ExerciseRecord>, LyftitError> {
        let store = self.store.clone();
        let filter = ExerciseFilter { muscle_group };
        let rows =
            on_runtime(async move { store.list_exercises(filter, order.into()).await }).await?;
        Ok(records(rows))
    }

    pub async fn update_exercise(&self, id: i32, input: ExerciseInput) -> Result<u64, LyftitError> {
        let store = self.store.clone();
        on_runtime(async move { store.update_exercise(id, input.into()).await })
            .await
            .map(count)
    }

    pub async fn delete_exercise(&self, id: i32) -> Result<u64, LyftitError> {
        let store = self.store.clone();
        on_runtime(async move { store.delete_exercise(id).await })
            .await
            .map(count)
    }

    // Users
    pub async fn insert_user(&self, name: String) -> Result<i32, LyftitError> {
        let store = self.store.clone();
        on_runtime(async move { store.insert_user(new_user(name)).await }).await
    }

    pub async fn get_user(&self, id: i32) -> Result<Option<UserRecord>, LyftitError> {
        let store = self.store.clone();
        let user = on_runtime(async move { store.get_user(id).await }).await?;
        Ok(user.map(Into::into))
    }

    pub async fn list_users(&self, order: SortOrder) -> Result<Vec<UserRecord>, LyftitError> {
        let store = self.store.clone();
        let rows = on_runtime(async move { store.list_users(order.into()).await }).await?;
        Ok(records(rows))
    }

    pub async fn update_user(&self, id: i32, name: String) -> Result<u64, LyftitError> {
        let store = self.store.clone();
        on_runtime(async move { store.update_user(id, user_changes(name)).await })
            .await
            .map(count)
    }

    pub async fn delete_user(&self, id: i32) -> Result<u64, LyftitError> {
        let store = self.store.clone();
        on_runtime(async move { store.delete_user(id).await })
            .await
            .map(count)
    }

    // Workouts
    pub async fn insert_workout(&self, input: WorkoutInput) -> Result<i32, LyftitError> {
        let store = self.store.clone();
        on_runtime(async move { store.insert_workout(input.into()).await }).await
    }

    pub async fn get_workout(&self, id: i32) -> Result<Option<WorkoutRecord>, LyftitError> {
        let store = self.store.clone();
        let workout = on_runtime(async move { store.get_workout(id).await }).await?;
        Ok(workout.map(Into::into))
    }

    pub async fn list_workouts(
        &self,
        user_id: Option<i32>,
        order: SortOrder,
    ) -> Result<Vec<WorkoutRecord>, LyftitError> {
        let store = self.store.clone();
        let filter = WorkoutFilter { user_id };
        let rows =
            on_runtime(async move { store.list_workouts(filter, order.into()).await }).await?;
        Ok(records(rows))
    }

    pub async fn update_workout(&self, id: i32, input: WorkoutInput) -> Result<u64, LyftitError> {
        let store = self.store.clone();
        on_runtime(async move { store.update_workout(id, input.into()).await })
            .await
            .map(count)
    }

    pub async fn delete_workout(&self, id: i32) -> Result<u64, LyftitError> {
        let store = self.store.clone();
        on_runtime(async move { store.delete_workout(id).await })
            .await
            .map(count)
    }

    // Workout exercises
    pub async fn insert_workout_exercise(
        &self,
        input: WorkoutExerciseInput,
    ) -> Result<i32, LyftitError> {
        let store = self.store.clone();
        on_runtime(async move { store.insert_workout_exercise(input.into()).await }).await
    }

    pub async fn append_workout_exercise(
        &self,
        workout_id: i32,
        exercise_id: i32,
        reps: Option<i32>,
        weight: Option<f64>,
    ) -> Result<WorkoutExerciseRecord, LyftitError> {
        let store = self.store.clone();
        let entry = on_runtime(async move {
            store
                .append_workout_exercise(workout_id, exercise_id, reps, weight)
                .await
        })
        .await?;
        Ok(entry.into())
    }

    pub async fn get_workout_exercise(
        &self,
        id: i32,
    ) -> Result<Option<WorkoutExerciseRecord>, LyftitError> {
        let store = self.store.clone();
        let entry = on_runtime(async move { store.get_workout_exercise(id).await }).await?;
        Ok(entry.map(Into::into))
    }

    pub async fn list_workout_exercises(
        &self,
        workout_id: Option<i32>,
        exercise_id: Option<i32>,
        order: SortOrder,
    ) -> Result<Vec<WorkoutExerciseRecord>, LyftitError> {
        let store = self.store.clone();
        let filter = WorkoutExerciseFilter {
            workout_id,
            exercise_id,
        };
        let rows =
            on_runtime(async move { store.list_workout_exercises(filter, order.into()).await })
                .await?;
        Ok(records(rows))
    }

    pub async fn update_workout_exercise(
        &self,
        id: i32,
        input: WorkoutExerciseInput,
    ) -> Result<u64, LyftitError> {
        let store = self.store.clone();
        on_runtime(async move { store.update_workout_exercise(id, input.into()).await })
            .await
            .map(count)
    }

    pub async fn delete_workout_exercise(&self, id: i32) -> Result<u64, LyftitError> {
        let store = self.store.clone();
        on_runtime(async move { store.delete_workout_exercise(id).await })
            .await
            .map(count)
    }

    // Personal bests
    pub async fn insert_personal_best(
        &self,
        input: PersonalBestInput,
    ) -> Result<i32, LyftitError> {
        let store = self.store.clone();
        on_runtime(async move { store.insert_personal_best(input.into()).await }).await
    }

    pub async fn get_personal_best(
        &self,
        id: i32,
    ) -> Result<Option<PersonalBestRecord>, LyftitError> {
        let store = self.store.clone();
        let best = on_runtime(async move { store.get_personal_best(id).await }).await?;
        Ok(best.map(Into::into))
    }

    pub async fn list_personal_bests(
        &self,
        user_id: Option<i32>,
        exercise_id: Option<i32>,
        order: SortOrder,
    ) -> Result<Vec<PersonalBestRecord>, LyftitError> {
        let store = self.store.clone();
        let filter = PersonalBestFilter {
            user_id,
            exercise_id,
        };
        let rows = on_runtime(async move { store.list_personal_bests(filter, order.into()).await })
            .await?;
        Ok(records(rows))
    }

    pub async fn list_personal_best_entries(
        &self,
    ) -> Result<Vec<PersonalBestEntryRecord>, LyftitError> {
        let store = self.store.clone();
        let rows = on_runtime(async move { store.list_personal_best_entries().await }).await?;
        Ok(records(rows))
    }

    pub async fn update_personal_best(
        &self,
        id: i32,
        input: PersonalBestInput,
    ) -> Result<u64, LyftitError> {
        let store = self.store.clone();
        on_runtime(async move { store.update_personal_best(id, input.into()).await })
            .await
            .map(count)
    }

    pub async fn delete_personal_best(&self, id: i32) -> Result<u64, LyftitError> {
        let store = self.store.clone();
        on_runtime(async move { store.delete_personal_best(id).await })
            .await
            .map(count)
    }

    pub async fn record_personal_best(
        &self,
        user_id: i32,
        exercise_id: i32,
        weight: f64,
        reps: i32,
    ) -> Result<PersonalBestResult, LyftitError> {
        let store = self.store.clone();
        let outcome = on_runtime(async move {
            store
                .record_personal_best(user_id, exercise_id, weight, reps)
                .await
        })
        .await?;
        Ok(outcome.into())
    }

    // Home and debug screens
    pub async fn overview(&self) -> Result<OverviewRecord, LyftitError> {
        let store = self.store.clone();
        let overview = on_runtime(async move { store.overview().await }).await?;
        Ok(overview.into())
    }

    pub async fn seed_demo_data(&self) -> Result<u64, LyftitError> {
        let store = self.store.clone();
        on_runtime(async move { store.seed_demo_data().await })
            .await
            .map(count)
    }

    pub async fn snapshot_json(&self) -> Result<String, LyftitError> {
        let store = self.store.clone();
        let snapshot = on_runtime(async move { store.snapshot().await }).await?;
        Ok(snapshot.to_json()?)
    }

    pub async fn reset_database(&self) -> Result<u64, LyftitError> {
        let store = self.store.clone();
        on_runtime(async move { store.clear_all_tables().await })
            .await
            .map(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;

    async fn session() -> Session {
        Session::new(Store::open(StoreConfig::in_memory()).await.unwrap())
    }

    fn squat(muscle_group: &str) -> ExerciseInput {
        ExerciseInput {
            name: "Squat".to_string(),
            description: None,
            muscle_group: Some(muscle_group.to_string()),
        }
    }

    #[tokio::test]
    async fn duplicate_exercise_surfaces_typed_error() {
        let session = session().await;
        let id = session.insert_exercise(squat("Legs")).await.unwrap();
        let err = session.insert_exercise(squat("Quads")).await.unwrap_err();
        assert!(matches!(err, LyftitError::UniqueViolation(_)));

        let exercise = session.get_exercise(id).await.unwrap().unwrap();
        assert_eq!(exercise.muscle_group.as_deref(), Some("Legs"));
    }

    #[tokio::test]
    async fn counts_cross_the_boundary_unchanged() {
        let session = session().await;
        let id = session.insert_exercise(squat("Legs")).await.unwrap();
        assert_eq!(session.update_exercise(id, squat("Glutes")).await.unwrap(), 1);
        assert_eq!(session.update_exercise(id + 1, squat("Glutes")).await.unwrap(), 0);
        assert_eq!(session.delete_exercise(id).await.unwrap(), 1);
        assert_eq!(session.delete_exercise(id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn demo_data_reaches_the_home_tab() {
        let session = session().await;
        assert_eq!(session.seed_demo_data().await.unwrap(), 7);
        let overview = session.overview().await.unwrap();
        assert_eq!(overview.exercise_count, 1);
        assert_eq!(overview.first_workout_name.as_deref(), Some("Push Day"));
        let json = session.snapshot_json().await.unwrap();
        assert!(json.contains("Bench Press"));
        assert_eq!(session.reset_database().await.unwrap(), 7);
    }
}
