use diesel::connection::SimpleConnection;
use diesel::{Connection, SqliteConnection};
use lyftit::db::models::{
    ExerciseChanges, NewExercise, NewUser, NewWorkout, NewWorkoutExercise,
};
use lyftit::db::{
    Entity, ExerciseFilter, ExpectFound, ListOrder, WorkoutExerciseFilter, WorkoutFilter,
};
use lyftit::{Store, StoreConfig, StoreError};

async fn memory_store() -> Store {
    Store::open(StoreConfig::in_memory()).await.unwrap()
}

#[tokio::test]
async fn duplicate_exercise_names_yield_one_success_and_one_violation() {
    let store = memory_store().await;
    let results = [
        store.insert_exercise(NewExercise::new("Deadlift")).await,
        store.insert_exercise(NewExercise::new("Deadlift")).await,
    ];

    let successes = results.iter().filter(|r| r.is_ok()).count();
    let violations = results
        .iter()
        .filter(|r| {
            matches!(
                r,
                Err(StoreError::UniqueViolation {
                    entity: Entity::Exercise,
                    ..
                })
            )
        })
        .count();
    assert_eq!(successes, 1);
    assert_eq!(violations, 1);
}

#[tokio::test]
async fn concurrent_duplicate_inserts_still_conflict() {
    let store = memory_store().await;
    let a = tokio::spawn({
        let store = store.clone();
        async move { store.insert_exercise(NewExercise::new("Row")).await }
    });
    let b = tokio::spawn({
        let store = store.clone();
        async move { store.insert_exercise(NewExercise::new("Row")).await }
    });
    let results = [a.await.unwrap(), b.await.unwrap()];
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert_eq!(store.count_exercises().await.unwrap(), 1);
}

#[tokio::test]
async fn squat_scenario() {
    let store = memory_store().await;
    let id = store
        .insert_exercise(NewExercise::new("Squat").with_muscle_group("Legs"))
        .await
        .unwrap();

    let squat = store.get_exercise(id).await.unwrap().unwrap();
    assert_eq!(squat.name, "Squat");
    assert_eq!(squat.muscle_group.as_deref(), Some("Legs"));

    let err = store
        .insert_exercise(NewExercise::new("Squat").with_muscle_group("Quads"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::UniqueViolation { .. }));
    assert_eq!(
        err.user_message(),
        "an exercise with that name already exists"
    );
    assert_eq!(store.get_exercise(id).await.unwrap(), Some(squat));
}

#[tokio::test]
async fn update_of_missing_id_changes_nothing() {
    let store = memory_store().await;
    store
        .insert_exercise(NewExercise::new("Press").with_muscle_group("Shoulders"))
        .await
        .unwrap();
    let before = store
        .list_exercises(ExerciseFilter::default(), ListOrder::Ascending)
        .await
        .unwrap();

    let changes = ExerciseChanges {
        name: Some("Overhead Press".to_string()),
        ..Default::default()
    };
    let affected = store.update_exercise(404, changes).await.unwrap();
    assert_eq!(affected, 0);
    assert!(matches!(
        affected.found(Entity::Exercise, 404),
        Err(StoreError::NotFound { id: 404, .. })
    ));

    let after = store
        .list_exercises(ExerciseFilter::default(), ListOrder::Ascending)
        .await
        .unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn delete_then_get_is_absent() {
    let store = memory_store().await;
    let id = store
        .insert_exercise(NewExercise::new("Plank"))
        .await
        .unwrap();
    assert_eq!(store.delete_exercise(id).await.unwrap(), 1);
    assert_eq!(store.get_exercise(id).await.unwrap(), None);
    assert_eq!(store.delete_exercise(id).await.unwrap(), 0);
}

#[tokio::test]
async fn repeated_lists_are_identical() {
    let store = memory_store().await;
    for name in ["Squat", "Bench", "Deadlift", "Press"] {
        store.insert_exercise(NewExercise::new(name)).await.unwrap();
    }
    for order in [ListOrder::Ascending, ListOrder::LatestFirst] {
        let first = store
            .list_exercises(ExerciseFilter::default(), order)
            .await
            .unwrap();
        let second = store
            .list_exercises(ExerciseFilter::default(), order)
            .await
            .unwrap();
        assert_eq!(first, second);
    }
}

#[tokio::test]
async fn workout_with_missing_user_is_accepted() {
    let store = memory_store().await;
    let id = store
        .insert_workout(NewWorkout::new(Some(77), "Push Day"))
        .await
        .unwrap();
    let workout = store.get_workout(id).await.unwrap().unwrap();
    assert_eq!(workout.name.as_deref(), Some("Push Day"));
    assert!(workout.created_at.is_some());
    assert!(store.get_user(77).await.unwrap().is_none());
}

#[tokio::test]
async fn deleting_a_user_leaves_their_workouts() {
    let store = memory_store().await;
    let alice = store.insert_user(NewUser::new("Alice")).await.unwrap();
    store
        .insert_workout(NewWorkout::new(Some(alice), "Leg Day"))
        .await
        .unwrap();
    store.delete_user(alice).await.unwrap();

    let workouts = store
        .list_workouts(
            WorkoutFilter {
                user_id: Some(alice),
            },
            ListOrder::Ascending,
        )
        .await
        .unwrap();
    assert_eq!(workouts.len(), 1);
}

#[tokio::test]
async fn store_survives_reopening_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lyftit.db");
    let url = path.to_string_lossy().into_owned();

    let id = {
        let store = Store::open(StoreConfig::new(url.clone())).await.unwrap();
        store
            .insert_exercise(NewExercise::new("Squat").with_muscle_group("Legs"))
            .await
            .unwrap()
    };

    let store = Store::open(StoreConfig::new(url)).await.unwrap();
    let squat = store.get_exercise(id).await.unwrap().unwrap();
    assert_eq!(squat.name, "Squat");
}

#[tokio::test]
async fn legacy_store_is_migrated_on_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("testerdb.db");
    let url = path.to_string_lossy().into_owned();

    {
        let mut conn = SqliteConnection::establish(&url).unwrap();
        conn.batch_execute(
            "CREATE TABLE IF NOT EXISTS exercises (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT UNIQUE NOT NULL, muscle_group TEXT);
             CREATE TABLE IF NOT EXISTS workouts (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT UNIQUE NOT NULL);
             INSERT INTO exercises (name, muscle_group) VALUES ('Squat', 'Legs');
             INSERT INTO workouts (name) VALUES ('Leg Day');",
        )
        .unwrap();
    }

    let store = Store::open(StoreConfig::new(url)).await.unwrap();
    let exercises = store
        .list_exercises(ExerciseFilter::default(), ListOrder::Ascending)
        .await
        .unwrap();
    assert_eq!(exercises.len(), 1);
    assert_eq!(exercises[0].name, "Squat");
    assert_eq!(exercises[0].description, None);

    let err = store
        .insert_exercise(NewExercise::new("Squat"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::UniqueViolation { .. }));

    let workout = store.first_workout().await.unwrap().unwrap();
    assert_eq!(workout.name.as_deref(), Some("Leg Day"));
    assert_eq!(workout.user_id, None);

    let id = store
        .insert_exercise(
            NewExercise::new("Bench Press")
                .with_description("Barbell bench press")
                .with_muscle_group("Chest"),
        )
        .await
        .unwrap();
    assert_eq!(
        store
            .get_exercise(id)
            .await
            .unwrap()
            .and_then(|e| e.description),
        Some("Barbell bench press".to_string())
    );
}

/// A device that ran both the old single-screen build and the current one:
/// legacy exercises and workouts next to current tables that already point
/// at them.
async fn open_mixed_store(enforce_foreign_keys: bool) -> (tempfile::TempDir, Store) {
    let dir = tempfile::tempdir().unwrap();
    let url = dir.path().join("mixed.db").to_string_lossy().into_owned();

    {
        let mut conn = SqliteConnection::establish(&url).unwrap();
        conn.batch_execute(
            r#"CREATE TABLE exercises (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT UNIQUE NOT NULL, muscle_group TEXT);
               CREATE TABLE workouts (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT UNIQUE NOT NULL);
               CREATE TABLE users (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL);
               CREATE TABLE workout_exercises (id INTEGER PRIMARY KEY AUTOINCREMENT, workout_id INTEGER, exercise_id INTEGER, "order" INTEGER, reps INTEGER, weight REAL, FOREIGN KEY(workout_id) REFERENCES workouts(id), FOREIGN KEY(exercise_id) REFERENCES exercises(id));
               CREATE TABLE personal_bests (id INTEGER PRIMARY KEY AUTOINCREMENT, user_id INTEGER, exercise_id INTEGER, weight REAL, reps INTEGER, date INTEGER, FOREIGN KEY(user_id) REFERENCES users(id), FOREIGN KEY(exercise_id) REFERENCES exercises(id));
               INSERT INTO exercises (name, muscle_group) VALUES ('Squat', 'Legs');
               INSERT INTO workouts (name) VALUES ('Leg Day');
               INSERT INTO users (name) VALUES ('Alice');
               INSERT INTO workout_exercises (workout_id, exercise_id, "order", reps, weight) VALUES (1, 1, 1, 5, 100.0);
               INSERT INTO personal_bests (user_id, exercise_id, weight, reps, date) VALUES (1, 1, 120.0, 3, 1700000000000);"#,
        )
        .unwrap();
    }

    let config = StoreConfig::new(url).enforce_foreign_keys(enforce_foreign_keys);
    let store = Store::open(config).await.unwrap();
    (dir, store)
}

async fn assert_mixed_store_rows_survive(store: &Store) {
    let exercises = store
        .list_exercises(ExerciseFilter::default(), ListOrder::Ascending)
        .await
        .unwrap();
    assert_eq!(exercises.len(), 1);
    assert_eq!(exercises[0].muscle_group.as_deref(), Some("Legs"));

    let entries = store
        .list_workout_exercises(
            WorkoutExerciseFilter {
                workout_id: Some(1),
                ..Default::default()
            },
            ListOrder::Ascending,
        )
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].exercise_id, Some(1));

    let bests = store.list_personal_best_entries().await.unwrap();
    assert_eq!(bests.len(), 1);
    assert_eq!(bests[0].exercise_name.as_deref(), Some("Squat"));

    let appended = store
        .append_workout_exercise(1, 1, Some(5), Some(105.0))
        .await
        .unwrap();
    assert_eq!(appended.position, Some(2));

    let workout = store.first_workout().await.unwrap().unwrap();
    assert_eq!(workout.name.as_deref(), Some("Leg Day"));
    // The legacy unique name on workouts is gone.
    store
        .insert_workout(NewWorkout::new(None, "Leg Day"))
        .await
        .unwrap();
}

#[tokio::test]
async fn mixed_legacy_store_keeps_rows_without_enforcement() {
    let (_dir, store) = open_mixed_store(false).await;
    assert_mixed_store_rows_survive(&store).await;

    store
        .insert_workout_exercise(NewWorkoutExercise {
            workout_id: Some(1),
            exercise_id: Some(99),
            position: Some(3),
            reps: None,
            weight: None,
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn mixed_legacy_store_keeps_rows_with_enforcement() {
    let (_dir, store) = open_mixed_store(true).await;
    assert!(store.enforces_foreign_keys());
    assert_mixed_store_rows_survive(&store).await;

    let err = store
        .insert_workout_exercise(NewWorkoutExercise {
            workout_id: Some(1),
            exercise_id: Some(99),
            position: Some(3),
            reps: None,
            weight: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Constraint {
            entity: Entity::WorkoutExercise,
            ..
        }
    ));
}
