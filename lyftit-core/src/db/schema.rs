diesel::table! {
    exercises (id) {
        id -> Integer,
        name -> Text,
        description -> Nullable<Text>,
        muscle_group -> Nullable<Text>,
    }
}

diesel::table! {
    users (id) {
        id -> Integer,
        name -> Text,
    }
}

diesel::table! {
    workouts (id) {
        id -> Integer,
        user_id -> Nullable<Integer>,
        name -> Nullable<Text>,
        created_at -> Nullable<BigInt>,
    }
}

diesel::table! {
    workout_exercises (id) {
        id -> Integer,
        workout_id -> Nullable<Integer>,
        exercise_id -> Nullable<Integer>,
        #[sql_name = "order"]
        position -> Nullable<Integer>,
        reps -> Nullable<Integer>,
        weight -> Nullable<Double>,
    }
}

diesel::table! {
    personal_bests (id) {
        id -> Integer,
        user_id -> Nullable<Integer>,
        exercise_id -> Nullable<Integer>,
        weight -> Nullable<Double>,
        reps -> Nullable<Integer>,
        date -> Nullable<BigInt>,
    }
}

diesel::joinable!(personal_bests -> exercises (exercise_id));
diesel::joinable!(personal_bests -> users (user_id));
diesel::joinable!(workout_exercises -> exercises (exercise_id));
diesel::joinable!(workout_exercises -> workouts (workout_id));
diesel::joinable!(workouts -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(
    exercises,
    personal_bests,
    users,
    workout_exercises,
    workouts,
);
