use diesel::result::{DatabaseErrorKind, Error as DieselError};
use log::warn;
use std::fmt;
use thiserror::Error;

/// The tables a store operation can act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    Exercise,
    User,
    Workout,
    WorkoutExercise,
    PersonalBest,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Entity::Exercise => "exercise",
            Entity::User => "user",
            Entity::Workout => "workout",
            Entity::WorkoutExercise => "workout exercise",
            Entity::PersonalBest => "personal best",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be opened or its schema prepared. No handle exists.
    #[error("failed to initialize store: {reason}")]
    Initialization { reason: String },

    #[error("{entity} violates a uniqueness constraint: {detail}")]
    UniqueViolation { entity: Entity, detail: String },

    #[error("{entity} violates an integrity constraint: {detail}")]
    Constraint { entity: Entity, detail: String },

    #[error("no {entity} with id {id}")]
    NotFound { entity: Entity, id: i32 },

    #[error("store unavailable: {reason}")]
    Unavailable { reason: String },
}

pub type Result<T> = std::result::Result<T, StoreError>;

impl StoreError {
    /// Translates an engine error raised while working on `entity`.
    pub fn from_diesel(entity: Entity, err: DieselError) -> Self {
        match err {
            DieselError::DatabaseError(kind, info) => {
                let detail = info.message().to_string();
                match kind {
                    DatabaseErrorKind::UniqueViolation => {
                        warn!("unique constraint rejected {}: {}", entity, detail);
                        StoreError::UniqueViolation { entity, detail }
                    }
                    DatabaseErrorKind::ForeignKeyViolation
                    | DatabaseErrorKind::NotNullViolation
                    | DatabaseErrorKind::CheckViolation => {
                        warn!("integrity constraint rejected {}: {}", entity, detail);
                        StoreError::Constraint { entity, detail }
                    }
                    _ => StoreError::Unavailable { reason: detail },
                }
            }
            other => StoreError::Unavailable {
                reason: other.to_string(),
            },
        }
    }

    pub fn not_found(entity: Entity, id: i32) -> Self {
        StoreError::NotFound { entity, id }
    }

    pub fn unavailable(reason: impl fmt::Display) -> Self {
        StoreError::Unavailable {
            reason: reason.to_string(),
        }
    }

    pub fn initialization(reason: impl fmt::Display) -> Self {
        StoreError::Initialization {
            reason: reason.to_string(),
        }
    }

    /// Failures the user can clear by trying again later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Unavailable { .. })
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, StoreError::Initialization { .. })
    }

    /// Text suitable for showing on screen.
    pub fn user_message(&self) -> String {
        match self {
            StoreError::Initialization { .. } => {
                "The training database could not be opened.".to_string()
            }
            StoreError::UniqueViolation {
                entity: Entity::Exercise,
                ..
            } => "an exercise with that name already exists".to_string(),
            StoreError::UniqueViolation { entity, .. } => {
                format!("a {} with those details already exists", entity)
            }
            StoreError::Constraint { entity, .. } => {
                format!("the {} refers to a record that does not exist", entity)
            }
            StoreError::NotFound { entity, .. } => format!("that {} no longer exists", entity),
            StoreError::Unavailable { .. } => {
                "The training database is busy or unavailable. Please try again.".to_string()
            }
        }
    }
}

/// Only for transaction bookkeeping (begin, commit, rollback). Query errors
/// go through [`StoreError::from_diesel`] so they keep their entity.
impl From<DieselError> for StoreError {
    fn from(err: DieselError) -> Self {
        StoreError::Unavailable {
            reason: err.to_string(),
        }
    }
}

/// Converts the absent/zero-rows outcomes of the store into `NotFound` for
/// callers that treat a missing row as a failure.
pub trait ExpectFound<T> {
    fn found(self, entity: Entity, id: i32) -> Result<T>;
}

impl<T> ExpectFound<T> for Option<T> {
    fn found(self, entity: Entity, id: i32) -> Result<T> {
        self.ok_or(StoreError::NotFound { entity, id })
    }
}

impl ExpectFound<usize> for usize {
    fn found(self, entity: Entity, id: i32) -> Result<usize> {
        if self == 0 {
            Err(StoreError::NotFound { entity, id })
        } else {
            Ok(self)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::result::DatabaseErrorInformation;

    struct Info(&'static str);

    impl DatabaseErrorInformation for Info {
        fn message(&self) -> &str {
            self.0
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            None
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            None
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn db_error(kind: DatabaseErrorKind, message: &'static str) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(Info(message)))
    }

    #[test]
    fn unique_violation_is_classified_by_kind() {
        let err = StoreError::from_diesel(
            Entity::Exercise,
            db_error(DatabaseErrorKind::UniqueViolation, "constraint failed"),
        );
        assert!(matches!(
            err,
            StoreError::UniqueViolation {
                entity: Entity::Exercise,
                ..
            }
        ));
        assert_eq!(
            err.user_message(),
            "an exercise with that name already exists"
        );
    }

    #[test]
    fn message_text_does_not_drive_classification() {
        let err = StoreError::from_diesel(
            Entity::Exercise,
            db_error(DatabaseErrorKind::Unknown, "UNIQUE constraint failed: exercises.name"),
        );
        assert!(err.is_retryable());
    }

    #[test]
    fn foreign_key_violation_is_a_constraint_error() {
        let err = StoreError::from_diesel(
            Entity::Workout,
            db_error(DatabaseErrorKind::ForeignKeyViolation, "FOREIGN KEY constraint failed"),
        );
        assert!(matches!(err, StoreError::Constraint { .. }));
        assert!(!err.is_retryable());
    }

    #[test]
    fn non_database_errors_are_unavailable() {
        let err = StoreError::from_diesel(Entity::User, DieselError::BrokenTransactionManager);
        assert!(err.is_retryable());
    }

    #[test]
    fn zero_rows_become_not_found() {
        assert!(matches!(
            0usize.found(Entity::User, 4),
            Err(StoreError::NotFound { id: 4, .. })
        ));
        assert_eq!(1usize.found(Entity::User, 4).unwrap(), 1);
        assert!(None::<i32>.found(Entity::Workout, 9).is_err());
    }
}
