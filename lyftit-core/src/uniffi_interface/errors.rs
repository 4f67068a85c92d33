use log::warn;
use thiserror::Error as ThisError;
use uniffi::Error;

use crate::db::StoreError;

/// Store failures as seen by the app. The message is ready to display; the
/// variant tells the screen what to do next.
#[derive(Debug, ThisError, Error)]
#[uniffi(flat_error)]
#[non_exhaustive]
pub enum LyftitError {
    #[error("{0}")]
    Initialization(String),
    #[error("{0}")]
    UniqueViolation(String),
    #[error("{0}")]
    Constraint(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Unavailable(String),
    /// The data could not be encoded for the app. Retrying will not help.
    #[error("{0}")]
    Serialization(String),
}

impl From<StoreError> for LyftitError {
    fn from(e: StoreError) -> Self {
        warn!("store operation failed: {}", e);
        let message = e.user_message();
        match e {
            StoreError::Initialization { .. } => LyftitError::Initialization(message),
            StoreError::UniqueViolation { .. } => LyftitError::UniqueViolation(message),
            StoreError::Constraint { .. } => LyftitError::Constraint(message),
            StoreError::NotFound { .. } => LyftitError::NotFound(message),
            StoreError::Unavailable { .. } => LyftitError::Unavailable(message),
        }
    }
}

impl From<serde_json::Error> for LyftitError {
    fn from(e: serde_json::Error) -> Self {
        warn!("could not encode store data: {}", e);
        LyftitError::Serialization(format!("Could not prepare the data: {}", e))
    }
}

impl LyftitError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, LyftitError::Unavailable(_))
    }


    pub fn with_display<D: std::fmt::Display>(d: D) -> Self {
        LyftitError::Unavailable(d.to_string())
    }
}
