use log::info;
use std::sync::Arc;

use crate::config::StoreConfig;
use crate::db::Store;

pub mod errors;
pub mod logging;
pub mod objects;
pub mod session;

use errors::LyftitError;
use session::{Session, on_runtime};

/// Opens (creating if needed) the database at `db_path` and prepares its
/// schema. The app must not show data screens until this succeeds.
#[uniffi::export]
pub async fn open_session(
    db_path: String,
    enforce_foreign_keys: bool,
) -> Result<Arc<Session>, LyftitError> {
    info!("Opening session for {}", db_path);
    let config = StoreConfig::new(db_path).enforce_foreign_keys(enforce_foreign_keys);
    let store = on_runtime(async move { Store::open(config).await }).await?;
    Ok(Arc::new(Session::new(store)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn open_session_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lyftit.db");
        let session = open_session(path.to_string_lossy().into_owned(), false)
            .await
            .unwrap();
        assert!(session.overview().await.is_ok());
        assert!(path.exists());
    }

    #[tokio::test]
    async fn unopenable_database_fails_initialization() {
        let err = open_session("/nonexistent/deeply/nested/lyftit.db".to_string(), false)
            .await
            .err()
            .unwrap();
        assert!(matches!(err, LyftitError::Initialization(_)));
    }
}
