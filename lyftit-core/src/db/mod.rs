pub mod error;
pub mod init;
pub mod models;
pub mod operations;
pub mod schema;

pub use error::{Entity, ExpectFound, Result, StoreError};
pub use operations::{
    ExerciseFilter, ListOrder, Overview, PersonalBestFilter, PersonalBestOutcome, StoreSnapshot,
    WorkoutExerciseFilter, WorkoutFilter,
};

use diesel::SqliteConnection;
use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use log::{debug, info};
use std::time::Duration;

use crate::config::StoreConfig;

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

/// Pragmas applied to every connection the pool hands out.
#[derive(Debug, Clone)]
struct ConnectionOptions {
    enforce_foreign_keys: bool,
    busy_timeout: Duration,
    write_ahead_log: bool,
}

impl ConnectionOptions {
    fn pragmas(&self) -> String {
        let mut pragmas = format!(
            "PRAGMA busy_timeout = {}; PRAGMA foreign_keys = {};",
            self.busy_timeout.as_millis(),
            if self.enforce_foreign_keys { "ON" } else { "OFF" }
        );
        if self.write_ahead_log {
            pragmas.push_str(" PRAGMA journal_mode = WAL; PRAGMA synchronous = NORMAL;");
        }
        pragmas
    }
}

impl From<&StoreConfig> for ConnectionOptions {
    fn from(config: &StoreConfig) -> Self {
        Self {
            enforce_foreign_keys: config.enforce_foreign_keys,
            busy_timeout: config.busy_timeout,
            write_ahead_log: !config.is_in_memory(),
        }
    }
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionOptions {
    fn on_acquire(
        &self,
        conn: &mut SqliteConnection,
    ) -> std::result::Result<(), diesel::r2d2::Error> {
        conn.batch_execute(&self.pragmas())
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Handle to the training database.
///
/// Holds a single pooled connection, so every operation is serialized.
/// Cloning is cheap and all clones share that connection. The only way to
/// obtain a `Store` is [`Store::open`], which prepares the schema first.
#[derive(Clone)]
pub struct Store {
    pool: DbPool,
    enforce_foreign_keys: bool,
}

impl Store {
    pub async fn open(config: StoreConfig) -> Result<Self> {
        tokio::task::spawn_blocking(move || Self::open_blocking(config))
            .await
            .map_err(StoreError::initialization)?
    }

    /// Opens the store on the calling thread.
    pub fn open_blocking(config: StoreConfig) -> Result<Self> {
        info!("Opening training store at {}", config.database_url);
        let manager = ConnectionManager::<SqliteConnection>::new(config.database_url.clone());
        // One long-lived connection: it is the single writer, and an in-memory
        // database lives only as long as its connection.
        let pool = Pool::builder()
            .max_size(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connection_timeout(config.connection_timeout)
            .connection_customizer(Box::new(ConnectionOptions::from(&config)))
            .build(manager)
            .map_err(StoreError::initialization)?;

        {
            let mut conn = pool.get().map_err(StoreError::initialization)?;
            init::initialize(&mut *conn)
                .map_err(|e| StoreError::initialization(format!("{e:#}")))?;
        }
        info!("Training store ready");

        Ok(Self {
            pool,
            enforce_foreign_keys: config.enforce_foreign_keys,
        })
    }

    pub fn enforces_foreign_keys(&self) -> bool {
        self.enforce_foreign_keys
    }

    /// Runs `op` against the connection on the blocking thread pool.
    pub(crate) async fn interact<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get().map_err(StoreError::unavailable)?;
            op(&mut *conn)
        })
        .await
        .map_err(|e| {
            debug!("Store worker did not complete: {}", e);
            StoreError::unavailable(e)
        })?
    }
}
