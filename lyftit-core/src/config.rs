use std::env;
use std::time::Duration;

pub const DEFAULT_DATABASE_URL: &str = "lyftit.db";
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";
pub const ENFORCE_FOREIGN_KEYS_ENV: &str = "LYFTIT_ENFORCE_FOREIGN_KEYS";

/// How the store is opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Path of the SQLite file, or `:memory:`.
    pub database_url: String,
    /// Reject rows whose references point at missing parents. Off by default:
    /// the app has always accepted dangling references.
    pub enforce_foreign_keys: bool,
    pub busy_timeout: Duration,
    pub connection_timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            enforce_foreign_keys: false,
            busy_timeout: Duration::from_millis(5000),
            connection_timeout: Duration::from_secs(5),
        }
    }
}

impl StoreConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Self::default()
        }
    }

    pub fn in_memory() -> Self {
        Self::new(":memory:")
    }

    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = env::var(DATABASE_URL_ENV) {
            if !url.trim().is_empty() {
                config.database_url = url;
            }
        }
        if let Ok(flag) = env::var(ENFORCE_FOREIGN_KEYS_ENV) {
            config.enforce_foreign_keys = parse_flag(&flag).unwrap_or(false);
        }
        config
    }

    pub fn enforce_foreign_keys(mut self, enforce: bool) -> Self {
        self.enforce_foreign_keys = enforce;
        self
    }

    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    pub fn connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    pub fn is_in_memory(&self) -> bool {
        let url = self.database_url.as_str();
        url == ":memory:" || url.starts_with("file::memory:") || url.contains("mode=memory")
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
