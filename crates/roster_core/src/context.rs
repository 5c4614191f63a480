//! Process-level application context.
//!
//! # Responsibility
//! - Resolve configuration once at startup.
//! - Build the single store handle and hand it to every screen.
//!
//! # Invariants
//! - One `AppContext` per process owns the database connection; consumers
//!   receive clones of its store handle instead of reaching for a global.

use crate::db::schema::DATABASE_FILE_NAME;
use crate::store::{EmployeeStore, StoreResult};
use crate::ui::messages::MessageCatalog;
use crate::ui::screen::EmployeeScreen;
use log::info;
use std::path::PathBuf;

/// Environment variable overriding the database file path.
pub const DB_PATH_ENV: &str = "ROSTER_DB_PATH";

/// Startup configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Database file; `None` keeps data in memory for the process lifetime.
    pub db_path: Option<PathBuf>,
    pub messages: MessageCatalog,
}

impl AppConfig {
    /// In-memory store with default messages.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// File-backed store at `path` with default messages.
    pub fn with_db_path(path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Reads `ROSTER_DB_PATH`; unset or blank falls back to the temp directory.
    pub fn from_env() -> Self {
        Self::with_db_path(resolve_db_path(std::env::var(DB_PATH_ENV).ok()))
    }

    pub fn messages(mut self, messages: MessageCatalog) -> Self {
        self.messages = messages;
        self
    }
}

/// Resolves a configured database path, defaulting to `<temp>/roster_employees.sqlite3`.
pub fn resolve_db_path(raw: Option<String>) -> PathBuf {
    raw.as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join(DATABASE_FILE_NAME))
}

/// Shared handles created once per process.
#[derive(Clone)]
pub struct AppContext {
    store: EmployeeStore,
    messages: MessageCatalog,
}

impl AppContext {
    /// Opens the configured store.
    pub fn open(config: &AppConfig) -> StoreResult<Self> {
        let store = match config.db_path.as_ref() {
            Some(path) => EmployeeStore::open(path)?,
            None => EmployeeStore::open_in_memory()?,
        };
        info!(
            "event=app_context_open module=core status=ok mode={}",
            if config.db_path.is_some() { "file" } else { "memory" }
        );
        Ok(Self {
            store,
            messages: config.messages.clone(),
        })
    }

    pub fn store(&self) -> &EmployeeStore {
        &self.store
    }

    pub fn messages(&self) -> &MessageCatalog {
        &self.messages
    }

    /// Starts a roster screen bound to this context's store.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn launch_screen(&self) -> EmployeeScreen {
        EmployeeScreen::start(self.store.clone(), self.messages.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::resolve_db_path;
    use crate::db::schema::DATABASE_FILE_NAME;
    use std::path::PathBuf;

    #[test]
    fn resolve_db_path_prefers_trimmed_value() {
        assert_eq!(
            resolve_db_path(Some("  /data/roster.sqlite3 ".to_string())),
            PathBuf::from("/data/roster.sqlite3")
        );
    }

    #[test]
    fn resolve_db_path_falls_back_for_blank_or_missing() {
        let fallback = std::env::temp_dir().join(DATABASE_FILE_NAME);
        assert_eq!(resolve_db_path(None), fallback);
        assert_eq!(resolve_db_path(Some("   ".to_string())), fallback);
    }

    #[test]
    fn default_file_name_is_roster_specific() {
        let fallback = resolve_db_path(None);
        assert_eq!(
            fallback.file_name().and_then(|name| name.to_str()),
            Some("roster_employees.sqlite3")
        );
        assert_eq!(DATABASE_FILE_NAME, "roster_employees.sqlite3");
    }
}
