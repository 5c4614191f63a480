//! Async store handle over the employee table.
//!
//! # Responsibility
//! - Own the single SQLite connection for the process.
//! - Run every query on the blocking pool so UI callers only await.
//! - Broadcast change events after each committed mutation.
//!
//! # Invariants
//! - All table access is serialized through one connection mutex.
//! - An event is sent only after its statement committed and only when a row
//!   was affected, so subscribers never observe uncommitted state.
//! - The handle is constructed explicitly and cloned to consumers; there is no
//!   process-global instance.

pub mod events;
pub mod subscription;

use crate::db::{open_db, open_db_in_memory, DbError};
use crate::model::employee::{Employee, EmployeeId};
use crate::repo::employee_repo::{
    EmployeeRepository, RepoError, RepoResult, SqliteEmployeeRepository,
};
use events::StoreEvent;
use log::{debug, error, info};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::sync::Arc;
use subscription::{EmployeeListSubscription, EmployeeSubscription};
use tokio::sync::{broadcast, Mutex};

const EVENT_CHANNEL_CAPACITY: usize = 256;

pub type StoreResult<T> = Result<T, StoreError>;

/// Error returned by async store operations.
#[derive(Debug)]
pub enum StoreError {
    /// Repository or SQLite failure.
    Repo(RepoError),
    /// The blocking worker running the query panicked or was cancelled.
    Join(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Join(message) => write!(f, "store worker failed: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Join(_) => None,
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Repo(RepoError::Db(value))
    }
}

struct StoreInner {
    conn: Mutex<Connection>,
    events_tx: broadcast::Sender<StoreEvent>,
}

/// Shared handle to the employee table.
#[derive(Clone)]
pub struct EmployeeStore {
    inner: Arc<StoreInner>,
}

impl EmployeeStore {
    /// Opens (or creates) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::from_connection(open_db(path)?)
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::from_connection(open_db_in_memory()?)
    }

    /// Wraps an already bootstrapped connection.
    ///
    /// # Errors
    /// - Returns repository schema errors when the connection was not opened
    ///   through `db::open_db*`.
    pub fn from_connection(conn: Connection) -> StoreResult<Self> {
        SqliteEmployeeRepository::try_new(&conn)?;
        let (events_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Ok(Self {
            inner: Arc::new(StoreInner {
                conn: Mutex::new(conn),
                events_tx,
            }),
        })
    }

    /// Subscribes to raw change events.
    pub fn subscribe_events(&self) -> broadcast::Receiver<StoreEvent> {
        self.inner.events_tx.subscribe()
    }

    /// Inserts an unsaved employee and returns its assigned id.
    pub async fn insert(&self, employee: Employee) -> StoreResult<EmployeeId> {
        self.with_repo(move |repo, events_tx| {
            let id = repo.insert_employee(&employee)?;
            info!("event=employee_insert module=store status=ok employee_id={id}");
            let _ = events_tx.send(StoreEvent::Inserted { id });
            Ok(id)
        })
        .await
    }

    /// Replaces name/email of `employee.id`.
    ///
    /// Returns whether a row matched. A missing id is a silent no-op and
    /// publishes nothing.
    pub async fn update(&self, employee: Employee) -> StoreResult<bool> {
        self.with_repo(move |repo, events_tx| {
            let id = employee.id;
            let matched = repo.update_employee(&employee)?;
            if matched {
                info!("event=employee_update module=store status=ok employee_id={id}");
                let _ = events_tx.send(StoreEvent::Updated { id });
            } else {
                info!("event=employee_update module=store status=noop employee_id={id}");
            }
            Ok(matched)
        })
        .await
    }

    /// Removes the row with `employee.id`; other fields are ignored.
    ///
    /// Returns whether a row matched.
    pub async fn delete(&self, employee: Employee) -> StoreResult<bool> {
        self.with_repo(move |repo, events_tx| {
            let id = employee.id;
            let matched = repo.delete_employee(&employee)?;
            if matched {
                info!("event=employee_delete module=store status=ok employee_id={id}");
                let _ = events_tx.send(StoreEvent::Deleted { id });
            } else {
                info!("event=employee_delete module=store status=noop employee_id={id}");
            }
            Ok(matched)
        })
        .await
    }

    /// One-shot read of every row in insertion order.
    pub async fn load_all(&self) -> StoreResult<Vec<Employee>> {
        self.with_repo(|repo, _| {
            let employees = repo.list_employees()?;
            debug!(
                "event=employee_list module=store status=ok count={}",
                employees.len()
            );
            Ok(employees)
        })
        .await
    }

    /// One-shot read of a single row.
    pub async fn load_by_id(&self, id: EmployeeId) -> StoreResult<Option<Employee>> {
        self.with_repo(move |repo, _| repo.get_employee(id)).await
    }

    /// Live view of the whole table.
    ///
    /// The first `next()` yields current contents immediately; later calls
    /// yield a fresh snapshot after each committed change.
    pub fn fetch_all(&self) -> EmployeeListSubscription {
        EmployeeListSubscription::new(self.clone())
    }

    /// Live view of one row. Yields nothing while the id does not exist.
    pub fn fetch_by_id(&self, id: EmployeeId) -> EmployeeSubscription {
        EmployeeSubscription::new(self.clone(), id)
    }

    async fn with_repo<T, F>(&self, f: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&SqliteEmployeeRepository<'_>, &broadcast::Sender<StoreEvent>) -> RepoResult<T>
            + Send
            + 'static,
    {
        let inner = Arc::clone(&self.inner);
        let joined = tokio::task::spawn_blocking(move || {
            let conn = inner.conn.blocking_lock();
            let repo = SqliteEmployeeRepository::try_new(&conn)?;
            f(&repo, &inner.events_tx)
        })
        .await;

        match joined {
            Ok(result) => result.map_err(|err| {
                error!("event=store_query module=store status=error error={err}");
                StoreError::from(err)
            }),
            Err(err) => {
                error!("event=store_query module=store status=error error_code=join_failed error={err}");
                Err(StoreError::Join(err.to_string()))
            }
        }
    }
}
