//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose roster CRUD and list observation to Dart via FRB.
//! - Route every call through the process-wide `AppContext` store, so writes
//!   from Dart publish the same change events as core screens.
//! - Keep error semantics simple: envelopes with `ok` + message, never panics.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - One store handle and one runtime per process, created on first use.
//! - Empty name/email is rejected with the localized warning text.
//! - Update/delete of a missing id report success, like the screen does.

use log::{error, info};
use once_cell::sync::OnceCell;
use roster_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    AppConfig, AppContext, Employee, EmployeeInput, EmployeeListSubscription, LifecycleScope,
    MessageCatalog, RowBackground,
};
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::runtime::{Builder, Runtime};

const RUNTIME_WORKER_THREADS: usize = 2;

static ROSTER_RUNTIME: OnceCell<FfiRuntime> = OnceCell::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - UI-thread safe for current implementation.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - UI-thread safe for current implementation.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Sync call; may perform small file-system setup work.
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Reconfiguration attempts with different level or directory return error.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One roster row as rendered by the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeItem {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// `true` for even positions.
    pub dark_background: bool,
}

/// List response for the roster screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeListResponse {
    /// Whether the snapshot was read.
    pub ok: bool,
    pub items: Vec<EmployeeItem>,
    /// Empty-state text when `items` is empty, otherwise a diagnostics message.
    pub message: String,
}

impl EmployeeListResponse {
    fn snapshot(employees: Vec<Employee>, messages: &MessageCatalog) -> Self {
        if employees.is_empty() {
            return Self {
                ok: true,
                items: Vec::new(),
                message: messages.no_records_available.clone(),
            };
        }
        let items = employees
            .into_iter()
            .enumerate()
            .map(|(position, employee)| to_employee_item(position, employee))
            .collect::<Vec<_>>();
        let message = format!("Found {} record(s).", items.len());
        Self {
            ok: true,
            items,
            message,
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            items: Vec::new(),
            message: message.into(),
        }
    }
}

/// Result envelope for add/update/delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Affected id when known.
    pub employee_id: Option<i64>,
    /// Localized toast text or error message.
    pub message: String,
}

impl EmployeeActionResponse {
    fn success(message: impl Into<String>, employee_id: i64) -> Self {
        Self {
            ok: true,
            employee_id: Some(employee_id),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            employee_id: None,
            message: message.into(),
        }
    }
}

/// Localized strings used by the screen (toasts, prompt labels).
///
/// # FFI contract
/// - Sync call, non-blocking; does not touch the database.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn message_catalog() -> MessageCatalog {
    MessageCatalog::default()
}

/// Adds an employee from the add form.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - Returns the assigned id on success and publishes an insert event.
#[flutter_rust_bridge::frb(sync)]
pub fn employee_add(name: String, email: String) -> EmployeeActionResponse {
    match shared_runtime() {
        Ok(runtime) => runtime.add(name, email),
        Err(err) => EmployeeActionResponse::failure(err),
    }
}

/// Replaces name/email of employee `id` from the edit dialog.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - A missing id is a silent success.
#[flutter_rust_bridge::frb(sync)]
pub fn employee_update(id: i64, name: String, email: String) -> EmployeeActionResponse {
    match shared_runtime() {
        Ok(runtime) => runtime.update(id, name, email),
        Err(err) => EmployeeActionResponse::failure(err),
    }
}

/// Deletes employee `id` after the user confirmed the prompt.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - A missing id is a silent success.
#[flutter_rust_bridge::frb(sync)]
pub fn employee_delete(id: i64) -> EmployeeActionResponse {
    match shared_runtime() {
        Ok(runtime) => runtime.delete(id),
        Err(err) => EmployeeActionResponse::failure(err),
    }
}

/// Lists all employees in insertion order with row styling applied.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - One-shot read; use `employee_list_subscribe` to follow changes.
#[flutter_rust_bridge::frb(sync)]
pub fn employee_list() -> EmployeeListResponse {
    match shared_runtime() {
        Ok(runtime) => runtime.list(),
        Err(err) => EmployeeListResponse::failure(err),
    }
}

/// Loads one employee for the edit dialog.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - `None` when the row is missing; storage faults are logged and also map
///   to `None`.
#[flutter_rust_bridge::frb(sync)]
pub fn employee_get(id: i64) -> Option<EmployeeItem> {
    match shared_runtime() {
        Ok(runtime) => runtime.get(id),
        Err(_) => None,
    }
}

/// Opens a live subscription to the employee list and returns its handle.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never panics; returns `0` when the store cannot be opened.
#[flutter_rust_bridge::frb(sync)]
pub fn employee_list_subscribe() -> u64 {
    shared_runtime()
        .map(FfiRuntime::subscribe_list)
        .unwrap_or(0)
}

/// Waits for the next snapshot of subscription `subscription_id`.
///
/// # FFI contract
/// - Async call from Dart; blocks an FRB worker thread, never the UI thread.
/// - The first call after subscribing returns the current rows immediately;
///   later calls return after the next committed change.
/// - Never panics; `ok == false` once the subscription is closed or unknown.
pub fn employee_list_next(subscription_id: u64) -> EmployeeListResponse {
    match shared_runtime() {
        Ok(runtime) => runtime.next_list(subscription_id),
        Err(err) => EmployeeListResponse::failure(err),
    }
}

/// Closes subscription `subscription_id` and wakes any pending
/// `employee_list_next` on it.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never panics; returns `false` for unknown handles.
#[flutter_rust_bridge::frb(sync)]
pub fn employee_list_unsubscribe(subscription_id: u64) -> bool {
    shared_runtime()
        .map(|runtime| runtime.unsubscribe_list(subscription_id))
        .unwrap_or(false)
}

fn shared_runtime() -> Result<&'static FfiRuntime, String> {
    ROSTER_RUNTIME.get_or_try_init(|| FfiRuntime::open(&AppConfig::from_env()))
}

/// Live list subscription bound to its own cancellation scope.
struct ListWatch {
    scope: LifecycleScope,
    subscription: Arc<tokio::sync::Mutex<EmployeeListSubscription>>,
}

/// Runtime and store shared by every FFI call.
struct FfiRuntime {
    runtime: Runtime,
    context: AppContext,
    watches: Mutex<HashMap<u64, ListWatch>>,
    next_watch_id: AtomicU64,
}

impl FfiRuntime {
    fn open(config: &AppConfig) -> Result<Self, String> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(RUNTIME_WORKER_THREADS)
            .thread_name("roster-ffi")
            .enable_all()
            .build()
            .map_err(|err| {
                error!("event=ffi_setup module=ffi status=error error_code=runtime_failed error={err}");
                format!("roster runtime start failed: {err}")
            })?;
        let context = AppContext::open(config).map_err(|err| {
            error!("event=ffi_setup module=ffi status=error error_code=store_open_failed error={err}");
            format!("roster store open failed: {err}")
        })?;
        info!("event=ffi_setup module=ffi status=ok");

        Ok(Self {
            runtime,
            context,
            watches: Mutex::new(HashMap::new()),
            next_watch_id: AtomicU64::new(1),
        })
    }

    fn block_on<F: Future>(&self, fut: F) -> F::Output {
        self.runtime.block_on(fut)
    }

    fn messages(&self) -> &MessageCatalog {
        self.context.messages()
    }

    fn add(&self, name: String, email: String) -> EmployeeActionResponse {
        let employee = match EmployeeInput::new(name, email).into_new_employee() {
            Ok(employee) => employee,
            Err(_) => {
                return EmployeeActionResponse::failure(self.messages().empty_field_warning.clone())
            }
        };
        match self.block_on(self.context.store().insert(employee)) {
            Ok(id) => EmployeeActionResponse::success(self.messages().record_saved.clone(), id),
            Err(err) => EmployeeActionResponse::failure(format!("employee_add failed: {err}")),
        }
    }

    fn update(&self, id: i64, name: String, email: String) -> EmployeeActionResponse {
        let employee = match EmployeeInput::new(name, email).into_employee(id) {
            Ok(employee) => employee,
            Err(_) => {
                return EmployeeActionResponse::failure(self.messages().empty_field_warning.clone())
            }
        };
        match self.block_on(self.context.store().update(employee)) {
            Ok(_) => EmployeeActionResponse::success(self.messages().record_updated.clone(), id),
            Err(err) => EmployeeActionResponse::failure(format!("employee_update failed: {err}")),
        }
    }

    fn delete(&self, id: i64) -> EmployeeActionResponse {
        match self.block_on(self.context.store().delete(Employee::key(id))) {
            Ok(_) => EmployeeActionResponse::success(self.messages().record_deleted.clone(), id),
            Err(err) => EmployeeActionResponse::failure(format!("employee_delete failed: {err}")),
        }
    }

    fn list(&self) -> EmployeeListResponse {
        match self.block_on(self.context.store().load_all()) {
            Ok(employees) => EmployeeListResponse::snapshot(employees, self.messages()),
            Err(err) => EmployeeListResponse::failure(format!("employee_list failed: {err}")),
        }
    }

    fn get(&self, id: i64) -> Option<EmployeeItem> {
        match self.block_on(self.context.store().load_by_id(id)) {
            Ok(employee) => employee.map(|employee| to_employee_item(0, employee)),
            Err(err) => {
                error!("event=employee_get module=ffi status=error employee_id={id} error={err}");
                None
            }
        }
    }

    fn subscribe_list(&self) -> u64 {
        let watch_id = self.next_watch_id.fetch_add(1, Ordering::Relaxed);
        let watch = ListWatch {
            scope: LifecycleScope::new(),
            subscription: Arc::new(tokio::sync::Mutex::new(self.context.store().fetch_all())),
        };
        self.lock_watches().insert(watch_id, watch);
        info!("event=list_subscribe module=ffi status=ok subscription_id={watch_id}");
        watch_id
    }

    fn next_list(&self, watch_id: u64) -> EmployeeListResponse {
        let (token, subscription) = match self.lock_watches().get(&watch_id) {
            Some(watch) => (watch.scope.token(), Arc::clone(&watch.subscription)),
            None => {
                return EmployeeListResponse::failure(format!(
                    "unknown subscription {watch_id}"
                ))
            }
        };

        let next = token.run_until_cancelled(async move {
            let mut subscription = subscription.lock().await;
            let snapshot = subscription.next().await;
            snapshot
        });
        match self.block_on(next) {
            Some(Ok(employees)) => EmployeeListResponse::snapshot(employees, self.messages()),
            Some(Err(err)) => {
                error!(
                    "event=list_next module=ffi status=error subscription_id={watch_id} error={err}"
                );
                EmployeeListResponse::failure(format!("employee_list_next failed: {err}"))
            }
            None => EmployeeListResponse::failure(format!("subscription {watch_id} closed")),
        }
    }

    fn unsubscribe_list(&self, watch_id: u64) -> bool {
        // Dropping the watch cancels its scope and wakes pending waits.
        let removed = self.lock_watches().remove(&watch_id).is_some();
        info!(
            "event=list_unsubscribe module=ffi status={} subscription_id={watch_id}",
            if removed { "ok" } else { "noop" }
        );
        removed
    }

    fn lock_watches(&self) -> MutexGuard<'_, HashMap<u64, ListWatch>> {
        self.watches.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn to_employee_item(position: usize, employee: Employee) -> EmployeeItem {
    EmployeeItem {
        id: employee.id,
        name: employee.name,
        email: employee.email,
        dark_background: RowBackground::for_position(position) == RowBackground::Dark,
    }
}

#[cfg(test)]
mod tests {
    use super::{core_version, init_logging, message_catalog, ping, FfiRuntime};
    use roster_core::db::open_db;
    use roster_core::{AppConfig, Employee};
    use std::time::Duration;
    use tokio::time::timeout;

    fn open_runtime(dir: &tempfile::TempDir) -> FfiRuntime {
        let path = dir.path().join("roster_employees.sqlite3");
        FfiRuntime::open(&AppConfig::with_db_path(path)).unwrap()
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "/tmp/roster-logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn add_rejects_empty_name_with_warning() {
        let dir = tempfile::tempdir().unwrap();
        let runtime = open_runtime(&dir);

        let response = runtime.add(String::new(), "x@y.com".to_string());
        assert!(!response.ok);
        assert_eq!(response.message, message_catalog().empty_field_warning);
        assert_eq!(response.employee_id, None);
        assert!(runtime.list().items.is_empty());
    }

    #[test]
    fn add_update_get_and_delete_flow() {
        let dir = tempfile::tempdir().unwrap();
        let runtime = open_runtime(&dir);

        let created = runtime.add("Bedirhan Saglam".to_string(), "bedirhan@example.com".to_string());
        assert!(created.ok, "{}", created.message);
        let id = created.employee_id.expect("add should return employee_id");

        let listed = runtime.list();
        assert!(listed.ok);
        assert_eq!(listed.items.len(), 1);
        assert!(listed.items[0].dark_background);

        let updated = runtime.update(id, "B. Saglam".to_string(), "b@example.com".to_string());
        assert!(updated.ok, "{}", updated.message);
        let loaded = runtime.get(id).expect("employee should exist");
        assert_eq!(loaded.name, "B. Saglam");
        assert_eq!(loaded.email, "b@example.com");

        let deleted = runtime.delete(id);
        assert!(deleted.ok, "{}", deleted.message);
        assert!(runtime.get(id).is_none());
        assert_eq!(runtime.list().message, message_catalog().no_records_available);
    }

    #[test]
    fn update_and_delete_of_missing_id_are_silent() {
        let dir = tempfile::tempdir().unwrap();
        let runtime = open_runtime(&dir);

        assert!(runtime.update(404, "Ghost".to_string(), "g@example.com".to_string()).ok);
        assert!(runtime.delete(404).ok);
        assert!(runtime.get(404).is_none());
        assert!(runtime.list().items.is_empty());
    }

    #[test]
    fn storage_fault_is_reported_not_thrown() {
        let dir = tempfile::tempdir().unwrap();
        let runtime = open_runtime(&dir);
        let id = runtime
            .add("A".to_string(), "a@x.com".to_string())
            .employee_id
            .unwrap();

        let other = open_db(dir.path().join("roster_employees.sqlite3")).unwrap();
        other.execute_batch("DROP TABLE employees;").unwrap();

        assert!(runtime.get(id).is_none());
        let listed = runtime.list();
        assert!(!listed.ok);
        assert!(listed.message.contains("employee_list failed"));
    }

    #[test]
    fn ffi_writes_reach_core_observers() {
        let dir = tempfile::tempdir().unwrap();
        let runtime = open_runtime(&dir);
        let mut observer = runtime.context.store().fetch_all();
        let first = runtime.block_on(observer.next()).unwrap();
        assert!(first.is_empty());

        let created = runtime.add("A".to_string(), "a@x.com".to_string());
        let id = created.employee_id.unwrap();

        let snapshot = runtime
            .block_on(async { timeout(Duration::from_secs(5), observer.next()).await })
            .expect("ffi insert should notify observers")
            .unwrap();
        assert_eq!(snapshot, vec![Employee::with_id(id, "A", "a@x.com")]);
    }

    #[test]
    fn list_subscription_emits_current_rows_then_changes() {
        let dir = tempfile::tempdir().unwrap();
        let runtime = open_runtime(&dir);

        let subscription = runtime.subscribe_list();
        let first = runtime.next_list(subscription);
        assert!(first.ok);
        assert!(first.items.is_empty());

        runtime.add("A".to_string(), "a@x.com".to_string());
        let second = runtime.next_list(subscription);
        assert!(second.ok);
        assert_eq!(second.items.len(), 1);
        assert_eq!(second.items[0].name, "A");

        assert!(runtime.unsubscribe_list(subscription));
        assert!(!runtime.unsubscribe_list(subscription));
        assert!(!runtime.next_list(subscription).ok);
    }

    #[test]
    fn unsubscribe_wakes_pending_wait() {
        let dir = tempfile::tempdir().unwrap();
        let runtime = open_runtime(&dir);
        let subscription = runtime.subscribe_list();
        assert!(runtime.next_list(subscription).ok);

        let pending = std::thread::scope(|scope| {
            let waiter = scope.spawn(|| runtime.next_list(subscription));
            std::thread::sleep(Duration::from_millis(50));
            assert!(runtime.unsubscribe_list(subscription));
            waiter.join().unwrap()
        });
        assert!(!pending.ok);
    }
}
