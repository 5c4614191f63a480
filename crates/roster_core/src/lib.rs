//! Core domain logic for the employee roster.
//! This crate is the single source of truth for persistence and screen rules.

pub mod context;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;
pub mod ui;

pub use context::{AppConfig, AppContext};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::employee::{
    Employee, EmployeeId, EmployeeInput, EmployeeValidationError, UNSET_EMPLOYEE_ID,
};
pub use repo::employee_repo::{
    EmployeeRepository, RepoError, RepoResult, SqliteEmployeeRepository,
};
pub use service::employee_service::{EmployeeService, ServiceError, ServiceResult};
pub use store::events::StoreEvent;
pub use store::subscription::{EmployeeListSubscription, EmployeeSubscription};
pub use store::{EmployeeStore, StoreError, StoreResult};
pub use ui::adapter::{EmployeeListAdapter, EmployeeRow, RowAction, RowBackground};
pub use ui::messages::{MessageCatalog, Notice};
pub use ui::scope::{CancelToken, LifecycleScope};
pub use ui::screen::{
    ActionOutcome, DeletePrompt, EditDialog, EmployeeScreen, ScreenError, ScreenPhase,
    ScreenResult, ScreenState,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
