//! Employee use-case service.
//!
//! # Responsibility
//! - Provide validated, synchronous CRUD entry points for FFI callers.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Add/update reject empty name or email before touching storage.
//! - Update/delete of a missing id stay silent no-ops, matching the screen.

use crate::model::employee::{Employee, EmployeeId, EmployeeInput, EmployeeValidationError};
use crate::repo::employee_repo::{EmployeeRepository, RepoError};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for employee use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Form input failed the non-empty check.
    Validation(EmployeeValidationError),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<EmployeeValidationError> for ServiceError {
    fn from(value: EmployeeValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Use-case service wrapper for employee CRUD operations.
pub struct EmployeeService<R: EmployeeRepository> {
    repo: R,
}

impl<R: EmployeeRepository> EmployeeService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates form input and inserts a new employee.
    ///
    /// # Contract
    /// - Returns the storage-assigned id.
    /// - Empty name/email returns `ServiceError::Validation` without writing.
    pub fn add_employee(&self, input: EmployeeInput) -> ServiceResult<EmployeeId> {
        let employee = input.into_new_employee()?;
        let id = self.repo.insert_employee(&employee)?;
        info!("event=employee_add module=service status=ok employee_id={id}");
        Ok(id)
    }

    /// Validates form input and replaces the row with `id`.
    ///
    /// Returns whether a row matched; a missing id is not an error.
    pub fn update_employee(&self, id: EmployeeId, input: EmployeeInput) -> ServiceResult<bool> {
        let employee = input.into_employee(id)?;
        let matched = self.repo.update_employee(&employee)?;
        info!(
            "event=employee_update module=service status={} employee_id={id}",
            outcome_label(matched)
        );
        Ok(matched)
    }

    /// Deletes the row with `id`. Returns whether a row matched.
    pub fn delete_employee(&self, id: EmployeeId) -> ServiceResult<bool> {
        let matched = self.repo.delete_employee(&Employee::key(id))?;
        info!(
            "event=employee_delete module=service status={} employee_id={id}",
            outcome_label(matched)
        );
        Ok(matched)
    }

    /// Lists all employees in insertion order.
    pub fn list_employees(&self) -> ServiceResult<Vec<Employee>> {
        Ok(self.repo.list_employees()?)
    }

    pub fn get_employee(&self, id: EmployeeId) -> ServiceResult<Option<Employee>> {
        Ok(self.repo.get_employee(id)?)
    }
}

fn outcome_label(matched: bool) -> &'static str {
    if matched {
        "ok"
    } else {
        "noop"
    }
}
