//! Employee domain model.
//!
//! # Responsibility
//! - Define the single persisted record shown by the roster screen.
//! - Provide the non-empty input check applied at the UI boundary.
//!
//! # Invariants
//! - `id` is assigned by storage and never changes afterwards.
//! - `UNSET_EMPLOYEE_ID` marks a record that has not been inserted yet.
//! - Storage does not enforce name/email content; callers validate first.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage-assigned identifier of an employee row.
pub type EmployeeId = i64;

/// Sentinel id carried by records that were never persisted.
pub const UNSET_EMPLOYEE_ID: EmployeeId = 0;

/// Canonical employee record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Employee {
    /// Primary key. `UNSET_EMPLOYEE_ID` until the store assigns one.
    pub id: EmployeeId,
    /// Display name.
    pub name: String,
    /// Contact address. Serialized as `email_id` to match the column name.
    #[serde(rename = "email_id")]
    pub email: String,
}

impl Employee {
    /// Creates an unsaved employee with the unset id sentinel.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self::with_id(UNSET_EMPLOYEE_ID, name, email)
    }

    /// Creates an employee referencing an existing row.
    ///
    /// Used by update paths that replace a full row by id.
    pub fn with_id(id: EmployeeId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
        }
    }

    /// Creates a key-only record for delete calls, where other fields are ignored.
    pub fn key(id: EmployeeId) -> Self {
        Self::with_id(id, String::new(), String::new())
    }

    /// Returns whether storage has assigned an id to this record.
    pub fn is_persisted(&self) -> bool {
        self.id != UNSET_EMPLOYEE_ID
    }
}

/// Raw form input collected from the add form or the edit dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeInput {
    pub name: String,
    pub email: String,
}

impl EmployeeInput {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    /// Checks that both fields are non-empty.
    ///
    /// Whitespace-only values pass; only the empty string is rejected.
    pub fn validate(&self) -> Result<(), EmployeeValidationError> {
        if self.name.is_empty() {
            return Err(EmployeeValidationError::EmptyName);
        }
        if self.email.is_empty() {
            return Err(EmployeeValidationError::EmptyEmail);
        }
        Ok(())
    }

    /// Validates and converts into an unsaved record.
    pub fn into_new_employee(self) -> Result<Employee, EmployeeValidationError> {
        self.validate()?;
        Ok(Employee::new(self.name, self.email))
    }

    /// Validates and converts into a full-replacement record for `id`.
    pub fn into_employee(self, id: EmployeeId) -> Result<Employee, EmployeeValidationError> {
        self.validate()?;
        Ok(Employee::with_id(id, self.name, self.email))
    }
}

/// Input rejected at the UI boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmployeeValidationError {
    EmptyName,
    EmptyEmail,
}

impl Display for EmployeeValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "employee name must not be empty"),
            Self::EmptyEmail => write!(f, "employee email must not be empty"),
        }
    }
}

impl Error for EmployeeValidationError {}

#[cfg(test)]
mod tests {
    use super::{Employee, EmployeeInput, EmployeeValidationError, UNSET_EMPLOYEE_ID};

    #[test]
    fn new_employee_carries_unset_id() {
        let employee = Employee::new("Ada", "ada@example.com");
        assert_eq!(employee.id, UNSET_EMPLOYEE_ID);
        assert!(!employee.is_persisted());
    }

    #[test]
    fn validate_reports_first_empty_field() {
        assert_eq!(
            EmployeeInput::new("", "x@y.com").validate(),
            Err(EmployeeValidationError::EmptyName)
        );
        assert_eq!(
            EmployeeInput::new("Ada", "").validate(),
            Err(EmployeeValidationError::EmptyEmail)
        );
        assert_eq!(
            EmployeeInput::new("", "").validate(),
            Err(EmployeeValidationError::EmptyName)
        );
    }

    #[test]
    fn whitespace_only_input_is_accepted() {
        assert!(EmployeeInput::new(" ", " ").validate().is_ok());
    }

    #[test]
    fn into_employee_keeps_target_id() {
        let employee = EmployeeInput::new("Grace", "grace@example.com")
            .into_employee(7)
            .unwrap();
        assert_eq!(employee, Employee::with_id(7, "Grace", "grace@example.com"));
    }

    #[test]
    fn serializes_email_under_column_name() {
        let json = serde_json::to_value(Employee::with_id(3, "Ada", "ada@example.com")).unwrap();
        assert_eq!(json["email_id"], "ada@example.com");
        assert!(json.get("email").is_none());
    }
}
