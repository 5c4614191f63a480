//! Employee repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the five data-access operations over the `employees` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Inserts require the unset id sentinel; the engine assigns the id.
//! - Update/delete on a missing id change nothing and report `false`.
//! - Listing order is insertion order (`id ASC`).

use crate::db::schema::{
    current_user_version, EMPLOYEES_TABLE, REQUIRED_EMPLOYEE_COLUMNS, SCHEMA_VERSION,
};
use crate::db::DbError;
use crate::model::employee::{Employee, EmployeeId, UNSET_EMPLOYEE_ID};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const EMPLOYEE_SELECT_SQL: &str = "SELECT id, name, email_id FROM employees";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for employee persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Insert called with a record that already carries an id.
    IdAlreadyAssigned(EmployeeId),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::IdAlreadyAssigned(id) => {
                write!(f, "cannot insert employee that already has id {id}")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted employee data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Data-access contract for employee rows.
pub trait EmployeeRepository {
    /// Inserts an unsaved record and returns the assigned id.
    fn insert_employee(&self, employee: &Employee) -> RepoResult<EmployeeId>;
    /// Replaces name/email of the row with `employee.id`; `false` if no row matched.
    fn update_employee(&self, employee: &Employee) -> RepoResult<bool>;
    /// Removes the row with `employee.id`; `false` if no row matched.
    fn delete_employee(&self, employee: &Employee) -> RepoResult<bool>;
    /// Returns all rows in insertion order.
    fn list_employees(&self) -> RepoResult<Vec<Employee>>;
    fn get_employee(&self, id: EmployeeId) -> RepoResult<Option<Employee>>;
}

/// SQLite-backed employee repository.
pub struct SqliteEmployeeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEmployeeRepository<'conn> {
    /// Wraps a connection after checking that its schema is usable.
    ///
    /// # Errors
    /// - `UninitializedConnection` when `user_version` is not current.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the table shape
    ///   does not match.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let actual_version = current_user_version(conn)?;
        if actual_version != SCHEMA_VERSION {
            return Err(RepoError::UninitializedConnection {
                expected_version: SCHEMA_VERSION,
                actual_version,
            });
        }

        let columns = table_columns(conn, EMPLOYEES_TABLE)?;
        if columns.is_empty() {
            return Err(RepoError::MissingRequiredTable(EMPLOYEES_TABLE));
        }
        for column in REQUIRED_EMPLOYEE_COLUMNS {
            if !columns.iter().any(|existing| existing == column) {
                return Err(RepoError::MissingRequiredColumn {
                    table: EMPLOYEES_TABLE,
                    column: *column,
                });
            }
        }

        Ok(Self { conn })
    }
}

impl EmployeeRepository for SqliteEmployeeRepository<'_> {
    fn insert_employee(&self, employee: &Employee) -> RepoResult<EmployeeId> {
        if employee.id != UNSET_EMPLOYEE_ID {
            return Err(RepoError::IdAlreadyAssigned(employee.id));
        }

        self.conn.execute(
            "INSERT INTO employees (name, email_id) VALUES (?1, ?2);",
            params![employee.name.as_str(), employee.email.as_str()],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn update_employee(&self, employee: &Employee) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "UPDATE employees
             SET
                name = ?1,
                email_id = ?2
             WHERE id = ?3;",
            params![employee.name.as_str(), employee.email.as_str(), employee.id],
        )?;

        Ok(changed > 0)
    }

    fn delete_employee(&self, employee: &Employee) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM employees WHERE id = ?1;", [employee.id])?;

        Ok(changed > 0)
    }

    fn list_employees(&self) -> RepoResult<Vec<Employee>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EMPLOYEE_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut employees = Vec::new();

        while let Some(row) = rows.next()? {
            employees.push(parse_employee_row(row)?);
        }

        Ok(employees)
    }

    fn get_employee(&self, id: EmployeeId) -> RepoResult<Option<Employee>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EMPLOYEE_SELECT_SQL} WHERE id = ?1;"))?;
        let row = stmt
            .query_row([id], |row| Ok(parse_employee_row(row)))
            .optional()?;

        row.transpose()
    }
}

fn parse_employee_row(row: &Row<'_>) -> RepoResult<Employee> {
    let id: EmployeeId = row.get("id")?;
    if id <= UNSET_EMPLOYEE_ID {
        return Err(RepoError::InvalidData(format!(
            "invalid id value `{id}` in employees.id"
        )));
    }

    Ok(Employee {
        id,
        name: row.get("name")?,
        email: row.get("email_id")?,
    })
}

fn table_columns(conn: &Connection, table: &str) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    let mut columns = Vec::new();
    while let Some(row) = rows.next()? {
        columns.push(row.get::<_, String>("name")?);
    }
    Ok(columns)
}
