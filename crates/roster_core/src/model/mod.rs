//! Domain model for the employee roster.
//!
//! # Responsibility
//! - Define the record persisted by the store and rendered by the screen.
//!
//! # Invariants
//! - Every persisted record is identified by a storage-assigned `EmployeeId`.
//! - Deletion removes the row; there is no tombstone state.

pub mod employee;
