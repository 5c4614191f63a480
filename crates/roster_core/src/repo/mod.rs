//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the data-access contract used by the store and services.
//! - Isolate SQLite query details from orchestration code.
//!
//! # Invariants
//! - Repositories never validate name/email content; that happens at the UI
//!   boundary.
//! - Repository constructors reject connections with an unexpected schema.

pub mod employee_repo;
