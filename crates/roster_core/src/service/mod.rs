//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep FFI layers decoupled from storage details.

pub mod employee_service;
