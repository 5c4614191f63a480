//! Headless presentation layer for the single roster screen.
//!
//! # Responsibility
//! - Translate user actions into store operations.
//! - Keep list rendering in sync with the store's observation channel.
//!
//! # Invariants
//! - Screen work never outlives the screen's `LifecycleScope`.
//! - List state changes only in response to store emissions.

pub mod adapter;
pub mod messages;
pub mod scope;
pub mod screen;
