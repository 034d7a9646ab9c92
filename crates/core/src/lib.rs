//! Core business logic for Bursar.
//!
//! Pure calculation with no storage or transport dependencies. Callers hand
//! the engines plain data and get deterministic results back.
//!
//! # Modules
//!
//! - `recurrence` - Next-occurrence and period projection for payment schedules
//! - `budget` - Annual budget methods, reconciliation and completion tracking
//! - `repository` - Read-side seams implemented by storage crates
//! - `service` - Engines wired to repositories and a clock

pub mod budget;
pub mod recurrence;
pub mod repository;
pub mod service;
