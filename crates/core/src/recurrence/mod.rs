//! Recurring schedule projection.
//!
//! Computes the next occurrence of a schedule after a reference date and the
//! full list of occurrences inside a date window, honoring weekend skipping
//! and excluded dates.

pub mod engine;
pub mod error;
pub mod types;

#[cfg(test)]
mod tests;

pub use engine::{
    MAX_EXCLUSION_ATTEMPTS, MAX_PERIOD_ITERATIONS, MAX_SEEK_ITERATIONS, RecurrenceEngine,
};
pub use error::RecurrenceError;
pub use types::{FrequencyType, Interval, ScheduleDefinition, ScheduledPayment};
