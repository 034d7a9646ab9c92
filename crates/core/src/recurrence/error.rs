//! Recurrence error types.

use chrono::NaiveDate;
use thiserror::Error;

/// Recurrence-related errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecurrenceError {
    /// Frequency type outside the recognized set.
    #[error("Invalid frequency type: {0}")]
    InvalidFrequency(String),

    /// Interval arithmetic left the supported calendar range.
    #[error("Date arithmetic overflowed from {0}")]
    DateOutOfRange(NaiveDate),

    /// Frequency multiplier must be at least 1.
    #[error("Frequency value must be at least 1, got {0}")]
    InvalidFrequencyValue(u32),

    /// End date precedes start date.
    #[error("End date {end} is before start date {start}")]
    EndBeforeStart {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
    },
}
