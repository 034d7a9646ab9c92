//! Budget error types.

use thiserror::Error;

/// Budget-related errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BudgetError {
    /// Plan has already been finalized.
    #[error("Budget plan is already finalized")]
    AlreadyFinalized,

    /// Plan can no longer be modified.
    #[error("Budget plan for {year} is locked and cannot be modified")]
    PlanLocked {
        /// Plan year.
        year: i32,
    },

    /// Not enough historical points to fit a trendline.
    #[error("Trendline requires at least 2 historical values, got {points}")]
    InsufficientHistory {
        /// Number of non-null historical values.
        points: usize,
    },

    /// Trendline normal equations have no unique solution.
    #[error("Trendline system is singular")]
    SingularTrendline,
}
