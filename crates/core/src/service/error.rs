//! Service error types.

use bursar_shared::AppError;
use bursar_shared::types::{BudgetPlanId, ScheduleId};
use thiserror::Error;

use crate::budget::BudgetError;
use crate::recurrence::RecurrenceError;
use crate::repository::RepositoryError;

/// Errors surfaced by the application services.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Schedule does not exist.
    #[error("schedule not found: {0}")]
    ScheduleNotFound(ScheduleId),

    /// Plan does not exist.
    #[error("budget plan not found: {0}")]
    PlanNotFound(BudgetPlanId),

    /// No plan for the requested year.
    #[error("no budget plan for year {0}")]
    PlanYearNotFound(i32),

    /// Date arithmetic or schedule definition failure.
    #[error(transparent)]
    Recurrence(#[from] RecurrenceError),

    /// Budget lifecycle or calculation failure.
    #[error(transparent)]
    Budget(#[from] BudgetError),

    /// Repository failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        let message = err.to_string();
        match err {
            ServiceError::ScheduleNotFound(_)
            | ServiceError::PlanNotFound(_)
            | ServiceError::PlanYearNotFound(_) => Self::NotFound(message),
            ServiceError::Recurrence(RecurrenceError::DateOutOfRange(_)) => {
                Self::Internal(message)
            }
            ServiceError::Recurrence(_) => Self::Validation(message),
            ServiceError::Budget(BudgetError::AlreadyFinalized) => Self::Conflict(message),
            ServiceError::Budget(_) => Self::BusinessRule(message),
            ServiceError::Repository(_) => Self::Storage(message),
        }
    }
}
