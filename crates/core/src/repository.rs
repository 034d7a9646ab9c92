//! Persistence and time seams consumed by the services.
//!
//! Storage crates implement the repository traits; engines never see them.

use bursar_shared::types::{BudgetPlanId, ScheduleId};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use thiserror::Error;

use crate::budget::BudgetPlan;
use crate::recurrence::ScheduleDefinition;

/// Repository failures.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Backing store could not be read.
    #[error("repository unavailable: {0}")]
    Unavailable(String),

    /// Stored data could not be decoded.
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

/// Read access to recurring payment schedules.
pub trait ScheduleRepository: Send + Sync {
    /// Find a schedule by ID.
    fn find_schedule(&self, id: ScheduleId) -> Result<Option<ScheduleDefinition>, RepositoryError>;

    /// All schedules flagged active, in a stable order.
    fn list_active_schedules(&self) -> Result<Vec<ScheduleDefinition>, RepositoryError>;
}

/// Read access to materialized budget plans.
pub trait BudgetPlanRepository: Send + Sync {
    /// Find a plan by ID.
    fn find_plan(&self, id: BudgetPlanId) -> Result<Option<BudgetPlan>, RepositoryError>;

    /// Find the plan for a financial year.
    fn find_plan_by_year(&self, year: i32) -> Result<Option<BudgetPlan>, RepositoryError>;
}

/// Source of the current date and time.
pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;

    /// Today's date.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Wall clock in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at midnight UTC of one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0.and_time(NaiveTime::MIN).and_utc()
    }

    fn today(&self) -> NaiveDate {
        self.0
    }
}
