//! Application services: engines wired to repositories and a clock.

pub mod budget;
pub mod error;
pub mod schedule;

pub use budget::{
    BudgetPlanService, CapacityLine, CollectionLine, ExpenseLine, GrowthLine, PersonnelLine,
    PlanIssue, PlanReport, ResultLine,
};
pub use error::ServiceError;
pub use schedule::{NextPayment, PaymentProjection, ScheduleService};
