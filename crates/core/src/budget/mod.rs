//! Annual budget planning: growth, capacity and collection methods,
//! reconciliation, personnel and expense projections.

use rust_decimal::Decimal;

pub mod allocation;
pub mod capacity;
pub mod collection;
pub mod error;
pub mod expense;
pub mod growth;
pub mod personnel;
pub mod plan;
pub mod result;
pub mod trendline;
pub mod types;
pub mod validation;

#[cfg(test)]
mod tests;

pub(crate) const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

pub use allocation::split_by_percentages;
pub use error::BudgetError;
pub use growth::TrendlineData;
pub use personnel::AllocatedCost;
pub use plan::{CategoryProgress, PlanProgress};
pub use result::{
    ConsolidatedResults, ProductShare, assemble_results, consolidate_results, share_of_total,
};
pub use trendline::{DEFAULT_POLYNOMIAL_ORDER, MIN_TRENDLINE_POINTS, Trendline};
pub use types::{
    BudgetMethod, BudgetPlan, BudgetStatus, CapacityEntry, CollectionEntry, CollectionPattern,
    ExpenseEntry, FinalValueSource, GrowthEntry, HirePlan, PersonnelAllocation, PersonnelEntry,
    ResultEntry, TrendlineType,
};
pub use validation::{
    PERCENTAGE_TOLERANCE, ValidationFailure, ValidationKind, require, validate_capacity_entry,
    validate_collection_pattern, validate_personnel_allocations, validate_percentage_sum,
};
