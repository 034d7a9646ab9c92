//! Plan lifecycle and progress tracking.

use bursar_shared::types::UserId;
use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::error::BudgetError;
use super::types::{
    BudgetPlan, BudgetStatus, CapacityEntry, CollectionEntry, ExpenseEntry, GrowthEntry,
    PersonnelEntry, ResultEntry,
};

/// Completion of one entry category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryProgress {
    /// Complete entries.
    pub complete: usize,
    /// All entries.
    pub total: usize,
}

impl CategoryProgress {
    fn of<T>(entries: &[T], is_complete: impl Fn(&T) -> bool) -> Self {
        Self {
            complete: entries.iter().filter(|e| is_complete(e)).count(),
            total: entries.len(),
        }
    }

    /// Completed fraction, or `None` for an empty category.
    #[must_use]
    pub fn ratio(self) -> Option<Decimal> {
        (self.total > 0).then(|| Decimal::from(self.complete) / Decimal::from(self.total))
    }
}

/// Per-category completion of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanProgress {
    /// Growth entries with a budgeted value.
    pub growth: CategoryProgress,
    /// Capacity entries with price and billable percentage.
    pub capacity: CategoryProgress,
    /// Collection entries with at least one pattern.
    pub collection: CategoryProgress,
    /// Result entries with a final value.
    pub result: CategoryProgress,
    /// Personnel entries with at least one allocation.
    pub personnel: CategoryProgress,
    /// Expense entries with a proposed total.
    pub expense: CategoryProgress,
}

impl PlanProgress {
    fn categories(&self) -> [CategoryProgress; 6] {
        [
            self.growth,
            self.capacity,
            self.collection,
            self.result,
            self.personnel,
            self.expense,
        ]
    }

    /// Mean completion over non-empty categories as a whole percentage.
    ///
    /// Rounded half away from zero; zero when every category is empty.
    #[must_use]
    pub fn percentage(&self) -> u8 {
        let ratios: Vec<Decimal> = self
            .categories()
            .into_iter()
            .filter_map(CategoryProgress::ratio)
            .collect();
        if ratios.is_empty() {
            return 0;
        }

        let mean = ratios.iter().copied().sum::<Decimal>() / Decimal::from(ratios.len());
        let pct = (mean * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        pct.to_u8().map_or(0, |p| p.min(100))
    }
}

impl BudgetPlan {
    /// Whether the plan accepts changes in `current_year`.
    #[must_use]
    pub fn is_editable(&self, current_year: i32) -> bool {
        self.status == BudgetStatus::Draft && current_year <= self.year
    }

    /// Fails unless the plan accepts changes in `current_year`.
    ///
    /// # Errors
    ///
    /// `AlreadyFinalized` for finalized plans, `PlanLocked` for past years.
    pub fn ensure_editable(&self, current_year: i32) -> Result<(), BudgetError> {
        if self.status == BudgetStatus::Finalized {
            return Err(BudgetError::AlreadyFinalized);
        }
        if current_year > self.year {
            return Err(BudgetError::PlanLocked { year: self.year });
        }
        Ok(())
    }

    /// Finalizes the plan, recording who and when. One-way.
    ///
    /// # Errors
    ///
    /// `AlreadyFinalized` when called twice.
    pub fn finalize(&mut self, by: UserId, at: DateTime<Utc>) -> Result<(), BudgetError> {
        if self.status == BudgetStatus::Finalized {
            return Err(BudgetError::AlreadyFinalized);
        }
        self.status = BudgetStatus::Finalized;
        self.finalized_by = Some(by);
        self.finalized_at = Some(at);
        Ok(())
    }

    /// Completion per entry category.
    #[must_use]
    pub fn progress(&self) -> PlanProgress {
        PlanProgress {
            growth: CategoryProgress::of(&self.growth_entries, GrowthEntry::is_complete),
            capacity: CategoryProgress::of(&self.capacity_entries, CapacityEntry::is_complete),
            collection: CategoryProgress::of(&self.collection_entries, CollectionEntry::is_complete),
            result: CategoryProgress::of(&self.result_entries, ResultEntry::is_complete),
            personnel: CategoryProgress::of(&self.personnel_entries, PersonnelEntry::is_complete),
            expense: CategoryProgress::of(&self.expense_entries, ExpenseEntry::is_complete),
        }
    }

    /// Overall completion percentage in `0..=100`.
    #[must_use]
    pub fn completion_percentage(&self) -> u8 {
        self.progress().percentage()
    }
}
