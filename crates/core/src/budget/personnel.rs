//! Personnel costs and their split across products.

use bursar_shared::types::ProductId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::allocation::split_by_percentages;
use super::types::PersonnelEntry;

/// Amount of a salary charged to one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocatedCost {
    /// Product.
    pub product_id: ProductId,
    /// Percentage of the salary.
    pub percentage: Decimal,
    /// Amount charged.
    pub amount: Decimal,
}

impl PersonnelEntry {
    /// Increase applied to this employee, falling back to `default_pct`.
    #[must_use]
    pub fn effective_increase(&self, default_pct: Decimal) -> Decimal {
        self.increase_percentage.unwrap_or(default_pct)
    }

    /// Next year's salary.
    ///
    /// A hand-entered `proposed_salary` wins; otherwise the current salary
    /// grows by the effective increase, rounded to cents.
    #[must_use]
    pub fn calculate_proposed_salary(&self, default_pct: Decimal) -> Decimal {
        if let Some(salary) = self.proposed_salary {
            return salary;
        }
        let factor = Decimal::ONE + self.effective_increase(default_pct) / Decimal::ONE_HUNDRED;
        (self.current_salary * factor).round_dp(2)
    }

    /// Sum of the allocation percentages.
    #[must_use]
    pub fn total_allocation_pct(&self) -> Decimal {
        self.allocations.iter().map(|a| a.percentage).sum()
    }

    /// Splits the proposed salary across products to the cent.
    ///
    /// Allocations short of 100% leave the rest of the salary uncharged.
    #[must_use]
    pub fn allocated_costs(&self, default_pct: Decimal) -> Vec<AllocatedCost> {
        let percentages: Vec<Decimal> = self.allocations.iter().map(|a| a.percentage).collect();
        let amounts =
            split_by_percentages(self.calculate_proposed_salary(default_pct), &percentages, 2);

        self.allocations
            .iter()
            .zip(amounts)
            .map(|(allocation, amount)| AllocatedCost {
                product_id: allocation.product_id,
                percentage: allocation.percentage,
                amount,
            })
            .collect()
    }

    /// True once at least one allocation exists.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.allocations.is_empty()
    }
}
