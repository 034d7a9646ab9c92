//! Operating expense projection per category.

use rust_decimal::Decimal;

use super::MONTHS_PER_YEAR;
use super::types::ExpenseEntry;

impl ExpenseEntry {
    /// Next year's total for the category.
    ///
    /// A manual amount is used verbatim. Otherwise last year's total grows by
    /// the category increase, or `default_increase` when none is set.
    #[must_use]
    pub fn calculate_proposed_total(&self, default_increase: Decimal) -> Decimal {
        if let Some(manual) = self.manual_amount {
            return manual;
        }
        let increase = self.increase_percentage.unwrap_or(default_increase);
        (self.last_year_total * (Decimal::ONE + increase / Decimal::ONE_HUNDRED)).round_dp(2)
    }

    /// Monthly equivalent of the proposed total.
    #[must_use]
    pub fn monthly_amount(&self, default_increase: Decimal) -> Decimal {
        (self.calculate_proposed_total(default_increase) / MONTHS_PER_YEAR).round_dp(2)
    }

    /// Returns a copy with `proposed_total` filled in.
    #[must_use]
    pub fn with_proposed_total(&self, default_increase: Decimal) -> Self {
        Self {
            proposed_total: Some(self.calculate_proposed_total(default_increase)),
            ..self.clone()
        }
    }

    /// True once a proposed total is stored.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.proposed_total.is_some()
    }
}
