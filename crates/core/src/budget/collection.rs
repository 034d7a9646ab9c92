//! Collection method: income implied by receivable turnover.

use rust_decimal::Decimal;

use super::MONTHS_PER_YEAR;
use super::types::{CollectionEntry, CollectionPattern};

impl CollectionPattern {
    /// Builds a pattern from leading monthly percentages; the rest are zero.
    #[must_use]
    pub fn from_months(contract_percentage: Decimal, leading: &[Decimal]) -> Self {
        let mut monthly_pct = [Decimal::ZERO; 12];
        for (slot, pct) in monthly_pct.iter_mut().zip(leading) {
            *slot = *pct;
        }
        Self {
            contract_percentage,
            monthly_pct,
        }
    }

    /// Percentage collected in `month` (1-based); `None` outside 1-12.
    #[must_use]
    pub fn month_pct(&self, month: usize) -> Option<Decimal> {
        month
            .checked_sub(1)
            .and_then(|index| self.monthly_pct.get(index))
            .copied()
    }

    /// Sets the percentage for `month` (1-based). Returns false outside 1-12.
    pub fn set_month_pct(&mut self, month: usize, pct: Decimal) -> bool {
        match month.checked_sub(1).and_then(|i| self.monthly_pct.get_mut(i)) {
            Some(slot) => {
                *slot = pct;
                true
            }
            None => false,
        }
    }

    /// Sum of the twelve monthly percentages.
    #[must_use]
    pub fn total_pct(&self) -> Decimal {
        self.monthly_pct.iter().copied().sum()
    }

    /// Percentage-weighted average collection lag in months.
    ///
    /// `sum(month x pct / 100)` over months with a positive percentage.
    #[must_use]
    pub fn calculate_collection_months(&self) -> Decimal {
        (1u32..)
            .zip(self.monthly_pct.iter())
            .filter(|(_, pct)| **pct > Decimal::ZERO)
            .map(|(month, pct)| Decimal::from(month) * *pct / Decimal::ONE_HUNDRED)
            .sum()
    }
}

impl CollectionEntry {
    /// Last year's collection months: average balance over monthly payments.
    ///
    /// Zero when no payments were recorded.
    #[must_use]
    pub fn calculate_last_year_collection_months(&self) -> Decimal {
        if self.avg_payment_per_month.is_zero() {
            return Decimal::ZERO;
        }
        self.avg_balance / self.avg_payment_per_month
    }

    /// Contract-mix weighted blend of the pattern collection months.
    #[must_use]
    pub fn calculate_budgeted_collection_months(&self) -> Decimal {
        self.patterns
            .iter()
            .map(|p| p.calculate_collection_months() * p.contract_percentage / Decimal::ONE_HUNDRED)
            .sum()
    }

    /// Mean of the stored last year and budgeted collection months.
    ///
    /// Reads the stored fields; call [`Self::with_calculated_months`] first
    /// when the patterns changed since they were stored.
    #[must_use]
    pub fn calculate_projected_collection_months(&self) -> Decimal {
        (self.last_year_collection_months + self.budgeted_collection_months) / Decimal::TWO
    }

    /// Annual income implied by the year-end balance turning over at the
    /// stored projected pace: `end_balance / projected months x 12`.
    ///
    /// Zero when the projected months are zero.
    #[must_use]
    pub fn calculate_budgeted_income(&self) -> Decimal {
        if self.projected_collection_months.is_zero() {
            return Decimal::ZERO;
        }
        self.end_balance / self.projected_collection_months * MONTHS_PER_YEAR
    }

    /// Returns a copy with budgeted months derived from the patterns and
    /// projected months derived from those.
    #[must_use]
    pub fn with_calculated_months(&self) -> Self {
        let mut refreshed = Self {
            budgeted_collection_months: self.calculate_budgeted_collection_months(),
            ..self.clone()
        };
        refreshed.projected_collection_months = refreshed.calculate_projected_collection_months();
        refreshed
    }

    /// True once at least one pattern is configured.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.patterns.is_empty()
    }
}
