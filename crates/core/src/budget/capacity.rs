//! Capacity method: income from headcount, hours and rates.

use rust_decimal::Decimal;

use super::MONTHS_PER_YEAR;
use super::types::{CapacityEntry, HirePlan};

impl HirePlan {
    /// Share of the year the hire is on payroll, counting the hire month itself.
    ///
    /// `(12 - hire_month + 1) / 12`; months outside 1-12 are clamped.
    #[must_use]
    pub fn annualization_factor(&self) -> Decimal {
        let month = self.hire_month.clamp(1, 12);
        Decimal::from(12 - month + 1) / MONTHS_PER_YEAR
    }

    /// Full-year equivalent headcount contributed by this hire.
    #[must_use]
    pub fn weighted_count(&self) -> Decimal {
        self.hire_count * self.annualization_factor()
    }
}

impl CapacityEntry {
    /// Headcount at start of year plus hires prorated by months worked.
    #[must_use]
    pub fn calculate_weighted_headcount(&self) -> Decimal {
        self.next_year_headcount
            + self
                .hires
                .iter()
                .map(HirePlan::weighted_count)
                .sum::<Decimal>()
    }

    /// Billable hours available next year across the weighted headcount.
    #[must_use]
    pub fn billable_hours(&self) -> Decimal {
        let billable_pct = self.next_year_billable_pct.unwrap_or(Decimal::ZERO);
        self.last_year_available_hours * self.calculate_weighted_headcount() * billable_pct
            / Decimal::ONE_HUNDRED
    }

    /// `hours x weighted headcount x hourly price x billable %`.
    ///
    /// Missing price or billable percentage count as zero.
    #[must_use]
    pub fn calculate_budgeted_income(&self) -> Decimal {
        let price = self.next_year_avg_hourly_price.unwrap_or(Decimal::ZERO);
        self.billable_hours() * price
    }

    /// True once both the hourly price and billable percentage are set.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.next_year_avg_hourly_price.is_some() && self.next_year_billable_pct.is_some()
    }
}
