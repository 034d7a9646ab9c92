//! Growth method: trend of historical income.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::BudgetError;
use super::trendline::Trendline;
use super::types::GrowthEntry;

/// Position of the plan year on the trendline axis (history sits at 1..=3).
const PLAN_YEAR_X: i64 = 4;

/// Chart-ready data for a growth entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendlineData {
    /// Year labels, oldest first, ending with the plan year.
    pub labels: Vec<String>,
    /// Recorded income per year; the plan year slot is always `None`.
    pub actual: Vec<Option<Decimal>>,
    /// Fitted values per year, when enough history exists.
    pub trend: Option<Vec<Decimal>>,
    /// Trendline value for the plan year.
    pub projected: Option<Decimal>,
    /// Value retained for the plan year.
    pub budgeted: Option<Decimal>,
}

impl GrowthEntry {
    /// Non-null historical values as `(x, value)` with x = 1, 2, 3 for
    /// year-3, year-2 and year-1.
    #[must_use]
    pub fn historical_points(&self) -> Vec<(Decimal, Decimal)> {
        [self.year_minus_3, self.year_minus_2, self.year_minus_1]
            .into_iter()
            .zip(1i64..)
            .filter_map(|(value, x)| value.map(|v| (Decimal::from(x), v)))
            .collect()
    }

    /// Fits the configured trendline through the historical values.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::InsufficientHistory` with fewer than two values.
    pub fn fit_trendline(&self) -> Result<Trendline, BudgetError> {
        Trendline::fit(
            self.trendline_type,
            self.polynomial_order,
            &self.historical_points(),
        )
    }

    /// Trendline value for the plan year.
    pub fn calculate_projected_value(&self) -> Result<Decimal, BudgetError> {
        Ok(self
            .fit_trendline()?
            .evaluate(Decimal::from(PLAN_YEAR_X))
            .round_dp(2))
    }

    /// Assembles labels, actuals and trend values for the four-year window
    /// ending at `plan_year`.
    #[must_use]
    pub fn trendline_data(&self, plan_year: i32) -> TrendlineData {
        let labels = (0..4).rev().map(|back| (plan_year - back).to_string()).collect();
        let actual = vec![self.year_minus_3, self.year_minus_2, self.year_minus_1, None];

        let fitted = self.fit_trendline().ok();
        let trend = fitted.as_ref().map(|line| {
            (1..=PLAN_YEAR_X)
                .map(|x| line.evaluate(Decimal::from(x)).round_dp(2))
                .collect::<Vec<_>>()
        });
        let projected = trend.as_ref().and_then(|values| values.last().copied());

        TrendlineData {
            labels,
            actual,
            trend,
            projected,
            budgeted: self.budgeted_value,
        }
    }

    /// Growth of the budgeted value over last year's income, in percent.
    ///
    /// Zero when either value is missing or last year's income is zero.
    #[must_use]
    pub fn growth_percentage(&self) -> Decimal {
        match (self.budgeted_value, self.year_minus_1) {
            (Some(budgeted), Some(last)) if !last.is_zero() => {
                ((budgeted - last) / last * Decimal::ONE_HUNDRED).round_dp(2)
            }
            _ => Decimal::ZERO,
        }
    }

    /// True once a budgeted value is set.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.budgeted_value.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::types::TrendlineType;
    use bursar_shared::types::ProductId;
    use rust_decimal_macros::dec;

    fn entry(
        y3: Option<Decimal>,
        y2: Option<Decimal>,
        y1: Option<Decimal>,
        kind: TrendlineType,
    ) -> GrowthEntry {
        GrowthEntry {
            product_id: ProductId::new(),
            year_minus_3: y3,
            year_minus_2: y2,
            year_minus_1: y1,
            trendline_type: kind,
            polynomial_order: None,
            budgeted_value: None,
        }
    }

    #[test]
    fn test_historical_points_skip_missing_years() {
        let growth = entry(Some(dec!(100)), None, Some(dec!(140)), TrendlineType::Linear);
        assert_eq!(
            growth.historical_points(),
            vec![(dec!(1), dec!(100)), (dec!(3), dec!(140))]
        );
    }

    #[test]
    fn test_projected_value_linear() {
        let growth = entry(
            Some(dec!(100000)),
            Some(dec!(110000)),
            Some(dec!(120000)),
            TrendlineType::Linear,
        );
        assert_eq!(growth.calculate_projected_value().unwrap(), dec!(130000));
    }

    #[test]
    fn test_projected_value_with_gap() {
        let growth = entry(Some(dec!(100)), None, Some(dec!(140)), TrendlineType::Linear);
        assert_eq!(growth.calculate_projected_value().unwrap(), dec!(160));
    }

    #[test]
    fn test_projected_value_requires_history() {
        let growth = entry(None, None, Some(dec!(140)), TrendlineType::Linear);
        assert_eq!(
            growth.calculate_projected_value(),
            Err(BudgetError::InsufficientHistory { points: 1 })
        );
    }

    #[test]
    fn test_trendline_data_assembly() {
        let mut growth = entry(
            Some(dec!(100)),
            Some(dec!(120)),
            Some(dec!(140)),
            TrendlineType::Linear,
        );
        growth.budgeted_value = Some(dec!(155));

        let data = growth.trendline_data(2025);

        assert_eq!(data.labels, vec!["2022", "2023", "2024", "2025"]);
        assert_eq!(
            data.actual,
            vec![Some(dec!(100)), Some(dec!(120)), Some(dec!(140)), None]
        );
        assert_eq!(
            data.trend,
            Some(vec![dec!(100), dec!(120), dec!(140), dec!(160)])
        );
        assert_eq!(data.projected, Some(dec!(160)));
        assert_eq!(data.budgeted, Some(dec!(155)));
    }

    #[test]
    fn test_trendline_data_without_enough_history() {
        let growth = entry(None, None, None, TrendlineType::Polynomial);
        let data = growth.trendline_data(2025);

        assert_eq!(data.labels.len(), 4);
        assert!(data.trend.is_none());
        assert!(data.projected.is_none());
    }

    #[test]
    fn test_growth_percentage() {
        let mut growth = entry(None, None, Some(dec!(200)), TrendlineType::Linear);
        assert_eq!(growth.growth_percentage(), Decimal::ZERO);

        growth.budgeted_value = Some(dec!(230));
        assert_eq!(growth.growth_percentage(), dec!(15));
        assert!(growth.is_complete());

        growth.year_minus_1 = Some(Decimal::ZERO);
        assert_eq!(growth.growth_percentage(), Decimal::ZERO);
    }
}
