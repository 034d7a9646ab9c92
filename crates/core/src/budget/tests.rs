//! Property-based tests for budget calculations.

use bursar_shared::types::{BudgetPlanId, ExpenseCategoryId, ProductId};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::allocation::split_by_percentages;
use super::types::{
    BudgetPlan, BudgetStatus, ExpenseEntry, GrowthEntry, ResultEntry, TrendlineType,
};
use super::validation::validate_percentage_sum;

fn cents(value: i64) -> Decimal {
    Decimal::new(value, 2)
}

fn optional_amount() -> impl Strategy<Value = Option<Decimal>> {
    prop::option::of((0i64..100_000_000).prop_map(cents))
}

fn growth(budgeted: Option<Decimal>) -> GrowthEntry {
    GrowthEntry {
        product_id: ProductId::new(),
        year_minus_3: None,
        year_minus_2: None,
        year_minus_1: None,
        trendline_type: TrendlineType::Linear,
        polynomial_order: None,
        budgeted_value: budgeted,
    }
}

fn expense(proposed: Option<Decimal>) -> ExpenseEntry {
    ExpenseEntry {
        category_id: ExpenseCategoryId::new(),
        category_name: "Generated".to_string(),
        last_year_total: Decimal::ONE_HUNDRED,
        increase_percentage: None,
        manual_amount: None,
        proposed_total: proposed,
    }
}

prop_compose! {
    fn plan_strategy()(
        growth_flags in prop::collection::vec(any::<bool>(), 0..6),
        expense_flags in prop::collection::vec(any::<bool>(), 0..6),
        result_flags in prop::collection::vec(any::<bool>(), 0..6),
    ) -> BudgetPlan {
        BudgetPlan {
            id: BudgetPlanId::new(),
            year: 2025,
            status: BudgetStatus::Draft,
            expense_increase_pct: Decimal::ZERO,
            personnel_increase_pct: Decimal::ZERO,
            finalized_at: None,
            finalized_by: None,
            growth_entries: growth_flags
                .into_iter()
                .map(|done| growth(done.then_some(Decimal::ONE)))
                .collect(),
            capacity_entries: vec![],
            collection_entries: vec![],
            result_entries: result_flags
                .into_iter()
                .map(|done| ResultEntry {
                    final_value: done.then_some(Decimal::ONE),
                    ..ResultEntry::empty(ProductId::new())
                })
                .collect(),
            personnel_entries: vec![],
            expense_entries: expense_flags
                .into_iter()
                .map(|done| expense(done.then_some(Decimal::ONE)))
                .collect(),
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The average covers exactly the present method values.
    #[test]
    fn prop_average_of_present_values(
        growth in optional_amount(),
        capacity in optional_amount(),
        collection in optional_amount(),
    ) {
        let entry = ResultEntry {
            growth_value: growth,
            capacity_value: capacity,
            collection_value: collection,
            ..ResultEntry::empty(ProductId::new())
        };

        let present: Vec<Decimal> = [growth, capacity, collection].into_iter().flatten().collect();
        let average = entry.calculate_average();

        if present.is_empty() {
            prop_assert_eq!(average, Decimal::ZERO);
        } else {
            let expected = present.iter().copied().sum::<Decimal>() / Decimal::from(present.len());
            prop_assert_eq!(average, expected);

            let min = present.iter().copied().min().unwrap_or_default();
            let max = present.iter().copied().max().unwrap_or_default();
            prop_assert!(average >= min && average <= max);
        }
    }

    /// Highest and lowest methods bracket every present value.
    #[test]
    fn prop_method_extremes_bracket_values(
        growth in optional_amount(),
        capacity in optional_amount(),
        collection in optional_amount(),
    ) {
        let entry = ResultEntry {
            growth_value: growth,
            capacity_value: capacity,
            collection_value: collection,
            ..ResultEntry::empty(ProductId::new())
        };

        match (entry.highest_method(), entry.lowest_method()) {
            (Some((_, high)), Some((_, low))) => {
                for (_, value) in entry.method_values() {
                    prop_assert!(low <= value && value <= high);
                }
            }
            (None, None) => prop_assert!(entry.method_values().is_empty()),
            _ => prop_assert!(false, "extremes must both exist or both be absent"),
        }
    }

    /// Completion stays within 0..=100 and is zero only for an empty plan
    /// or one where nothing is complete.
    #[test]
    fn prop_completion_bounds(plan in plan_strategy()) {
        let pct = plan.completion_percentage();
        prop_assert!(pct <= 100);

        let entries = plan.growth_entries.len() + plan.expense_entries.len() + plan.result_entries.len();
        if entries == 0 {
            prop_assert_eq!(pct, 0);
        }

        let any_complete = plan.growth_entries.iter().any(GrowthEntry::is_complete)
            || plan.expense_entries.iter().any(ExpenseEntry::is_complete)
            || plan.result_entries.iter().any(ResultEntry::is_complete);
        if any_complete {
            prop_assert!(pct > 0);
        } else {
            prop_assert_eq!(pct, 0);
        }
    }

    /// Allocations always add back up to the rounded total.
    #[test]
    fn prop_allocation_preserves_total(
        total in (0i64..1_000_000_000).prop_map(cents),
        weights in prop::collection::vec(1u32..1000, 1..8),
    ) {
        let sum: u32 = weights.iter().sum();
        let mut percentages: Vec<Decimal> = weights
            .iter()
            .map(|w| (Decimal::from(*w) * Decimal::ONE_HUNDRED / Decimal::from(sum)).round_dp(4))
            .collect();
        // Absorb rounding drift in the last share so percentages total 100.
        let drift = Decimal::ONE_HUNDRED - percentages.iter().copied().sum::<Decimal>();
        if let Some(last) = percentages.last_mut() {
            *last += drift;
        }

        let shares = split_by_percentages(total, &percentages, 2);
        prop_assert_eq!(shares.len(), percentages.len());
        prop_assert_eq!(shares.iter().copied().sum::<Decimal>(), total);
        prop_assert!(validate_percentage_sum(percentages).is_ok());
    }

    /// Any split stays within one cent of each exact share and adds up to
    /// the charged portion of the amount.
    #[test]
    fn prop_split_matches_charged_portion(
        total in (0i64..1_000_000_000).prop_map(cents),
        percentages in prop::collection::vec((0i64..15_000).prop_map(cents), 1..8),
    ) {
        let shares = split_by_percentages(total, &percentages, 2);
        let exact: Vec<Decimal> = percentages
            .iter()
            .map(|pct| total * *pct / Decimal::ONE_HUNDRED)
            .collect();
        let charged = exact.iter().copied().sum::<Decimal>().round_dp(2);

        prop_assert_eq!(shares.iter().copied().sum::<Decimal>(), charged);
        for (share, exact) in shares.iter().zip(&exact) {
            prop_assert!((*share - *exact).abs() < cents(1));
        }
    }
}
