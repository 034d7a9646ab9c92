//! Reconciliation of the three budgeting methods per product.

use std::collections::{BTreeMap, HashMap};

use bursar_shared::types::ProductId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::{BudgetMethod, BudgetPlan, FinalValueSource, ResultEntry};

impl ResultEntry {
    /// Creates an entry with no values.
    #[must_use]
    pub const fn empty(product_id: ProductId) -> Self {
        Self {
            product_id,
            growth_value: None,
            capacity_value: None,
            collection_value: None,
            average_value: None,
            final_value: None,
        }
    }

    /// Present method values, in growth, capacity, collection order.
    #[must_use]
    pub fn method_values(&self) -> Vec<(BudgetMethod, Decimal)> {
        [
            (BudgetMethod::Growth, self.growth_value),
            (BudgetMethod::Capacity, self.capacity_value),
            (BudgetMethod::Collection, self.collection_value),
        ]
        .into_iter()
        .filter_map(|(method, value)| value.map(|v| (method, v)))
        .collect()
    }

    /// Mean of the present method values; zero when none are present.
    #[must_use]
    pub fn calculate_average(&self) -> Decimal {
        let values = self.method_values();
        if values.is_empty() {
            return Decimal::ZERO;
        }
        let sum: Decimal = values.iter().map(|(_, v)| *v).sum();
        sum / Decimal::from(values.len())
    }

    /// Identifies where the final value comes from.
    ///
    /// Checks growth, capacity, collection, then average for an exact match;
    /// anything else is custom. `None` when no final value is set.
    #[must_use]
    pub fn final_value_source(&self) -> Option<FinalValueSource> {
        let chosen = self.final_value?;
        let candidates = [
            (FinalValueSource::Growth, self.growth_value),
            (FinalValueSource::Capacity, self.capacity_value),
            (FinalValueSource::Collection, self.collection_value),
            (FinalValueSource::Average, Some(self.calculate_average())),
        ];

        Some(
            candidates
                .into_iter()
                .find(|(_, value)| *value == Some(chosen))
                .map_or(FinalValueSource::Custom, |(source, _)| source),
        )
    }

    /// Method with the highest value; ties keep the earlier method.
    #[must_use]
    pub fn highest_method(&self) -> Option<(BudgetMethod, Decimal)> {
        self.method_values()
            .into_iter()
            .reduce(|best, next| if next.1 > best.1 { next } else { best })
    }

    /// Method with the lowest value; ties keep the earlier method.
    #[must_use]
    pub fn lowest_method(&self) -> Option<(BudgetMethod, Decimal)> {
        self.method_values()
            .into_iter()
            .reduce(|best, next| if next.1 < best.1 { next } else { best })
    }

    /// Returns a copy with the stored average refreshed.
    #[must_use]
    pub fn with_calculated_average(&self) -> Self {
        Self {
            average_value: Some(self.calculate_average()),
            ..self.clone()
        }
    }

    /// True once a final value is chosen.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.final_value.is_some()
    }
}

/// Builds one result entry per product from the method entries of a plan.
///
/// Growth values come from `budgeted_value`, capacity and collection values
/// from the computed budgeted income, with collection months re-derived from
/// the patterns. Final values already chosen on the plan
/// are kept. Entries are ordered by product ID.
#[must_use]
pub fn assemble_results(plan: &BudgetPlan) -> Vec<ResultEntry> {
    let mut results: BTreeMap<ProductId, ResultEntry> = BTreeMap::new();

    for growth in &plan.growth_entries {
        results
            .entry(growth.product_id)
            .or_insert_with(|| ResultEntry::empty(growth.product_id))
            .growth_value = growth.budgeted_value;
    }
    for capacity in &plan.capacity_entries {
        results
            .entry(capacity.product_id)
            .or_insert_with(|| ResultEntry::empty(capacity.product_id))
            .capacity_value = Some(capacity.calculate_budgeted_income());
    }
    for collection in &plan.collection_entries {
        let income = collection.with_calculated_months().calculate_budgeted_income();
        results
            .entry(collection.product_id)
            .or_insert_with(|| ResultEntry::empty(collection.product_id))
            .collection_value = Some(income);
    }

    let chosen: HashMap<ProductId, Option<Decimal>> = plan
        .result_entries
        .iter()
        .map(|r| (r.product_id, r.final_value))
        .collect();

    results
        .into_values()
        .map(|mut entry| {
            entry.final_value = chosen.get(&entry.product_id).copied().flatten();
            entry.with_calculated_average()
        })
        .collect()
}

/// Share of one product in the consolidated final total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductShare {
    /// Product.
    pub product_id: ProductId,
    /// Final value (zero when not chosen).
    pub final_value: Decimal,
    /// Percentage of the final total.
    pub share_percent: Decimal,
}

/// Plan-level totals across all result entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsolidatedResults {
    /// Sum of growth values.
    pub total_growth: Decimal,
    /// Sum of capacity values.
    pub total_capacity: Decimal,
    /// Sum of collection values.
    pub total_collection: Decimal,
    /// Sum of per-product averages.
    pub total_average: Decimal,
    /// Sum of final values.
    pub total_final: Decimal,
    /// Percentage of entries with a final value.
    pub finalized_percent: Decimal,
    /// Per-product share of the final total.
    pub shares: Vec<ProductShare>,
}

/// `amount / total x 100`, rounded to 2 places; zero when `total` is zero.
#[must_use]
pub fn share_of_total(amount: Decimal, total: Decimal) -> Decimal {
    if total.is_zero() {
        return Decimal::ZERO;
    }
    (amount / total * Decimal::ONE_HUNDRED).round_dp(2)
}

/// Consolidates result entries into plan totals.
#[must_use]
pub fn consolidate_results(results: &[ResultEntry]) -> ConsolidatedResults {
    let sum = |f: fn(&ResultEntry) -> Option<Decimal>| -> Decimal {
        results.iter().filter_map(f).sum()
    };

    let total_final = sum(|r| r.final_value);
    let finalized = results.iter().filter(|r| r.is_complete()).count();

    let shares = results
        .iter()
        .map(|r| {
            let final_value = r.final_value.unwrap_or(Decimal::ZERO);
            ProductShare {
                product_id: r.product_id,
                final_value,
                share_percent: share_of_total(final_value, total_final),
            }
        })
        .collect();

    ConsolidatedResults {
        total_growth: sum(|r| r.growth_value),
        total_capacity: sum(|r| r.capacity_value),
        total_collection: sum(|r| r.collection_value),
        total_average: results.iter().map(ResultEntry::calculate_average).sum(),
        total_final,
        finalized_percent: share_of_total(Decimal::from(finalized), Decimal::from(results.len())),
        shares,
    }
}
