//! Budget plan data types.

use bursar_shared::types::{BudgetPlanId, ExpenseCategoryId, ProductId, UserId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a budget plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    /// Plan is being prepared.
    #[default]
    Draft,
    /// Plan is frozen.
    Finalized,
}

impl BudgetStatus {
    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Finalized => "Finalized",
        }
    }
}

/// The three budgeting methods reconciled per product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetMethod {
    /// Trend of historical income.
    Growth,
    /// Headcount, hours and rates.
    Capacity,
    /// Receivable balance and payment patterns.
    Collection,
}

/// Where a result's final value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalValueSource {
    /// Equals the growth value.
    Growth,
    /// Equals the capacity value.
    Capacity,
    /// Equals the collection value.
    Collection,
    /// Equals the average of the methods.
    Average,
    /// Entered by hand.
    Custom,
}

/// A planned hire within the budget year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HirePlan {
    /// Calendar month the hire starts (1-12).
    pub hire_month: u32,
    /// Number of people hired.
    pub hire_count: Decimal,
}

/// Capacity plan for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityEntry {
    /// Product.
    pub product_id: ProductId,
    /// Available hours per person last year.
    pub last_year_available_hours: Decimal,
    /// Headcount at the start of next year.
    pub next_year_headcount: Decimal,
    /// Average hourly price next year.
    pub next_year_avg_hourly_price: Option<Decimal>,
    /// Billable percentage next year (0-100).
    pub next_year_billable_pct: Option<Decimal>,
    /// Planned hires.
    #[serde(default)]
    pub hires: Vec<HirePlan>,
}

/// A payment distribution pattern for part of the contract mix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionPattern {
    /// Share of contracts following this pattern (0-100).
    pub contract_percentage: Decimal,
    /// Percentage collected in months 1..=12 after invoicing.
    pub monthly_pct: [Decimal; 12],
}

/// Collection plan for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionEntry {
    /// Product.
    pub product_id: ProductId,
    /// Average receivable balance last year.
    pub avg_balance: Decimal,
    /// Average amount collected per month last year.
    pub avg_payment_per_month: Decimal,
    /// Receivable balance at year end.
    pub end_balance: Decimal,
    /// Collection months observed last year.
    pub last_year_collection_months: Decimal,
    /// Collection months implied by the patterns.
    #[serde(default)]
    pub budgeted_collection_months: Decimal,
    /// Blend of last year and budgeted collection months.
    #[serde(default)]
    pub projected_collection_months: Decimal,
    /// Payment distribution patterns.
    #[serde(default)]
    pub patterns: Vec<CollectionPattern>,
}

/// Trendline model used for growth projections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendlineType {
    /// `y = a + b x`.
    #[default]
    Linear,
    /// `y = a + b ln x`.
    Logarithmic,
    /// `y = a0 + a1 x + ... + an x^n`.
    Polynomial,
}

/// Historical income and trend settings for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrowthEntry {
    /// Product.
    pub product_id: ProductId,
    /// Income three years before the plan year.
    pub year_minus_3: Option<Decimal>,
    /// Income two years before the plan year.
    pub year_minus_2: Option<Decimal>,
    /// Income in the year before the plan year.
    pub year_minus_1: Option<Decimal>,
    /// Trendline model.
    #[serde(default)]
    pub trendline_type: TrendlineType,
    /// Polynomial order (polynomial trendlines only).
    pub polynomial_order: Option<u32>,
    /// Value retained for the plan year.
    pub budgeted_value: Option<Decimal>,
}

/// Consolidation of the three methods for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultEntry {
    /// Product.
    pub product_id: ProductId,
    /// Growth method value.
    pub growth_value: Option<Decimal>,
    /// Capacity method value.
    pub capacity_value: Option<Decimal>,
    /// Collection method value.
    pub collection_value: Option<Decimal>,
    /// Stored average of the method values.
    pub average_value: Option<Decimal>,
    /// Value retained for the plan.
    pub final_value: Option<Decimal>,
}

/// Share of an employee's cost charged to a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonnelAllocation {
    /// Product.
    pub product_id: ProductId,
    /// Percentage of the salary (0-100).
    pub percentage: Decimal,
}

/// Salary plan for one employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonnelEntry {
    /// Employee name.
    pub employee_name: String,
    /// Current annual salary.
    pub current_salary: Decimal,
    /// Increase percentage; falls back to the plan's personnel increase.
    pub increase_percentage: Option<Decimal>,
    /// Salary entered by hand, overriding the increase.
    pub proposed_salary: Option<Decimal>,
    /// Cost allocations across products.
    #[serde(default)]
    pub allocations: Vec<PersonnelAllocation>,
}

/// Expense plan for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseEntry {
    /// Expense category.
    pub category_id: ExpenseCategoryId,
    /// Category name.
    pub category_name: String,
    /// Total spent last year.
    pub last_year_total: Decimal,
    /// Increase percentage; falls back to the plan's expense increase.
    pub increase_percentage: Option<Decimal>,
    /// Amount entered by hand, used verbatim.
    pub manual_amount: Option<Decimal>,
    /// Stored proposed total.
    pub proposed_total: Option<Decimal>,
}

/// A financial year budget with all of its entries materialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetPlan {
    /// Plan ID.
    pub id: BudgetPlanId,
    /// Financial year.
    pub year: i32,
    /// Lifecycle status.
    #[serde(default)]
    pub status: BudgetStatus,
    /// Default increase applied to expense categories.
    #[serde(default)]
    pub expense_increase_pct: Decimal,
    /// Default increase applied to salaries.
    #[serde(default)]
    pub personnel_increase_pct: Decimal,
    /// When the plan was finalized.
    pub finalized_at: Option<DateTime<Utc>>,
    /// Who finalized the plan.
    pub finalized_by: Option<UserId>,
    /// Growth entries.
    #[serde(default)]
    pub growth_entries: Vec<GrowthEntry>,
    /// Capacity entries.
    #[serde(default)]
    pub capacity_entries: Vec<CapacityEntry>,
    /// Collection entries.
    #[serde(default)]
    pub collection_entries: Vec<CollectionEntry>,
    /// Result entries.
    #[serde(default)]
    pub result_entries: Vec<ResultEntry>,
    /// Personnel entries.
    #[serde(default)]
    pub personnel_entries: Vec<PersonnelEntry>,
    /// Expense entries.
    #[serde(default)]
    pub expense_entries: Vec<ExpenseEntry>,
}
