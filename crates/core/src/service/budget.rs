//! Budget plan reporting and lifecycle over a repository and a clock.

use std::sync::Arc;

use bursar_shared::types::{BudgetPlanId, ExpenseCategoryId, ProductId, UserId};
use chrono::Datelike;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::error::ServiceError;
use crate::budget::{
    AllocatedCost, BudgetError, BudgetMethod, BudgetPlan, BudgetStatus, ConsolidatedResults,
    FinalValueSource, PlanProgress, ResultEntry, TrendlineData, ValidationFailure,
    assemble_results, consolidate_results, validate_capacity_entry, validate_collection_pattern,
    validate_personnel_allocations,
};
use crate::repository::{BudgetPlanRepository, Clock};

/// Growth figures for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrowthLine {
    /// Product.
    pub product_id: ProductId,
    /// Trendline value for the plan year, when history allows a fit.
    pub projected: Option<Decimal>,
    /// Budgeted value over last year's income, in percent.
    pub growth_percentage: Decimal,
    /// Chart data.
    pub trendline: TrendlineData,
}

/// Capacity figures for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityLine {
    /// Product.
    pub product_id: ProductId,
    /// Headcount with hires prorated.
    pub weighted_headcount: Decimal,
    /// Billable hours.
    pub billable_hours: Decimal,
    /// Budgeted income.
    pub budgeted_income: Decimal,
}

/// Collection figures for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionLine {
    /// Product.
    pub product_id: ProductId,
    /// Collection months observed last year.
    pub last_year_months: Decimal,
    /// Collection months implied by the patterns.
    pub budgeted_months: Decimal,
    /// Blend of last year's and budgeted months.
    pub projected_months: Decimal,
    /// Budgeted income.
    pub budgeted_income: Decimal,
}

/// Reconciled result for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultLine {
    /// Method values, average and final value.
    pub entry: ResultEntry,
    /// Where the final value comes from.
    pub source: Option<FinalValueSource>,
    /// Method with the highest value.
    pub highest: Option<BudgetMethod>,
    /// Method with the lowest value.
    pub lowest: Option<BudgetMethod>,
}

/// Salary projection for one employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonnelLine {
    /// Employee name.
    pub employee_name: String,
    /// Next year's salary.
    pub proposed_salary: Decimal,
    /// Salary split by product.
    pub allocations: Vec<AllocatedCost>,
}

/// Expense projection for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseLine {
    /// Category.
    pub category_id: ExpenseCategoryId,
    /// Category name.
    pub category_name: String,
    /// Next year's total.
    pub proposed_total: Decimal,
    /// Monthly equivalent.
    pub monthly_amount: Decimal,
}

/// A validation problem found in a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanIssue {
    /// Section of the plan.
    pub section: String,
    /// Entry the problem belongs to.
    pub subject: String,
    /// What is wrong.
    pub failure: ValidationFailure,
}

/// Every derived figure of a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanReport {
    /// Plan ID.
    pub plan_id: BudgetPlanId,
    /// Financial year.
    pub year: i32,
    /// Lifecycle status.
    pub status: BudgetStatus,
    /// Whether the plan can still be changed this year.
    pub editable: bool,
    /// Overall completion percentage.
    pub completion_percentage: u8,
    /// Completion per category.
    pub progress: PlanProgress,
    /// Growth method.
    pub growth: Vec<GrowthLine>,
    /// Capacity method.
    pub capacity: Vec<CapacityLine>,
    /// Collection method.
    pub collection: Vec<CollectionLine>,
    /// Reconciled results.
    pub results: Vec<ResultLine>,
    /// Plan-level totals.
    pub consolidated: ConsolidatedResults,
    /// Personnel costs.
    pub personnel: Vec<PersonnelLine>,
    /// Expenses.
    pub expenses: Vec<ExpenseLine>,
    /// Validation problems.
    pub issues: Vec<PlanIssue>,
}

/// Builds plan reports and drives the plan lifecycle.
///
/// Nothing is written back: callers persist what they need.
pub struct BudgetPlanService<R: BudgetPlanRepository, C: Clock> {
    repo: Arc<R>,
    clock: Arc<C>,
}

impl<R: BudgetPlanRepository, C: Clock> BudgetPlanService<R, C> {
    /// Creates a service.
    #[must_use]
    pub fn new(repo: Arc<R>, clock: Arc<C>) -> Self {
        Self { repo, clock }
    }

    fn load(&self, id: BudgetPlanId) -> Result<BudgetPlan, ServiceError> {
        self.repo
            .find_plan(id)?
            .ok_or(ServiceError::PlanNotFound(id))
    }

    /// Report for the plan with `id`.
    ///
    /// # Errors
    ///
    /// Fails when the plan is missing or a calculation fails.
    pub fn report(&self, id: BudgetPlanId) -> Result<PlanReport, ServiceError> {
        let plan = self.load(id)?;
        self.build_report(&plan)
    }

    /// Report for the plan of `year`.
    ///
    /// # Errors
    ///
    /// Fails when there is no plan for the year or a calculation fails.
    pub fn report_for_year(&self, year: i32) -> Result<PlanReport, ServiceError> {
        let plan = self.plan_for_year(year)?;
        self.build_report(&plan)
    }

    /// The stored plan of `year`, without deriving anything.
    ///
    /// # Errors
    ///
    /// Fails when there is no plan for the year.
    pub fn plan_for_year(&self, year: i32) -> Result<BudgetPlan, ServiceError> {
        self.repo
            .find_plan_by_year(year)?
            .ok_or(ServiceError::PlanYearNotFound(year))
    }

    /// Finalizes the plan and returns it for the caller to persist.
    ///
    /// # Errors
    ///
    /// Fails when the plan is missing, already finalized, or locked.
    pub fn finalize(&self, id: BudgetPlanId, by: UserId) -> Result<BudgetPlan, ServiceError> {
        let mut plan = self.load(id)?;
        plan.ensure_editable(self.clock.today().year())?;
        plan.finalize(by, self.clock.now())?;

        info!(plan_id = %plan.id, year = plan.year, finalized_by = %by, "Budget plan finalized");
        Ok(plan)
    }

    /// Derives every figure of `plan`.
    ///
    /// # Errors
    ///
    /// Propagates trendline failures other than missing history.
    pub fn build_report(&self, plan: &BudgetPlan) -> Result<PlanReport, ServiceError> {
        let current_year = self.clock.today().year();

        let growth = plan
            .growth_entries
            .iter()
            .map(|entry| {
                let projected = match entry.calculate_projected_value() {
                    Ok(value) => Some(value),
                    Err(BudgetError::InsufficientHistory { .. }) => None,
                    Err(err) => return Err(err),
                };
                Ok(GrowthLine {
                    product_id: entry.product_id,
                    projected,
                    growth_percentage: entry.growth_percentage(),
                    trendline: entry.trendline_data(plan.year),
                })
            })
            .collect::<Result<Vec<_>, BudgetError>>()?;

        let capacity = plan
            .capacity_entries
            .iter()
            .map(|entry| CapacityLine {
                product_id: entry.product_id,
                weighted_headcount: entry.calculate_weighted_headcount(),
                billable_hours: entry.billable_hours(),
                budgeted_income: entry.calculate_budgeted_income(),
            })
            .collect();

        let collection = plan
            .collection_entries
            .iter()
            .map(|stored| {
                let entry = stored.with_calculated_months();
                CollectionLine {
                    product_id: entry.product_id,
                    last_year_months: entry.last_year_collection_months,
                    budgeted_months: entry.budgeted_collection_months,
                    projected_months: entry.projected_collection_months,
                    budgeted_income: entry.calculate_budgeted_income(),
                }
            })
            .collect();

        let assembled = assemble_results(plan);
        let consolidated = consolidate_results(&assembled);
        let results = assembled
            .into_iter()
            .map(|entry| ResultLine {
                source: entry.final_value_source(),
                highest: entry.highest_method().map(|(method, _)| method),
                lowest: entry.lowest_method().map(|(method, _)| method),
                entry,
            })
            .collect();

        let personnel = plan
            .personnel_entries
            .iter()
            .map(|entry| PersonnelLine {
                employee_name: entry.employee_name.clone(),
                proposed_salary: entry.calculate_proposed_salary(plan.personnel_increase_pct),
                allocations: entry.allocated_costs(plan.personnel_increase_pct),
            })
            .collect();

        let expenses = plan
            .expense_entries
            .iter()
            .map(|entry| ExpenseLine {
                category_id: entry.category_id,
                category_name: entry.category_name.clone(),
                proposed_total: entry.calculate_proposed_total(plan.expense_increase_pct),
                monthly_amount: entry.monthly_amount(plan.expense_increase_pct),
            })
            .collect();

        let progress = plan.progress();
        let report = PlanReport {
            plan_id: plan.id,
            year: plan.year,
            status: plan.status,
            editable: plan.is_editable(current_year),
            completion_percentage: progress.percentage(),
            progress,
            growth,
            capacity,
            collection,
            results,
            consolidated,
            personnel,
            expenses,
            issues: collect_issues(plan),
        };

        debug!(
            plan_id = %plan.id,
            year = plan.year,
            completion = report.completion_percentage,
            issues = report.issues.len(),
            total_final = %report.consolidated.total_final,
            "Built budget plan report"
        );

        Ok(report)
    }
}

fn collect_issues(plan: &BudgetPlan) -> Vec<PlanIssue> {
    let mut issues = Vec::new();
    let mut push = |section: &str, subject: String, result: Result<(), ValidationFailure>| {
        if let Err(failure) = result {
            issues.push(PlanIssue {
                section: section.to_string(),
                subject,
                failure,
            });
        }
    };

    for entry in &plan.capacity_entries {
        push("capacity", entry.product_id.to_string(), validate_capacity_entry(entry));
    }
    for entry in &plan.collection_entries {
        for (index, pattern) in entry.patterns.iter().enumerate() {
            push(
                "collection",
                format!("{} pattern {}", entry.product_id, index + 1),
                validate_collection_pattern(pattern),
            );
        }
    }
    for entry in plan.personnel_entries.iter().filter(|e| e.is_complete()) {
        push(
            "personnel",
            entry.employee_name.clone(),
            validate_personnel_allocations(entry),
        );
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::{
        CapacityEntry, CollectionPattern, ExpenseEntry, GrowthEntry, PersonnelAllocation,
        PersonnelEntry, TrendlineType, ValidationKind,
    };
    use crate::repository::{FixedClock, RepositoryError};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    struct FakePlans(Vec<BudgetPlan>);

    impl BudgetPlanRepository for FakePlans {
        fn find_plan(&self, id: BudgetPlanId) -> Result<Option<BudgetPlan>, RepositoryError> {
            Ok(self.0.iter().find(|p| p.id == id).cloned())
        }

        fn find_plan_by_year(&self, year: i32) -> Result<Option<BudgetPlan>, RepositoryError> {
            Ok(self.0.iter().find(|p| p.year == year).cloned())
        }
    }

    fn plan(year: i32) -> BudgetPlan {
        let product = ProductId::new();
        BudgetPlan {
            id: BudgetPlanId::new(),
            year,
            status: BudgetStatus::Draft,
            expense_increase_pct: dec!(4),
            personnel_increase_pct: dec!(3),
            finalized_at: None,
            finalized_by: None,
            growth_entries: vec![GrowthEntry {
                product_id: product,
                year_minus_3: Some(dec!(100000)),
                year_minus_2: Some(dec!(110000)),
                year_minus_1: Some(dec!(120000)),
                trendline_type: TrendlineType::Linear,
                polynomial_order: None,
                budgeted_value: Some(dec!(130000)),
            }],
            capacity_entries: vec![CapacityEntry {
                product_id: product,
                last_year_available_hours: dec!(1000),
                next_year_headcount: dec!(2),
                next_year_avg_hourly_price: Some(dec!(80)),
                next_year_billable_pct: Some(dec!(75)),
                hires: vec![],
            }],
            collection_entries: vec![],
            result_entries: vec![ResultEntry {
                final_value: Some(dec!(125000)),
                ..ResultEntry::empty(product)
            }],
            personnel_entries: vec![PersonnelEntry {
                employee_name: "J. Lindqvist".to_string(),
                current_salary: dec!(40000),
                increase_percentage: None,
                proposed_salary: None,
                allocations: vec![
                    PersonnelAllocation {
                        product_id: product,
                        percentage: dec!(60),
                    },
                    PersonnelAllocation {
                        product_id: ProductId::new(),
                        percentage: dec!(30),
                    },
                ],
            }],
            expense_entries: vec![ExpenseEntry {
                category_id: ExpenseCategoryId::new(),
                category_name: "Software".to_string(),
                last_year_total: dec!(12000),
                increase_percentage: None,
                manual_amount: None,
                proposed_total: None,
            }],
        }
    }

    fn service(
        plans: Vec<BudgetPlan>,
        today: NaiveDate,
    ) -> BudgetPlanService<FakePlans, FixedClock> {
        BudgetPlanService::new(Arc::new(FakePlans(plans)), Arc::new(FixedClock(today)))
    }

    #[test]
    fn test_report_derives_every_section() {
        let plan = plan(2025);
        let id = plan.id;
        let svc = service(vec![plan], NaiveDate::from_ymd_opt(2024, 11, 1).unwrap());

        let report = svc.report(id).unwrap();

        assert!(report.editable);
        assert_eq!(report.growth[0].projected, Some(dec!(130000)));
        assert_eq!(report.growth[0].growth_percentage, dec!(8.33));
        assert_eq!(report.capacity[0].budgeted_income, dec!(120000));

        let result = &report.results[0];
        assert_eq!(result.entry.average_value, Some(dec!(125000)));
        assert_eq!(result.source, Some(FinalValueSource::Average));
        assert_eq!(result.highest, Some(BudgetMethod::Growth));
        assert_eq!(result.lowest, Some(BudgetMethod::Capacity));
        assert_eq!(report.consolidated.total_final, dec!(125000));

        assert_eq!(report.personnel[0].proposed_salary, dec!(41200));
        let charged: Vec<Decimal> = report.personnel[0]
            .allocations
            .iter()
            .map(|cost| cost.amount)
            .collect();
        assert_eq!(charged, vec![dec!(24720), dec!(12360)]);
        assert_eq!(report.expenses[0].proposed_total, dec!(12480));
        assert_eq!(report.expenses[0].monthly_amount, dec!(1040));

        // growth, capacity, result and personnel complete; expense not => 80%
        assert_eq!(report.completion_percentage, 80);

        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].section, "personnel");
        assert_eq!(report.issues[0].failure.kind, ValidationKind::PercentageSum);
    }

    #[test]
    fn test_plan_for_year_then_finalize() {
        let plan = plan(2025);
        let id = plan.id;
        let svc = service(vec![plan.clone()], NaiveDate::from_ymd_opt(2024, 11, 1).unwrap());

        assert_eq!(svc.plan_for_year(2025).unwrap(), plan);
        assert!(matches!(
            svc.plan_for_year(2024),
            Err(ServiceError::PlanYearNotFound(2024))
        ));

        let finalized = svc.finalize(id, UserId::new()).unwrap();
        assert_eq!(finalized.status, BudgetStatus::Finalized);
    }

    #[test]
    fn test_report_for_missing_year() {
        let svc = service(vec![plan(2025)], NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert!(matches!(
            svc.report_for_year(2026),
            Err(ServiceError::PlanYearNotFound(2026))
        ));
    }

    #[test]
    fn test_growth_without_history_has_no_projection() {
        let mut plan = plan(2025);
        plan.growth_entries[0].year_minus_3 = None;
        plan.growth_entries[0].year_minus_2 = None;
        let svc = service(vec![], NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());

        let report = svc.build_report(&plan).unwrap();
        assert_eq!(report.growth[0].projected, None);
        assert!(report.growth[0].trendline.trend.is_none());
    }

    #[test]
    fn test_collection_pattern_issues_are_reported() {
        let mut plan = plan(2025);
        plan.personnel_entries.clear();
        plan.collection_entries = vec![crate::budget::CollectionEntry {
            product_id: ProductId::new(),
            avg_balance: dec!(10000),
            avg_payment_per_month: dec!(10000),
            end_balance: dec!(10000),
            last_year_collection_months: dec!(1),
            budgeted_collection_months: Decimal::ZERO,
            projected_collection_months: Decimal::ZERO,
            patterns: vec![CollectionPattern::from_months(dec!(100), &[dec!(50)])],
        }];
        let svc = service(vec![], NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());

        let report = svc.build_report(&plan).unwrap();
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].section, "collection");
        // months come from the pattern, not the stored zeros
        assert_eq!(report.collection[0].budgeted_months, dec!(0.5));
        assert_eq!(report.collection[0].projected_months, dec!(0.75));
        assert_eq!(report.collection[0].budgeted_income.round_dp(2), dec!(160000));
        assert_eq!(
            report.issues[0].failure.message,
            "Percentages sum to 50%, must be 100%"
        );
    }

    #[test]
    fn test_finalize_records_user_and_time() {
        let plan = plan(2025);
        let id = plan.id;
        let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let svc = service(vec![plan], today);
        let user = UserId::new();

        let finalized = svc.finalize(id, user).unwrap();
        assert_eq!(finalized.status, BudgetStatus::Finalized);
        assert_eq!(finalized.finalized_by, Some(user));
        assert_eq!(finalized.finalized_at.map(|at| at.date_naive()), Some(today));
    }

    #[test]
    fn test_finalize_past_year_is_locked() {
        let plan = plan(2023);
        let id = plan.id;
        let svc = service(vec![plan], NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());

        assert!(matches!(
            svc.finalize(id, UserId::new()),
            Err(ServiceError::Budget(BudgetError::PlanLocked { year: 2023 }))
        ));
    }
}
