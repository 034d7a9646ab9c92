//! Validation rules for budget entries.
//!
//! Validation failures are ordinary outcomes of incremental data entry, so
//! they are returned as values carrying a kind and a readable message.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::types::{CapacityEntry, CollectionPattern, PersonnelEntry};

/// Absolute tolerance when comparing a percentage sum against 100.
pub const PERCENTAGE_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Category of a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationKind {
    /// Nothing entered yet (percentages sum to zero).
    EmptyPercentages,
    /// Percentages entered but not summing to 100.
    PercentageSum,
    /// A value lies outside its allowed range.
    OutOfRange,
    /// A required field is missing.
    RequiredField,
}

/// A failed validation check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{message}")]
pub struct ValidationFailure {
    /// Failure category.
    pub kind: ValidationKind,
    /// Readable detail.
    pub message: String,
}

impl ValidationFailure {
    fn new(kind: ValidationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Checks that percentages sum to 100 within [`PERCENTAGE_TOLERANCE`].
///
/// # Errors
///
/// Returns `EmptyPercentages` when the sum is exactly zero and
/// `PercentageSum` (reporting the actual sum) otherwise.
pub fn validate_percentage_sum<I>(percentages: I) -> Result<(), ValidationFailure>
where
    I: IntoIterator<Item = Decimal>,
{
    let sum: Decimal = percentages.into_iter().sum();

    if (sum - Decimal::ONE_HUNDRED).abs() <= PERCENTAGE_TOLERANCE {
        return Ok(());
    }

    if sum.is_zero() {
        return Err(ValidationFailure::new(
            ValidationKind::EmptyPercentages,
            "Percentages must sum to 100%",
        ));
    }

    Err(ValidationFailure::new(
        ValidationKind::PercentageSum,
        format!("Percentages sum to {}%, must be 100%", sum.normalize()),
    ))
}

fn check_percentage(name: &str, value: Decimal) -> Result<(), ValidationFailure> {
    if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
        return Err(ValidationFailure::new(
            ValidationKind::OutOfRange,
            format!("{name} must be between 0 and 100, got {}", value.normalize()),
        ));
    }
    Ok(())
}

/// Validates a collection pattern: each month in 0-100, months summing to 100.
pub fn validate_collection_pattern(pattern: &CollectionPattern) -> Result<(), ValidationFailure> {
    check_percentage("Contract percentage", pattern.contract_percentage)?;
    for (index, pct) in pattern.monthly_pct.iter().enumerate() {
        check_percentage(&format!("Month {} percentage", index + 1), *pct)?;
    }
    validate_percentage_sum(pattern.monthly_pct.iter().copied())
}

/// Validates that an employee's allocations cover exactly 100% of the salary.
pub fn validate_personnel_allocations(entry: &PersonnelEntry) -> Result<(), ValidationFailure> {
    for allocation in &entry.allocations {
        check_percentage("Allocation percentage", allocation.percentage)?;
    }
    validate_percentage_sum(entry.allocations.iter().map(|a| a.percentage))
}

/// Validates hire months and the billable percentage of a capacity entry.
pub fn validate_capacity_entry(entry: &CapacityEntry) -> Result<(), ValidationFailure> {
    if let Some(pct) = entry.next_year_billable_pct {
        check_percentage("Billable percentage", pct)?;
    }

    for hire in &entry.hires {
        if !(1..=12).contains(&hire.hire_month) {
            return Err(ValidationFailure::new(
                ValidationKind::OutOfRange,
                format!("Hire month must be between 1 and 12, got {}", hire.hire_month),
            ));
        }
        if hire.hire_count < Decimal::ZERO {
            return Err(ValidationFailure::new(
                ValidationKind::OutOfRange,
                "Hire count cannot be negative",
            ));
        }
    }

    Ok(())
}

/// Ensures a required value is present.
pub fn require<T>(field: &str, value: Option<T>) -> Result<T, ValidationFailure> {
    value.ok_or_else(|| {
        ValidationFailure::new(ValidationKind::RequiredField, format!("{field} is required"))
    })
}
