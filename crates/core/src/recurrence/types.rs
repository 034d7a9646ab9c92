//! Schedule data types.

use std::collections::BTreeSet;

use bursar_shared::types::ScheduleId;
use chrono::{Days, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::RecurrenceError;

/// How often a schedule repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrequencyType {
    /// Every `n` weeks.
    Weekly,
    /// Every `2n` weeks.
    #[serde(alias = "bi-weekly", alias = "biweekly")]
    BiWeekly,
    /// Every `n` months.
    Monthly,
    /// Every `3n` months.
    Quarterly,
    /// Every `n` years.
    Yearly,
}

/// A calendar step between two consecutive occurrences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interval {
    /// A number of whole weeks.
    Weeks(u32),
    /// A number of calendar months.
    Months(u32),
}

impl Interval {
    /// Adds this interval to `date`.
    ///
    /// Month arithmetic clamps to the last day of shorter months
    /// (Jan 31 + 1 month = Feb 29 in a leap year).
    pub fn add_to(self, date: NaiveDate) -> Result<NaiveDate, RecurrenceError> {
        let next = match self {
            Self::Weeks(weeks) => date.checked_add_days(Days::new(u64::from(weeks) * 7)),
            Self::Months(months) => date.checked_add_months(Months::new(months)),
        };
        next.ok_or(RecurrenceError::DateOutOfRange(date))
    }
}

impl FrequencyType {
    /// Returns the interval for a frequency multiplier.
    #[must_use]
    pub const fn interval(self, value: u32) -> Interval {
        match self {
            Self::Weekly => Interval::Weeks(value),
            Self::BiWeekly => Interval::Weeks(value.saturating_mul(2)),
            Self::Monthly => Interval::Months(value),
            Self::Quarterly => Interval::Months(value.saturating_mul(3)),
            Self::Yearly => Interval::Months(value.saturating_mul(12)),
        }
    }

    /// Human readable label, e.g. "Monthly" or "Every 2 weeks".
    #[must_use]
    pub fn label(self, value: u32) -> String {
        match (self, value) {
            (Self::Weekly, 1) => "Weekly".into(),
            (Self::BiWeekly, 1) => "Bi-weekly".into(),
            (Self::Monthly, 1) => "Monthly".into(),
            (Self::Quarterly, 1) => "Quarterly".into(),
            (Self::Yearly, 1) => "Yearly".into(),
            (Self::Weekly, n) => format!("Every {n} weeks"),
            (Self::BiWeekly, n) => format!("Every {} weeks", n.saturating_mul(2)),
            (Self::Monthly, n) => format!("Every {n} months"),
            (Self::Quarterly, n) => format!("Every {} months", n.saturating_mul(3)),
            (Self::Yearly, n) => format!("Every {n} years"),
        }
    }

    /// Returns the canonical name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::BiWeekly => "bi_weekly",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Yearly => "yearly",
        }
    }
}

impl std::fmt::Display for FrequencyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FrequencyType {
    type Err = RecurrenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weekly" => Ok(Self::Weekly),
            "bi_weekly" | "bi-weekly" | "biweekly" => Ok(Self::BiWeekly),
            "monthly" => Ok(Self::Monthly),
            "quarterly" => Ok(Self::Quarterly),
            "yearly" | "annually" => Ok(Self::Yearly),
            _ => Err(RecurrenceError::InvalidFrequency(s.to_string())),
        }
    }
}

fn default_active() -> bool {
    true
}

/// A recurring (or one-time) obligation projected into a calendar.
///
/// Read-only input for the recurrence engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleDefinition {
    /// Schedule ID.
    pub id: ScheduleId,
    /// Display name (vendor, contract, ...).
    pub name: String,
    /// Amount due on each occurrence.
    pub amount: Decimal,
    /// First occurrence.
    pub start_date: NaiveDate,
    /// Inclusive upper bound, if any.
    pub end_date: Option<NaiveDate>,
    /// Frequency type.
    pub frequency_type: FrequencyType,
    /// Frequency multiplier ("every 2 weeks").
    pub frequency_value: u32,
    /// Move occurrences landing on Saturday or Sunday to the next Monday.
    #[serde(default)]
    pub skip_weekends: bool,
    /// Dates that must never be returned as occurrences.
    #[serde(default)]
    pub excluded_dates: BTreeSet<NaiveDate>,
    /// Whether the schedule is active.
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl ScheduleDefinition {
    /// Interval between two consecutive occurrences.
    #[must_use]
    pub const fn interval(&self) -> Interval {
        self.frequency_type.interval(self.frequency_value)
    }

    /// Human readable frequency label.
    #[must_use]
    pub fn frequency_label(&self) -> String {
        self.frequency_type.label(self.frequency_value)
    }

    /// Returns true if `date` is one of the excluded dates.
    #[must_use]
    pub fn is_excluded(&self, date: NaiveDate) -> bool {
        self.excluded_dates.contains(&date)
    }

    /// Checks the definition invariants.
    ///
    /// # Errors
    ///
    /// Returns `RecurrenceError::InvalidFrequencyValue` if the multiplier is 0 and
    /// `RecurrenceError::EndBeforeStart` if the end date precedes the start date.
    pub fn validate(&self) -> Result<(), RecurrenceError> {
        if self.frequency_value == 0 {
            return Err(RecurrenceError::InvalidFrequencyValue(self.frequency_value));
        }

        if let Some(end) = self.end_date
            && end < self.start_date
        {
            return Err(RecurrenceError::EndBeforeStart {
                start: self.start_date,
                end,
            });
        }

        Ok(())
    }
}

/// A concrete occurrence projected for a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledPayment {
    /// Schedule the payment belongs to.
    pub schedule_id: ScheduleId,
    /// Schedule name.
    pub name: String,
    /// Due date.
    pub date: NaiveDate,
    /// Amount due.
    pub amount: Decimal,
}
