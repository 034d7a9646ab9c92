//! Occurrence calculation for schedule definitions.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use rust_decimal::Decimal;
use tracing::warn;

use super::error::RecurrenceError;
use super::types::{ScheduleDefinition, ScheduledPayment};

/// Iteration cap when seeking the first occurrence after a reference date.
pub const MAX_SEEK_ITERATIONS: usize = 1000;

/// Iteration cap for a single window projection.
pub const MAX_PERIOD_ITERATIONS: usize = 365;

/// Iteration cap when stepping past excluded dates.
pub const MAX_EXCLUSION_ATTEMPTS: usize = 10;

/// Engine for projecting schedule definitions into concrete dates.
///
/// All entry points take the reference date explicitly; the engine never
/// reads the system clock.
pub struct RecurrenceEngine;

impl RecurrenceEngine {
    /// Returns the first occurrence strictly after `reference`.
    ///
    /// When `reference` precedes the start date the start date itself is the
    /// candidate. Weekend skipping and excluded dates are applied to the
    /// candidate; each excluded hit steps one more interval forward, up to
    /// [`MAX_EXCLUSION_ATTEMPTS`] times. If the cap is reached the last
    /// computed date is returned even when it is still excluded.
    ///
    /// Returns `None` for inactive schedules, when `reference` is past the end
    /// date, or when the adjusted candidate lands past the end date.
    pub fn next_occurrence_after(
        schedule: &ScheduleDefinition,
        reference: NaiveDate,
    ) -> Result<Option<NaiveDate>, RecurrenceError> {
        if !schedule.is_active {
            return Ok(None);
        }

        if let Some(end) = schedule.end_date
            && reference > end
        {
            return Ok(None);
        }

        let interval = schedule.interval();

        let mut candidate = if reference < schedule.start_date {
            schedule.start_date
        } else {
            let mut next = schedule.start_date;
            let mut iterations = 0;
            while next <= reference && iterations < MAX_SEEK_ITERATIONS {
                next = interval.add_to(next)?;
                iterations += 1;
            }
            if next <= reference {
                warn!(
                    schedule_id = %schedule.id,
                    %reference,
                    last = %next,
                    "Seek iteration cap reached"
                );
            }
            next
        };

        candidate = Self::adjust_for_weekend(schedule, candidate)?;

        let mut attempts = 0;
        while schedule.is_excluded(candidate) && attempts < MAX_EXCLUSION_ATTEMPTS {
            candidate = interval.add_to(candidate)?;
            candidate = Self::adjust_for_weekend(schedule, candidate)?;
            attempts += 1;
        }
        if schedule.is_excluded(candidate) {
            warn!(
                schedule_id = %schedule.id,
                %candidate,
                "Exclusion attempt cap reached, returning excluded date"
            );
        }

        if let Some(end) = schedule.end_date
            && candidate > end
        {
            return Ok(None);
        }

        Ok(Some(candidate))
    }

    /// Returns every occurrence within `[window_start, window_end]`.
    ///
    /// The cursor starts at `max(start_date, window_start)` and advances one
    /// interval per iteration. Each cursor value is weekend-shifted when
    /// required and dropped when excluded or outside the window; the shift
    /// never feeds back into the cursor. At most [`MAX_PERIOD_ITERATIONS`]
    /// cursor positions are examined.
    pub fn occurrences_in_period(
        schedule: &ScheduleDefinition,
        window_start: NaiveDate,
        window_end: NaiveDate,
    ) -> Result<Vec<NaiveDate>, RecurrenceError> {
        if !schedule.is_active {
            return Ok(Vec::new());
        }

        let interval = schedule.interval();
        let mut occurrences: Vec<NaiveDate> = Vec::new();
        let mut cursor = schedule.start_date.max(window_start);
        let mut iterations = 0;

        while cursor <= window_end && iterations < MAX_PERIOD_ITERATIONS {
            if let Some(end) = schedule.end_date
                && cursor > end
            {
                break;
            }

            let date = Self::adjust_for_weekend(schedule, cursor)?;
            let in_range = date >= window_start
                && date <= window_end
                && schedule.end_date.is_none_or(|end| date <= end);
            let advances = occurrences.last().is_none_or(|last| date > *last);

            if in_range && advances && !schedule.is_excluded(date) {
                occurrences.push(date);
            }

            cursor = interval.add_to(cursor)?;
            iterations += 1;
        }

        if iterations == MAX_PERIOD_ITERATIONS && cursor <= window_end {
            warn!(
                schedule_id = %schedule.id,
                %window_start,
                %window_end,
                "Period iteration cap reached, window truncated"
            );
        }

        Ok(occurrences)
    }

    /// Projects active schedules into payments due within a window, sorted by date.
    pub fn project_payments(
        schedules: &[ScheduleDefinition],
        window_start: NaiveDate,
        window_end: NaiveDate,
    ) -> Result<Vec<ScheduledPayment>, RecurrenceError> {
        let mut payments = Vec::new();

        for schedule in schedules.iter().filter(|s| s.is_active) {
            for date in Self::occurrences_in_period(schedule, window_start, window_end)? {
                payments.push(ScheduledPayment {
                    schedule_id: schedule.id,
                    name: schedule.name.clone(),
                    date,
                    amount: schedule.amount,
                });
            }
        }

        payments.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.name.cmp(&b.name)));
        Ok(payments)
    }

    /// Sums the amounts of projected payments.
    #[must_use]
    pub fn total_amount(payments: &[ScheduledPayment]) -> Decimal {
        payments.iter().map(|p| p.amount).sum()
    }

    /// Returns true if `date` falls on Saturday or Sunday.
    #[must_use]
    pub fn is_weekend(date: NaiveDate) -> bool {
        matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
    }

    /// Advances `date` day by day until it is a weekday.
    pub fn skip_weekend(mut date: NaiveDate) -> Result<NaiveDate, RecurrenceError> {
        while Self::is_weekend(date) {
            date = date
                .checked_add_days(Days::new(1))
                .ok_or(RecurrenceError::DateOutOfRange(date))?;
        }
        Ok(date)
    }

    fn adjust_for_weekend(
        schedule: &ScheduleDefinition,
        date: NaiveDate,
    ) -> Result<NaiveDate, RecurrenceError> {
        if schedule.skip_weekends {
            Self::skip_weekend(date)
        } else {
            Ok(date)
        }
    }
}
