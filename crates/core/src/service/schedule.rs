//! Schedule queries over a repository and a clock.

use std::sync::Arc;

use bursar_shared::types::ScheduleId;
use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::error::ServiceError;
use crate::recurrence::{RecurrenceEngine, RecurrenceError, ScheduleDefinition, ScheduledPayment};
use crate::repository::{Clock, ScheduleRepository};

/// Payments due inside a window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentProjection {
    /// First day of the window.
    pub window_start: NaiveDate,
    /// Last day of the window, inclusive.
    pub window_end: NaiveDate,
    /// Payments sorted by date then name.
    pub payments: Vec<ScheduledPayment>,
    /// Sum of payment amounts.
    pub total: Decimal,
}

/// Next due date of one schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextPayment {
    /// Schedule ID.
    pub schedule_id: ScheduleId,
    /// Schedule name.
    pub name: String,
    /// Human readable frequency.
    pub frequency: String,
    /// Next due date, if any remain.
    pub next_date: Option<NaiveDate>,
}

/// Answers schedule questions relative to the clock's today.
pub struct ScheduleService<R: ScheduleRepository, C: Clock> {
    repo: Arc<R>,
    clock: Arc<C>,
    upcoming_days: u32,
}

impl<R: ScheduleRepository, C: Clock> ScheduleService<R, C> {
    /// Creates a service looking `upcoming_days` ahead for upcoming payments.
    #[must_use]
    pub fn new(repo: Arc<R>, clock: Arc<C>, upcoming_days: u32) -> Self {
        Self {
            repo,
            clock,
            upcoming_days,
        }
    }

    fn load(&self, id: ScheduleId) -> Result<ScheduleDefinition, ServiceError> {
        let schedule = self
            .repo
            .find_schedule(id)?
            .ok_or(ServiceError::ScheduleNotFound(id))?;
        schedule.validate()?;
        Ok(schedule)
    }

    /// Next due date strictly after today.
    ///
    /// # Errors
    ///
    /// Fails when the schedule is missing or invalid.
    pub fn next_payment(&self, id: ScheduleId) -> Result<NextPayment, ServiceError> {
        let schedule = self.load(id)?;
        let today = self.clock.today();
        let next_date = RecurrenceEngine::next_occurrence_after(&schedule, today)?;

        debug!(schedule_id = %id, %today, ?next_date, "Computed next payment date");

        Ok(NextPayment {
            schedule_id: schedule.id,
            frequency: schedule.frequency_label(),
            name: schedule.name,
            next_date,
        })
    }

    /// Occurrences of one schedule inside `[window_start, window_end]`.
    ///
    /// # Errors
    ///
    /// Fails when the schedule is missing or invalid.
    pub fn occurrences(
        &self,
        id: ScheduleId,
        window_start: NaiveDate,
        window_end: NaiveDate,
    ) -> Result<Vec<NaiveDate>, ServiceError> {
        let schedule = self.load(id)?;
        Ok(RecurrenceEngine::occurrences_in_period(
            &schedule,
            window_start,
            window_end,
        )?)
    }

    /// Payments of all active schedules inside a window.
    ///
    /// Invalid schedules are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Fails on repository errors or date overflow.
    pub fn payments_between(
        &self,
        window_start: NaiveDate,
        window_end: NaiveDate,
    ) -> Result<PaymentProjection, ServiceError> {
        let schedules: Vec<ScheduleDefinition> = self
            .repo
            .list_active_schedules()?
            .into_iter()
            .filter(|schedule| match schedule.validate() {
                Ok(()) => true,
                Err(err) => {
                    warn!(schedule_id = %schedule.id, error = %err, "Skipping invalid schedule");
                    false
                }
            })
            .collect();

        let payments = RecurrenceEngine::project_payments(&schedules, window_start, window_end)?;
        let total = RecurrenceEngine::total_amount(&payments);

        debug!(
            schedules = schedules.len(),
            payments = payments.len(),
            %total,
            "Projected payments"
        );

        Ok(PaymentProjection {
            window_start,
            window_end,
            payments,
            total,
        })
    }

    /// Payments due from today through the configured number of days ahead.
    ///
    /// # Errors
    ///
    /// Fails on repository errors or date overflow.
    pub fn upcoming_payments(&self) -> Result<PaymentProjection, ServiceError> {
        let today = self.clock.today();
        let window_end = today
            .checked_add_days(Days::new(u64::from(self.upcoming_days)))
            .ok_or(RecurrenceError::DateOutOfRange(today))?;
        self.payments_between(today, window_end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recurrence::FrequencyType;
    use crate::repository::{FixedClock, RepositoryError};
    use rust_decimal_macros::dec;
    use std::collections::BTreeSet;

    struct FakeSchedules(Vec<ScheduleDefinition>);

    impl ScheduleRepository for FakeSchedules {
        fn find_schedule(
            &self,
            id: ScheduleId,
        ) -> Result<Option<ScheduleDefinition>, RepositoryError> {
            Ok(self.0.iter().find(|s| s.id == id).cloned())
        }

        fn list_active_schedules(&self) -> Result<Vec<ScheduleDefinition>, RepositoryError> {
            Ok(self.0.iter().filter(|s| s.is_active).cloned().collect())
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn schedule(name: &str, start: NaiveDate, frequency_type: FrequencyType) -> ScheduleDefinition {
        ScheduleDefinition {
            id: ScheduleId::new(),
            name: name.to_string(),
            amount: dec!(250),
            start_date: start,
            end_date: None,
            frequency_type,
            frequency_value: 1,
            skip_weekends: false,
            excluded_dates: BTreeSet::new(),
            is_active: true,
        }
    }

    fn service(
        schedules: Vec<ScheduleDefinition>,
        today: NaiveDate,
    ) -> ScheduleService<FakeSchedules, FixedClock> {
        ScheduleService::new(
            Arc::new(FakeSchedules(schedules)),
            Arc::new(FixedClock(today)),
            30,
        )
    }

    #[test]
    fn test_next_payment_uses_clock() {
        let rent = schedule("Rent", date(2024, 1, 15), FrequencyType::Monthly);
        let id = rent.id;
        let svc = service(vec![rent], date(2024, 1, 20));

        let next = svc.next_payment(id).unwrap();
        assert_eq!(next.next_date, Some(date(2024, 2, 15)));
        assert_eq!(next.frequency, "Monthly");
    }

    #[test]
    fn test_missing_schedule() {
        let svc = service(vec![], date(2024, 1, 1));
        let id = ScheduleId::new();
        assert!(matches!(
            svc.next_payment(id),
            Err(ServiceError::ScheduleNotFound(missing)) if missing == id
        ));
    }

    #[test]
    fn test_invalid_schedule_rejected() {
        let mut broken = schedule("Broken", date(2024, 1, 1), FrequencyType::Weekly);
        broken.frequency_value = 0;
        let id = broken.id;
        let svc = service(vec![broken], date(2024, 1, 1));

        assert!(matches!(
            svc.occurrences(id, date(2024, 1, 1), date(2024, 2, 1)),
            Err(ServiceError::Recurrence(RecurrenceError::InvalidFrequencyValue(0)))
        ));
    }

    #[test]
    fn test_upcoming_payments_window_and_total() {
        let rent = schedule("Rent", date(2024, 1, 15), FrequencyType::Monthly);
        let mut cleaning = schedule("Cleaning", date(2024, 1, 1), FrequencyType::Weekly);
        cleaning.amount = dec!(40);
        let mut broken = schedule("Broken", date(2024, 1, 1), FrequencyType::Weekly);
        broken.frequency_value = 0;

        let svc = service(vec![rent, cleaning, broken], date(2024, 1, 1));
        let projection = svc.upcoming_payments().unwrap();

        assert_eq!(projection.window_start, date(2024, 1, 1));
        assert_eq!(projection.window_end, date(2024, 1, 31));
        let due: Vec<(NaiveDate, &str)> = projection
            .payments
            .iter()
            .map(|p| (p.date, p.name.as_str()))
            .collect();
        assert_eq!(
            due,
            vec![
                (date(2024, 1, 1), "Cleaning"),
                (date(2024, 1, 8), "Cleaning"),
                (date(2024, 1, 15), "Cleaning"),
                (date(2024, 1, 15), "Rent"),
                (date(2024, 1, 22), "Cleaning"),
                (date(2024, 1, 29), "Cleaning"),
            ]
        );
        assert_eq!(projection.total, dec!(450));
    }
}
