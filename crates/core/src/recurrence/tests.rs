//! Property-based tests for the recurrence engine.

use std::collections::BTreeSet;

use bursar_shared::types::ScheduleId;
use chrono::{Days, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::engine::RecurrenceEngine;
use super::types::{FrequencyType, ScheduleDefinition};

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
}

fn offset(days: u64) -> NaiveDate {
    base_date().checked_add_days(Days::new(days)).unwrap()
}

fn frequency_strategy() -> impl Strategy<Value = FrequencyType> {
    prop_oneof![
        Just(FrequencyType::Weekly),
        Just(FrequencyType::BiWeekly),
        Just(FrequencyType::Monthly),
        Just(FrequencyType::Quarterly),
        Just(FrequencyType::Yearly),
    ]
}

prop_compose! {
    fn schedule_strategy()(
        start in 0u64..2000,
        frequency_type in frequency_strategy(),
        frequency_value in 1u32..4,
        skip_weekends in any::<bool>(),
        exclusions in prop::collection::btree_set(0u64..3000, 0..8),
    ) -> ScheduleDefinition {
        ScheduleDefinition {
            id: ScheduleId::new(),
            name: "Generated".to_string(),
            amount: Decimal::ONE_HUNDRED,
            start_date: offset(start),
            end_date: None,
            frequency_type,
            frequency_value,
            skip_weekends,
            excluded_dates: exclusions.into_iter().map(offset).collect::<BTreeSet<_>>(),
            is_active: true,
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Repeated calls with the same inputs return the same occurrence.
    #[test]
    fn prop_next_occurrence_is_deterministic(
        schedule in schedule_strategy(),
        reference in 0u64..3000,
    ) {
        let reference = offset(reference);
        let first = RecurrenceEngine::next_occurrence_after(&schedule, reference).unwrap();
        let second = RecurrenceEngine::next_occurrence_after(&schedule, reference).unwrap();
        prop_assert_eq!(first, second);
    }

    /// The next occurrence lies after the reference, or on the start date when
    /// the reference precedes it.
    #[test]
    fn prop_next_occurrence_is_monotonic(
        mut schedule in schedule_strategy(),
        reference in 0u64..3000,
    ) {
        schedule.skip_weekends = false;
        schedule.excluded_dates.clear();
        let reference = offset(reference);

        let next = RecurrenceEngine::next_occurrence_after(&schedule, reference)
            .unwrap()
            .expect("open-ended active schedule always has a next occurrence");

        if reference < schedule.start_date {
            prop_assert_eq!(next, schedule.start_date);
        } else {
            prop_assert!(next > reference);
        }
    }

    /// Window output stays inside the window, strictly increasing.
    #[test]
    fn prop_occurrences_within_window_and_increasing(
        schedule in schedule_strategy(),
        window_start in 0u64..3000,
        window_len in 0u64..800,
    ) {
        let start = offset(window_start);
        let end = offset(window_start + window_len);

        let dates = RecurrenceEngine::occurrences_in_period(&schedule, start, end).unwrap();

        for date in &dates {
            prop_assert!(*date >= start && *date <= end);
            prop_assert!(!schedule.is_excluded(*date));
        }
        for pair in dates.windows(2) {
            prop_assert!(pair[0] < pair[1]);
        }
    }

    /// With weekend skipping enabled no occurrence lands on a weekend.
    #[test]
    fn prop_weekend_skip_never_returns_weekend(
        mut schedule in schedule_strategy(),
        reference in 0u64..3000,
        window_len in 0u64..400,
    ) {
        schedule.skip_weekends = true;
        let reference = offset(reference);

        if let Some(next) = RecurrenceEngine::next_occurrence_after(&schedule, reference).unwrap() {
            prop_assert!(!RecurrenceEngine::is_weekend(next));
        }

        let window_end = reference.checked_add_days(Days::new(window_len)).unwrap();
        let dates =
            RecurrenceEngine::occurrences_in_period(&schedule, reference, window_end).unwrap();
        for date in dates {
            prop_assert!(!RecurrenceEngine::is_weekend(date));
        }
    }
}
