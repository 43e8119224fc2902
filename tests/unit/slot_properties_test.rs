//! Property tests for slot classification and haversine distance

use chrono::NaiveTime;
use proptest::prelude::*;

use study_space_api::models::SlotStatus;
use study_space_api::services::availability::{classify_slot, get_slot_status};
use study_space_api::services::distance::haversine_km;

const DAY_SECS: u32 = 86_400;
const WINDOW_SECS: u32 = 20 * 60;

fn time(secs: u32) -> NaiveTime {
    NaiveTime::from_num_seconds_from_midnight_opt(secs, 0).expect("seconds within a day")
}

/// A regular slot as (start, end) seconds with start <= end
fn regular_slot() -> impl Strategy<Value = (u32, u32)> {
    (0..DAY_SECS).prop_flat_map(|start| (Just(start), start..DAY_SECS))
}

/// A midnight-spanning slot as (start, end) seconds with end < start
fn spanning_slot() -> impl Strategy<Value = (u32, u32)> {
    (1..DAY_SECS).prop_flat_map(|start| (Just(start), 0..start))
}

proptest! {
    #[test]
    fn contained_regular_slot_is_available(
        (start, end, now) in regular_slot()
            .prop_flat_map(|(start, end)| (Just(start), Just(end), start..=end))
    ) {
        prop_assert_eq!(
            classify_slot(time(now), time(start), time(end)),
            SlotStatus::Available
        );
    }

    #[test]
    fn regular_slot_starting_soon_is_upcoming(
        start in WINDOW_SECS..DAY_SECS,
        lead in 1..WINDOW_SECS,
        length in 0u32..7_200,
    ) {
        let end = (start + length).min(DAY_SECS - 1);
        prop_assert_eq!(
            classify_slot(time(start - lead), time(start), time(end)),
            SlotStatus::Upcoming
        );
    }

    #[test]
    fn regular_slot_far_ahead_is_unavailable(
        start in WINDOW_SECS..DAY_SECS,
        lead_extra in 0u32..DAY_SECS,
    ) {
        let now = start.saturating_sub(WINDOW_SECS + lead_extra);
        prop_assume!(start - now >= WINDOW_SECS);
        prop_assert_eq!(
            classify_slot(time(now), time(start), time(start)),
            SlotStatus::Unavailable
        );
    }

    #[test]
    fn regular_slot_after_end_is_passed(
        (start, end, now) in regular_slot()
            .prop_filter("needs room after end", |(_, end)| *end < DAY_SECS - 1)
            .prop_flat_map(|(start, end)| (Just(start), Just(end), (end + 1)..DAY_SECS))
    ) {
        prop_assert_eq!(
            classify_slot(time(now), time(start), time(end)),
            SlotStatus::Passed
        );
    }

    #[test]
    fn spanning_slot_never_passes((start, end) in spanning_slot(), now in 0..DAY_SECS) {
        prop_assert_ne!(
            classify_slot(time(now), time(start), time(end)),
            SlotStatus::Passed
        );
    }

    #[test]
    fn spanning_slot_is_available_across_midnight(
        (start, end) in spanning_slot(),
        after_start in 0u32..DAY_SECS,
        before_end in 0u32..DAY_SECS,
    ) {
        let late = start + after_start % (DAY_SECS - start);
        let early = before_end % (end + 1);

        prop_assert_eq!(classify_slot(time(late), time(start), time(end)), SlotStatus::Available);
        prop_assert_eq!(classify_slot(time(early), time(start), time(end)), SlotStatus::Available);
    }

    #[test]
    fn string_and_time_classification_agree(
        (start, end) in regular_slot(),
        now in 0..DAY_SECS,
    ) {
        let start_str = time(start).format("%H:%M:%S").to_string();
        let end_str = time(end).format("%H:%M:%S").to_string();

        prop_assert_eq!(
            get_slot_status(time(now), &start_str, &end_str),
            Ok(classify_slot(time(now), time(start), time(end)))
        );
    }

    #[test]
    fn haversine_zero_for_same_point(lat in -90.0f64..=90.0, lng in -180.0f64..=180.0) {
        prop_assert_eq!(haversine_km(lat, lng, lat, lng), 0.0);
    }

    #[test]
    fn haversine_symmetric_and_bounded(
        lat1 in -90.0f64..=90.0,
        lng1 in -180.0f64..=180.0,
        lat2 in -90.0f64..=90.0,
        lng2 in -180.0f64..=180.0,
    ) {
        let there = haversine_km(lat1, lng1, lat2, lng2);
        let back = haversine_km(lat2, lng2, lat1, lng1);

        prop_assert!(there >= 0.0);
        prop_assert!((there - back).abs() < 1e-6);
        // Half the Earth's circumference
        prop_assert!(there <= std::f64::consts::PI * 6371.0 + 1e-6);
    }
}
