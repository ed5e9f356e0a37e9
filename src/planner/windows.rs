//! Candidate date window generation

use chrono::{Duration, NaiveDate};
use serde::Serialize;

/// Candidate date span, `end` exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Every run of `trip_length_days` consecutive horizon dates, ascending by start.
///
/// `horizon` must be sorted and gap-free, which [`crate::models::WeatherHorizon`]
/// guarantees. With an anchor only starts within `flexibility_days` of it
/// (either side) are kept.
#[must_use]
pub fn generate_windows(
    horizon: &[NaiveDate],
    trip_length_days: u32,
    flexibility_days: u32,
    anchor: Option<NaiveDate>,
) -> Vec<DateWindow> {
    let Ok(length) = usize::try_from(trip_length_days) else {
        return Vec::new();
    };
    if length == 0 || horizon.len() < length {
        return Vec::new();
    }

    horizon
        .windows(length)
        .map(|days| DateWindow {
            start: days[0],
            end: days[length - 1] + Duration::days(1),
        })
        .filter(|window| {
            anchor.is_none_or(|anchor| {
                (window.start - anchor).num_days().abs() <= i64::from(flexibility_days)
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn horizon(days: i64) -> Vec<NaiveDate> {
        let first = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        (0..days).map(|i| first + Duration::days(i)).collect()
    }

    #[rstest]
    #[case(10, 7, 4)]
    #[case(30, 7, 24)]
    #[case(7, 7, 1)]
    #[case(5, 1, 5)]
    fn test_window_count(#[case] horizon_days: i64, #[case] trip: u32, #[case] expected: usize) {
        let windows = generate_windows(&horizon(horizon_days), trip, 0, None);
        assert_eq!(windows.len(), expected);
    }

    #[test]
    fn test_windows_are_ascending_and_sized() {
        let windows = generate_windows(&horizon(10), 7, 0, None);
        assert!(windows.windows(2).all(|pair| pair[0].start < pair[1].start));
        assert!(windows.iter().all(|w| (w.end - w.start).num_days() == 7));
        assert_eq!(windows[0].start, horizon(1)[0]);
        assert_eq!(windows.last().unwrap().end, horizon(11)[10]);
    }

    #[test]
    fn test_horizon_shorter_than_trip() {
        assert!(generate_windows(&horizon(5), 7, 3, None).is_empty());
        assert!(generate_windows(&[], 1, 0, None).is_empty());
    }

    #[test]
    fn test_anchor_limits_starts() {
        let dates = horizon(20);
        let anchor = dates[8];
        let windows = generate_windows(&dates, 7, 2, Some(anchor));

        let starts: Vec<_> = windows.iter().map(|w| w.start).collect();
        assert_eq!(starts, dates[6..=10].to_vec());
    }

    #[test]
    fn test_anchor_near_horizon_end() {
        let dates = horizon(10);
        // only starts 0..=3 fit a 7 day trip
        let windows = generate_windows(&dates, 7, 1, Some(dates[5]));
        assert!(windows.is_empty());

        let windows = generate_windows(&dates, 7, 2, Some(dates[5]));
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].start, dates[3]);
    }
}
