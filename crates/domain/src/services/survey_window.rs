//! Survey dispatch window computation.
//!
//! The dispatch job targets occurrences that ended during the prior UTC
//! calendar day: [00:00:00.000, 23:59:59.999] relative to the run time.

use chrono::{DateTime, Duration, Utc};

/// Returns the inclusive [start, end] bounds of the UTC day before `now`.
pub fn previous_utc_day(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start_of_today = now
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .expect("midnight is always valid")
        .and_utc();

    let start = start_of_today - Duration::days(1);
    let end = start_of_today - Duration::milliseconds(1);

    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_window_bounds() {
        let now = Utc.with_ymd_and_hms(2026, 8, 6, 9, 0, 0).unwrap();
        let (start, end) = previous_utc_day(now);

        assert_eq!(start, Utc.with_ymd_and_hms(2026, 8, 5, 0, 0, 0).unwrap());
        assert_eq!(
            end,
            Utc.with_ymd_and_hms(2026, 8, 5, 23, 59, 59).unwrap()
                + Duration::milliseconds(999)
        );
    }

    #[test]
    fn test_window_crosses_month_boundary() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 2, 30, 0).unwrap();
        let (start, end) = previous_utc_day(now);

        assert_eq!(start, Utc.with_ymd_and_hms(2026, 2, 28, 0, 0, 0).unwrap());
        assert_eq!(end.date_naive(), start.date_naive());
    }

    #[test]
    fn test_window_crosses_year_boundary() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 1).unwrap();
        let (start, _) = previous_utc_day(now);

        assert_eq!(start, Utc.with_ymd_and_hms(2025, 12, 31, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_window_independent_of_time_of_day() {
        let morning = Utc.with_ymd_and_hms(2026, 8, 6, 0, 0, 0).unwrap();
        let night = Utc.with_ymd_and_hms(2026, 8, 6, 23, 59, 59).unwrap();
        assert_eq!(previous_utc_day(morning), previous_utc_day(night));
    }

    #[test]
    fn test_end_of_window_precedes_today() {
        let now = Utc.with_ymd_and_hms(2026, 8, 6, 12, 0, 0).unwrap();
        let (_, end) = previous_utc_day(now);
        let midnight = Utc.with_ymd_and_hms(2026, 8, 6, 0, 0, 0).unwrap();
        assert!(end < midnight);
    }
}
