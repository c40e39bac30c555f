use std::collections::HashSet;

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use super::slots::find_day_schedule;
use super::time_utils::{parse_time_to_minutes, weekday_from_name};
use super::types::DaySchedule;
use crate::error::ScheduleError;

/// How far ahead of today a date may be booked, in days
pub const BOOKING_HORIZON_DAYS: i64 = 7;

/// Builds the set of weekdays that have an enabled schedule entry
pub fn enabled_weekdays(schedules: &[DaySchedule]) -> HashSet<Weekday> {
    schedules
        .iter()
        .filter(|d| d.enabled)
        .filter_map(|d| weekday_from_name(&d.day))
        .collect()
}

/// Decides whether a calendar cell may be offered for booking.
///
/// A date is selectable when it lies within the booking horizon
/// (`today..=today + 7 days`) and its weekday is enabled. For today
/// itself, at least one window of the day must also start strictly later
/// than the current wall-clock time. All clock and date inputs are
/// explicit parameters; nothing here reads ambient time.
pub fn is_date_selectable(
    today: NaiveDate,
    now_minutes: u32,
    date: NaiveDate,
    schedules: &[DaySchedule],
    enabled: &HashSet<Weekday>,
) -> Result<bool, ScheduleError> {
    if date < today || date > today + Duration::days(BOOKING_HORIZON_DAYS) {
        return Ok(false);
    }
    if !enabled.contains(&date.weekday()) {
        return Ok(false);
    }

    if date == today {
        let day_schedule = match find_day_schedule(date, schedules) {
            Some(d) => d,
            None => return Ok(false),
        };
        for window in &day_schedule.times {
            if parse_time_to_minutes(&window.start)? > now_minutes {
                return Ok(true);
            }
        }
        return Ok(false);
    }

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::types::TimeRange;

    fn schedules() -> Vec<DaySchedule> {
        vec![
            DaySchedule {
                day: "Monday".to_string(),
                enabled: true,
                times: vec![TimeRange {
                    start: "09:00 AM".to_string(),
                    end: "05:00 PM".to_string(),
                }],
            },
            DaySchedule {
                day: "Tuesday".to_string(),
                enabled: false,
                times: vec![],
            },
        ]
    }

    // 2026-03-02 is a Monday
    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    #[test]
    fn test_enabled_weekdays_skips_disabled_entries() {
        let enabled = enabled_weekdays(&schedules());
        assert!(enabled.contains(&Weekday::Mon));
        assert!(!enabled.contains(&Weekday::Tue));
        assert_eq!(enabled.len(), 1);
    }

    #[test]
    fn test_past_and_beyond_horizon_are_unselectable() {
        let schedules = schedules();
        let enabled = enabled_weekdays(&schedules);
        let today = monday();

        let yesterday = today - Duration::days(1);
        assert!(!is_date_selectable(today, 0, yesterday, &schedules, &enabled).unwrap());

        // next Monday is exactly 7 days out and still selectable
        let next_monday = today + Duration::days(7);
        assert!(is_date_selectable(today, 0, next_monday, &schedules, &enabled).unwrap());

        // 8 days out is past the horizon
        let beyond = today + Duration::days(8);
        assert!(!is_date_selectable(today, 0, beyond, &schedules, &enabled).unwrap());
    }

    #[test]
    fn test_disabled_weekday_is_unselectable() {
        let schedules = schedules();
        let enabled = enabled_weekdays(&schedules);
        let tuesday = monday() + Duration::days(1);
        assert!(!is_date_selectable(monday(), 0, tuesday, &schedules, &enabled).unwrap());
    }

    #[test]
    fn test_today_needs_a_window_start_after_now() {
        let schedules = schedules();
        let enabled = enabled_weekdays(&schedules);
        let today = monday();

        // 08:00: the 09:00 AM window start is still ahead
        assert!(is_date_selectable(today, 8 * 60, today, &schedules, &enabled).unwrap());

        // 09:00 exactly: no window start is strictly later
        assert!(!is_date_selectable(today, 9 * 60, today, &schedules, &enabled).unwrap());

        // late evening
        assert!(!is_date_selectable(today, 23 * 60, today, &schedules, &enabled).unwrap());
    }

    #[test]
    fn test_future_date_ignores_clock() {
        let schedules = schedules();
        let enabled = enabled_weekdays(&schedules);
        let next_monday = monday() + Duration::days(7);
        assert!(is_date_selectable(monday(), 23 * 60, next_monday, &schedules, &enabled).unwrap());
    }
}
