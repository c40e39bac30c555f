use chrono::{Datelike, NaiveDate};

use super::time_utils::{
    format_appointment_date, minutes_to_time_string, parse_time_to_minutes, weekday_name,
};
use super::types::{Appointment, CancelledRange, DaySchedule};
use crate::error::ScheduleError;

/// Derives the still-bookable slots for one calendar date.
///
/// Walks every window of the day's schedule in array order, emitting a
/// candidate every `duration_minutes` from the window start up to (but
/// excluding) the window end, then drops candidates that are already
/// booked or fall inside a cancelled block. A disabled day yields no
/// slots. Windows are not re-sorted across each other, so callers wanting
/// a globally sorted result must supply ascending, non-overlapping
/// windows.
pub fn derive_slots(
    date: NaiveDate,
    day_schedule: &DaySchedule,
    duration_minutes: u32,
    booked: &[Appointment],
    cancelled: &[CancelledRange],
) -> Result<Vec<String>, ScheduleError> {
    if !day_schedule.enabled {
        return Ok(Vec::new());
    }

    let day_key = format_appointment_date(date);
    let mut slots = Vec::new();

    for window in &day_schedule.times {
        let start = parse_time_to_minutes(&window.start)?;
        let end = parse_time_to_minutes(&window.end)?;

        let mut cursor = start;
        while cursor < end {
            let candidate = minutes_to_time_string(cursor);
            if !is_booked(&day_key, &candidate, booked)
                && !is_cancelled(&day_key, cursor, cancelled)?
            {
                slots.push(candidate);
            }
            cursor += duration_minutes;
        }
    }

    Ok(slots)
}

/// Looks up the weekday's schedule entry for `date` and derives its slots.
/// A missing entry yields no slots rather than an error.
pub fn slots_for_date(
    date: NaiveDate,
    schedules: &[DaySchedule],
    duration_minutes: u32,
    booked: &[Appointment],
    cancelled: &[CancelledRange],
) -> Result<Vec<String>, ScheduleError> {
    match find_day_schedule(date, schedules) {
        Some(day_schedule) => derive_slots(date, day_schedule, duration_minutes, booked, cancelled),
        None => Ok(Vec::new()),
    }
}

/// Finds the schedule entry whose day name matches the date's weekday
pub fn find_day_schedule<'a>(
    date: NaiveDate,
    schedules: &'a [DaySchedule],
) -> Option<&'a DaySchedule> {
    let name = weekday_name(date.weekday());
    schedules.iter().find(|d| d.day == name)
}

/// Exact string match against existing bookings; no format normalization
fn is_booked(day: &str, time: &str, booked: &[Appointment]) -> bool {
    booked.iter().any(|a| a.day == day && a.time == time)
}

/// Containment check against cancelled blocks on the same date, inclusive
/// at both boundaries
fn is_cancelled(
    day: &str,
    minutes: u32,
    cancelled: &[CancelledRange],
) -> Result<bool, ScheduleError> {
    for range in cancelled.iter().filter(|c| c.day == day) {
        let start = parse_time_to_minutes(&range.meeting.start)?;
        let end = parse_time_to_minutes(&range.meeting.end)?;
        if minutes >= start && minutes <= end {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::types::TimeRange;
    use chrono::{DateTime, Utc};

    fn window(start: &str, end: &str) -> TimeRange {
        TimeRange {
            start: start.to_string(),
            end: end.to_string(),
        }
    }

    fn monday_schedule(times: Vec<TimeRange>) -> DaySchedule {
        DaySchedule {
            day: "Monday".to_string(),
            enabled: true,
            times,
        }
    }

    // 2026-03-02 is a Monday
    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    fn appointment(day: &str, time: &str) -> Appointment {
        Appointment {
            day: day.to_string(),
            time: time.to_string(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            token: "tok".to_string(),
            token_expiry: DateTime::<Utc>::MIN_UTC,
        }
    }

    #[test]
    fn test_one_hour_window_half_hour_slots() {
        let schedule = monday_schedule(vec![window("09:00 AM", "10:00 AM")]);
        let slots = derive_slots(monday(), &schedule, 30, &[], &[]).unwrap();
        assert_eq!(slots, vec!["09:00 AM", "09:30 AM"]);
    }

    #[test]
    fn test_end_is_exclusive() {
        // 09:00-09:50 with 30-minute slots: candidates at 09:00 and 09:30 only
        let schedule = monday_schedule(vec![window("09:00 AM", "09:50 AM")]);
        let slots = derive_slots(monday(), &schedule, 30, &[], &[]).unwrap();
        assert_eq!(slots, vec!["09:00 AM", "09:30 AM"]);
    }

    #[test]
    fn test_multiple_windows_keep_array_order() {
        let schedule = monday_schedule(vec![
            window("02:00 PM", "03:00 PM"),
            window("09:00 AM", "10:00 AM"),
        ]);
        let slots = derive_slots(monday(), &schedule, 60, &[], &[]).unwrap();
        assert_eq!(slots, vec!["02:00 PM", "09:00 AM"]);
    }

    #[test]
    fn test_booked_slot_is_excluded() {
        let schedule = monday_schedule(vec![window("09:00 AM", "10:00 AM")]);
        let booked = vec![appointment("3-2-2026", "09:30 AM")];
        let slots = derive_slots(monday(), &schedule, 30, &booked, &[]).unwrap();
        assert_eq!(slots, vec!["09:00 AM"]);
    }

    #[test]
    fn test_booking_on_other_date_keeps_slot() {
        let schedule = monday_schedule(vec![window("09:00 AM", "10:00 AM")]);
        let booked = vec![appointment("3-9-2026", "09:30 AM")];
        let slots = derive_slots(monday(), &schedule, 30, &booked, &[]).unwrap();
        assert_eq!(slots, vec!["09:00 AM", "09:30 AM"]);
    }

    #[test]
    fn test_derivation_is_idempotent_over_bookings() {
        let schedule = monday_schedule(vec![window("09:00 AM", "10:00 AM")]);
        let booked = vec![appointment("3-2-2026", "09:00 AM")];
        let first = derive_slots(monday(), &schedule, 30, &booked, &[]).unwrap();
        let second = derive_slots(monday(), &schedule, 30, &booked, &[]).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, vec!["09:30 AM"]);
    }

    #[test]
    fn test_cancelled_range_is_inclusive_both_ends() {
        let schedule = monday_schedule(vec![window("09:00 AM", "10:00 AM")]);
        let cancelled = vec![CancelledRange {
            day: "3-2-2026".to_string(),
            meeting: window("09:00 AM", "09:30 AM"),
        }];
        let slots = derive_slots(monday(), &schedule, 30, &[], &cancelled).unwrap();
        assert!(slots.is_empty());
    }

    #[test]
    fn test_cancelled_range_on_other_date_keeps_slots() {
        let schedule = monday_schedule(vec![window("09:00 AM", "10:00 AM")]);
        let cancelled = vec![CancelledRange {
            day: "3-9-2026".to_string(),
            meeting: window("09:00 AM", "09:30 AM"),
        }];
        let slots = derive_slots(monday(), &schedule, 30, &[], &cancelled).unwrap();
        assert_eq!(slots, vec!["09:00 AM", "09:30 AM"]);
    }

    #[test]
    fn test_slot_after_cancelled_range_survives() {
        let schedule = monday_schedule(vec![window("09:00 AM", "11:00 AM")]);
        let cancelled = vec![CancelledRange {
            day: "3-2-2026".to_string(),
            meeting: window("09:00 AM", "09:30 AM"),
        }];
        let slots = derive_slots(monday(), &schedule, 30, &[], &cancelled).unwrap();
        assert_eq!(slots, vec!["10:00 AM", "10:30 AM"]);
    }

    #[test]
    fn test_disabled_day_yields_nothing() {
        let mut schedule = monday_schedule(vec![window("09:00 AM", "10:00 AM")]);
        schedule.enabled = false;
        let slots = derive_slots(monday(), &schedule, 30, &[], &[]).unwrap();
        assert!(slots.is_empty());
    }

    #[test]
    fn test_missing_day_entry_yields_nothing() {
        let schedules = vec![DaySchedule {
            day: "Tuesday".to_string(),
            enabled: true,
            times: vec![window("09:00 AM", "10:00 AM")],
        }];
        let slots = slots_for_date(monday(), &schedules, 30, &[], &[]).unwrap();
        assert!(slots.is_empty());
    }

    #[test]
    fn test_malformed_window_time_is_an_error() {
        let schedule = monday_schedule(vec![window("9am", "10:00 AM")]);
        assert!(derive_slots(monday(), &schedule, 30, &[], &[]).is_err());
    }
}
