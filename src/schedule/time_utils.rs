use chrono::{Datelike, NaiveDate, Weekday};

use crate::error::ScheduleError;

/// The fixed set of appointment lengths a team may offer, in minutes
pub const ALLOWED_DURATIONS: [u32; 5] = [5, 15, 30, 45, 60];

/// Parses a 12-hour wall-clock string ("09:00 AM") to minutes since midnight.
/// Midnight ("12:00 AM") maps to hour 0; noon keeps hour 12.
pub fn parse_time_to_minutes(time_str: &str) -> Result<u32, ScheduleError> {
    let bad = || ScheduleError::BadTimeFormat(time_str.to_string());

    let (clock, meridiem) = time_str.trim().split_once(' ').ok_or_else(bad)?;
    if meridiem != "AM" && meridiem != "PM" {
        return Err(bad());
    }

    let (hours_str, minutes_str) = clock.split_once(':').ok_or_else(bad)?;
    let hours: u32 = hours_str.parse().map_err(|_| bad())?;
    let minutes: u32 = minutes_str.parse().map_err(|_| bad())?;
    if hours < 1 || hours > 12 || minutes >= 60 {
        return Err(bad());
    }

    let hours24 = match (hours, meridiem) {
        (12, "AM") => 0,
        (12, "PM") => 12,
        (h, "PM") => h + 12,
        (h, _) => h,
    };

    Ok(hours24 * 60 + minutes)
}

/// Formats minutes since midnight back to the 12-hour wire form ("09:00 AM")
pub fn minutes_to_time_string(minutes: u32) -> String {
    let minutes = minutes % (24 * 60);
    let hours24 = minutes / 60;
    let mins = minutes % 60;
    let meridiem = if hours24 < 12 { "AM" } else { "PM" };
    let hours12 = match hours24 % 12 {
        0 => 12,
        h => h,
    };
    format!("{:02}:{:02} {}", hours12, mins, meridiem)
}

/// Formats a calendar date in the M-D-YYYY appointment identity format
/// (no zero padding, e.g. "3-5-2026")
pub fn format_appointment_date(date: NaiveDate) -> String {
    format!("{}-{}-{}", date.month(), date.day(), date.year())
}

/// Parses an M-D-YYYY appointment date string
pub fn parse_appointment_date(value: &str) -> Result<NaiveDate, ScheduleError> {
    let bad = || ScheduleError::BadDateFormat(value.to_string());

    let parts: Vec<&str> = value.trim().split('-').collect();
    if parts.len() != 3 {
        return Err(bad());
    }
    let month: u32 = parts[0].parse().map_err(|_| bad())?;
    let day: u32 = parts[1].parse().map_err(|_| bad())?;
    let year: i32 = parts[2].parse().map_err(|_| bad())?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(bad)
}

/// Parses a duration taken from a team's `durations` list, rejecting
/// anything outside the fixed set
pub fn parse_duration_minutes(value: &str) -> Result<u32, ScheduleError> {
    let minutes: u32 = value
        .trim()
        .parse()
        .map_err(|_| ScheduleError::BadDuration(value.to_string()))?;
    if ALLOWED_DURATIONS.contains(&minutes) {
        Ok(minutes)
    } else {
        Err(ScheduleError::BadDuration(value.to_string()))
    }
}

/// Full weekday name matching the `day` field of a schedule entry
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Inverse of `weekday_name`; unknown names yield None
pub fn weekday_from_name(name: &str) -> Option<Weekday> {
    match name {
        "Monday" => Some(Weekday::Mon),
        "Tuesday" => Some(Weekday::Tue),
        "Wednesday" => Some(Weekday::Wed),
        "Thursday" => Some(Weekday::Thu),
        "Friday" => Some(Weekday::Fri),
        "Saturday" => Some(Weekday::Sat),
        "Sunday" => Some(Weekday::Sun),
        _ => None,
    }
}
