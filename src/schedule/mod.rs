pub mod calendar;
pub mod slots;
pub mod time_utils;
pub mod types;

pub use calendar::{enabled_weekdays, is_date_selectable};
pub use slots::{derive_slots, find_day_schedule, slots_for_date};
pub use time_utils::{
    format_appointment_date, minutes_to_time_string, parse_appointment_date,
    parse_duration_minutes, parse_time_to_minutes,
};
pub use types::{Appointment, CancelledRange, DaySchedule, Team, TimeRange};
