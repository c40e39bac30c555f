use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One availability window within a day, as 12-hour wall-clock strings
/// ("09:00 AM"). `start` precedes `end` when parsed to minutes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: String,
    pub end: String,
}

/// One weekday's availability: enabled flag plus its windows.
/// A team carries one entry per weekday; `times` is non-empty when
/// `enabled` is true.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaySchedule {
    pub day: String, // full weekday name, e.g. "Monday"
    pub enabled: bool,
    pub times: Vec<TimeRange>,
}

/// A booked appointment. `day` uses the M-D-YYYY format (no zero padding)
/// and together with `time` forms the slot's identity; bookings are matched
/// against generated slots by exact string comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub day: String,
    pub time: String,
    pub name: String,
    pub email: String,
    pub token: String,
    pub token_expiry: DateTime<Utc>,
}

/// A host-cancelled block on a specific date. Any slot whose start falls
/// inside `meeting` (inclusive on both ends) is excluded from derivation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelledRange {
    pub day: String, // M-D-YYYY
    pub meeting: TimeRange,
}

/// A team document as stored and served to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub name: String,
    pub available_time: Vec<DaySchedule>,
    pub appointments: Vec<Appointment>,
    pub cancelled_meetings: Vec<CancelledRange>,
    pub durations: Vec<String>,
}
