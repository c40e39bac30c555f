use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

use super::tokens::{generate_token, token_expiry};
use crate::error::ScheduleError;
use crate::schedule::time_utils::{
    format_appointment_date, parse_appointment_date, parse_duration_minutes,
    parse_time_to_minutes,
};
use crate::schedule::types::{Appointment, CancelledRange, Team, TimeRange};
use crate::schedule::slots_for_date;

/// One booking request from the frontend. A client may supply its own
/// cancellation token and expiry; both are generated here when absent.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub day: String,
    pub time: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub token_expiry: Option<DateTime<Utc>>,
}

/// Why a booking was refused
#[derive(Error, Debug)]
pub enum BookingError {
    #[error("{0}")]
    Invalid(String),

    #[error("Slot {time} on {day} is no longer available")]
    SlotUnavailable { day: String, time: String },

    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}

/// Why a cancellation was refused
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CancelError {
    #[error("No appointment matches this cancellation token")]
    UnknownToken,

    #[error("This cancellation token has expired")]
    TokenExpired,
}

/// Validates a booking request before any slot work happens
pub fn validate_booking(req: &BookingRequest) -> Result<(), String> {
    if req.name.trim().is_empty() {
        return Err("Name is required".to_string());
    }

    let email = req.email.trim();
    if email.is_empty() {
        return Err("Email is required".to_string());
    }
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err(format!("Invalid email address: {}", req.email));
    }

    parse_appointment_date(&req.day).map_err(|e| e.to_string())?;
    parse_time_to_minutes(&req.time).map_err(|e| e.to_string())?;

    Ok(())
}

/// Books one slot on a team.
///
/// The date's slots are re-derived first, so a time that was booked or
/// cancelled since the client fetched its slot list is refused. The slot
/// must be derivable under at least one of the durations the team offers.
/// The stored day string is the canonical M-D-YYYY render of the parsed
/// date, keeping the exact-match exclusion stable across client formats.
pub fn book_slot(
    team: &mut Team,
    req: &BookingRequest,
    now: DateTime<Utc>,
) -> Result<Appointment, BookingError> {
    validate_booking(req).map_err(BookingError::Invalid)?;
    let date = parse_appointment_date(&req.day)?;

    let mut bookable = false;
    for duration in &team.durations {
        let duration_minutes = parse_duration_minutes(duration)?;
        let slots = slots_for_date(
            date,
            &team.available_time,
            duration_minutes,
            &team.appointments,
            &team.cancelled_meetings,
        )?;
        if slots.iter().any(|slot| slot == &req.time) {
            bookable = true;
            break;
        }
    }
    if !bookable {
        return Err(BookingError::SlotUnavailable {
            day: req.day.clone(),
            time: req.time.clone(),
        });
    }

    let appointment = Appointment {
        day: format_appointment_date(date),
        time: req.time.clone(),
        name: req.name.trim().to_string(),
        email: req.email.trim().to_string(),
        token: req.token.clone().unwrap_or_else(generate_token),
        token_expiry: req.token_expiry.unwrap_or_else(|| token_expiry(now)),
    };
    team.appointments.push(appointment.clone());
    Ok(appointment)
}

/// Cancels the appointment carrying `token`, if the token is still valid.
/// Returns the removed appointment so callers can confirm what was freed.
pub fn cancel_by_token(
    team: &mut Team,
    token: &str,
    now: DateTime<Utc>,
) -> Result<Appointment, CancelError> {
    let position = team
        .appointments
        .iter()
        .position(|a| a.token == token)
        .ok_or(CancelError::UnknownToken)?;

    if team.appointments[position].token_expiry <= now {
        return Err(CancelError::TokenExpired);
    }

    Ok(team.appointments.remove(position))
}

/// Records a host-cancelled block on one date. Ranges accumulate as an
/// audit trail; nothing prunes past dates.
pub fn cancel_range(
    team: &mut Team,
    day: &str,
    meeting: TimeRange,
) -> Result<(), BookingError> {
    let date = parse_appointment_date(day)?;
    let start = parse_time_to_minutes(&meeting.start)?;
    let end = parse_time_to_minutes(&meeting.end)?;
    if start >= end {
        return Err(BookingError::Invalid(
            "Cancelled range start must precede its end".to_string(),
        ));
    }

    team.cancelled_meetings.push(CancelledRange {
        day: format_appointment_date(date),
        meeting,
    });
    Ok(())
}
