use actix_files::Files;
use actix_web::{middleware, web, App, HttpResponse, HttpServer, Result};
use chrono::{Local, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;

use crate::booking::{book_slot, cancel_by_token, cancel_range, BookingError, BookingRequest, CancelError};
use crate::poll::{intensity_tier, upsert_availability, GroupAvailability, Poll, HEATMAP_TIERS};
use crate::schedule::{
    enabled_weekdays, is_date_selectable, parse_duration_minutes, parse_time_to_minutes,
    slots_for_date, DaySchedule, Team, TimeRange,
};

// In-memory storage for teams and polls (in production, use a database)
pub struct AppState {
    pub teams: Mutex<HashMap<String, Team>>,
    pub polls: Mutex<HashMap<String, Poll>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeamRequest {
    name: String,
    available_time: Vec<DaySchedule>,
    durations: Vec<String>,
}

#[derive(Deserialize)]
pub struct SlotsQuery {
    date: String, // YYYY-MM-DD
    duration: String,
}

#[derive(Serialize)]
pub struct SlotsResponse {
    date: String,
    slots: Vec<String>,
    selectable: bool,
}

#[derive(Deserialize)]
pub struct AppointmentsPatch {
    appointments: Vec<BookingRequest>,
}

#[derive(Deserialize)]
pub struct CancelRangePatch {
    day: String,
    meeting: TimeRange,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePollRequest {
    url_path: String,
    days: Vec<String>,
    times: Vec<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityPatch {
    user_email: String,
    selected_slots: Vec<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellQuery {
    user_email: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellAvailabilityResponse {
    available_count: usize,
    total_participants: usize,
    tier: u32,
    available: Vec<String>,
    unavailable: Vec<String>,
}

/// Validates a team's schedule and duration settings before storing them
fn validate_team(req: &CreateTeamRequest) -> std::result::Result<(), String> {
    if req.name.trim().is_empty() {
        return Err("Team name is required".to_string());
    }

    for duration in &req.durations {
        parse_duration_minutes(duration).map_err(|e| e.to_string())?;
    }

    for day in &req.available_time {
        if day.enabled && day.times.is_empty() {
            return Err(format!("Enabled day {} has no time windows", day.day));
        }
        for window in &day.times {
            let start = parse_time_to_minutes(&window.start).map_err(|e| e.to_string())?;
            let end = parse_time_to_minutes(&window.end).map_err(|e| e.to_string())?;
            if start >= end {
                return Err(format!(
                    "Window {} - {} on {} is inverted",
                    window.start, window.end, day.day
                ));
            }
        }
    }

    Ok(())
}

// Team creation endpoint
async fn create_team(
    req: web::Json<CreateTeamRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    if let Err(error) = validate_team(&req) {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({"success": false, "error": error})));
    }

    let mut teams = state.teams.lock().unwrap();
    if teams.contains_key(&req.name) {
        return Ok(HttpResponse::Conflict()
            .json(serde_json::json!({"success": false, "error": "Team already exists"})));
    }

    let team = Team {
        name: req.name.clone(),
        available_time: req.available_time.clone(),
        appointments: Vec::new(),
        cancelled_meetings: Vec::new(),
        durations: req.durations.clone(),
    };
    teams.insert(req.name.clone(), team);
    log::info!("Created team {}", req.name);

    Ok(HttpResponse::Ok().json(serde_json::json!({"success": true, "id": req.name})))
}

// Team read endpoint
async fn get_team(id: web::Path<String>, state: web::Data<AppState>) -> Result<HttpResponse> {
    let teams = state.teams.lock().unwrap();
    match teams.get(id.as_str()) {
        Some(team) => Ok(HttpResponse::Ok().json(team)),
        None => Ok(HttpResponse::NotFound()
            .json(serde_json::json!({"success": false, "error": "Team not found"}))),
    }
}

// Derived bookable slots for one calendar date
async fn get_slots(
    id: web::Path<String>,
    query: web::Query<SlotsQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let teams = state.teams.lock().unwrap();
    let team = match teams.get(id.as_str()) {
        Some(team) => team,
        None => {
            return Ok(HttpResponse::NotFound()
                .json(serde_json::json!({"success": false, "error": "Team not found"})))
        }
    };

    let date = match NaiveDate::parse_from_str(&query.date, "%Y-%m-%d") {
        Ok(date) => date,
        Err(_) => {
            return Ok(HttpResponse::BadRequest().json(
                serde_json::json!({"success": false, "error": format!("Invalid date string: {}", query.date)}),
            ))
        }
    };
    let duration_minutes = match parse_duration_minutes(&query.duration) {
        Ok(minutes) => minutes,
        Err(e) => {
            return Ok(HttpResponse::BadRequest()
                .json(serde_json::json!({"success": false, "error": e.to_string()})))
        }
    };

    let now = Local::now();
    let today = now.date_naive();
    let now_minutes = now.time().hour() * 60 + now.time().minute();
    let enabled = enabled_weekdays(&team.available_time);

    let selectable = match is_date_selectable(today, now_minutes, date, &team.available_time, &enabled)
    {
        Ok(selectable) => selectable,
        Err(e) => {
            return Ok(HttpResponse::BadRequest()
                .json(serde_json::json!({"success": false, "error": e.to_string()})))
        }
    };

    let slots = match slots_for_date(
        date,
        &team.available_time,
        duration_minutes,
        &team.appointments,
        &team.cancelled_meetings,
    ) {
        Ok(slots) => slots,
        Err(e) => {
            return Ok(HttpResponse::BadRequest()
                .json(serde_json::json!({"success": false, "error": e.to_string()})))
        }
    };

    Ok(HttpResponse::Ok().json(SlotsResponse {
        date: query.date.clone(),
        slots,
        selectable,
    }))
}

// Appointment booking endpoint
async fn patch_appointments(
    id: web::Path<String>,
    body: web::Json<AppointmentsPatch>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let mut teams = state.teams.lock().unwrap();
    let team = match teams.get_mut(id.as_str()) {
        Some(team) => team,
        None => {
            return Ok(HttpResponse::NotFound()
                .json(serde_json::json!({"success": false, "error": "Team not found"})))
        }
    };

    let now = Utc::now();
    let mut created = Vec::new();
    for request in &body.appointments {
        match book_slot(team, request, now) {
            Ok(appointment) => {
                log::info!(
                    "Booked {} {} on team {} for {}",
                    appointment.day,
                    appointment.time,
                    id,
                    appointment.email
                );
                created.push(appointment);
            }
            Err(BookingError::SlotUnavailable { day, time }) => {
                return Ok(HttpResponse::Conflict().json(serde_json::json!({
                    "success": false,
                    "error": format!("Slot {} on {} is no longer available", time, day),
                    "appointments": created,
                })))
            }
            Err(e) => {
                return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                    "success": false,
                    "error": e.to_string(),
                    "appointments": created,
                })))
            }
        }
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({"success": true, "appointments": created})))
}

// Token cancellation endpoint
async fn delete_appointment(
    path: web::Path<(String, String)>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let (id, token) = path.into_inner();
    let mut teams = state.teams.lock().unwrap();
    let team = match teams.get_mut(id.as_str()) {
        Some(team) => team,
        None => {
            return Ok(HttpResponse::NotFound()
                .json(serde_json::json!({"success": false, "error": "Team not found"})))
        }
    };

    match cancel_by_token(team, &token, Utc::now()) {
        Ok(appointment) => {
            log::info!(
                "Cancelled {} {} on team {} for {}",
                appointment.day,
                appointment.time,
                id,
                appointment.email
            );
            Ok(HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "day": appointment.day,
                "time": appointment.time,
            })))
        }
        Err(CancelError::UnknownToken) => Ok(HttpResponse::NotFound()
            .json(serde_json::json!({"success": false, "error": "Unknown cancellation token"}))),
        Err(CancelError::TokenExpired) => Ok(HttpResponse::Gone()
            .json(serde_json::json!({"success": false, "error": "Cancellation token has expired"}))),
    }
}

// Host-cancelled block endpoint
async fn patch_cancelled(
    id: web::Path<String>,
    body: web::Json<CancelRangePatch>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let mut teams = state.teams.lock().unwrap();
    let team = match teams.get_mut(id.as_str()) {
        Some(team) => team,
        None => {
            return Ok(HttpResponse::NotFound()
                .json(serde_json::json!({"success": false, "error": "Team not found"})))
        }
    };

    let body = body.into_inner();
    match cancel_range(team, &body.day, body.meeting) {
        Ok(()) => {
            log::info!("Cancelled block on {} for team {}", body.day, id);
            Ok(HttpResponse::Ok().json(serde_json::json!({"success": true})))
        }
        Err(e) => Ok(HttpResponse::BadRequest()
            .json(serde_json::json!({"success": false, "error": e.to_string()}))),
    }
}

// Poll creation endpoint
async fn create_poll(
    req: web::Json<CreatePollRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    if req.url_path.trim().is_empty() {
        return Ok(HttpResponse::BadRequest()
            .json(serde_json::json!({"success": false, "error": "Poll urlPath is required"})));
    }

    let mut polls = state.polls.lock().unwrap();
    if polls.contains_key(&req.url_path) {
        return Ok(HttpResponse::Conflict()
            .json(serde_json::json!({"success": false, "error": "Poll already exists"})));
    }

    let poll = Poll {
        url_path: req.url_path.clone(),
        days: req.days.clone(),
        times: req.times.clone(),
        participants: Vec::new(),
    };
    polls.insert(req.url_path.clone(), poll);
    log::info!("Created poll {}", req.url_path);

    Ok(HttpResponse::Ok().json(serde_json::json!({"success": true, "urlPath": req.url_path})))
}

// Poll read endpoint
async fn get_poll(url_path: web::Path<String>, state: web::Data<AppState>) -> Result<HttpResponse> {
    let polls = state.polls.lock().unwrap();
    match polls.get(url_path.as_str()) {
        Some(poll) => Ok(HttpResponse::Ok().json(poll)),
        None => Ok(HttpResponse::NotFound()
            .json(serde_json::json!({"success": false, "error": "Poll not found"}))),
    }
}

// Participant availability upsert endpoint
async fn patch_availability(
    url_path: web::Path<String>,
    body: web::Json<AvailabilityPatch>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    if body.user_email.trim().is_empty() {
        return Ok(HttpResponse::BadRequest()
            .json(serde_json::json!({"success": false, "error": "userEmail is required"})));
    }

    let mut polls = state.polls.lock().unwrap();
    let poll = match polls.get_mut(url_path.as_str()) {
        Some(poll) => poll,
        None => {
            return Ok(HttpResponse::NotFound()
                .json(serde_json::json!({"success": false, "error": "Poll not found"})))
        }
    };

    let body = body.into_inner();
    upsert_availability(poll, body.user_email.trim(), body.selected_slots);
    log::info!("Synced availability of {} on poll {}", body.user_email, url_path);

    Ok(HttpResponse::Ok()
        .json(serde_json::json!({"success": true, "participants": poll.participants.len()})))
}

// Per-cell availability counts for the heatmap and hover tooltip
async fn get_cell_availability(
    path: web::Path<(String, String, String)>,
    query: web::Query<CellQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let (url_path, day, time) = path.into_inner();
    let polls = state.polls.lock().unwrap();
    let poll = match polls.get(url_path.as_str()) {
        Some(poll) => poll,
        None => {
            return Ok(HttpResponse::NotFound()
                .json(serde_json::json!({"success": false, "error": "Poll not found"})))
        }
    };

    let group = match &query.user_email {
        Some(email) => GroupAvailability::with_current_user(poll, email),
        None => GroupAvailability::from_poll(poll),
    };

    let counts = group.cell_availability(&day, &time);
    let (available, unavailable) = group.available_users_at(&day, &time);

    Ok(HttpResponse::Ok().json(CellAvailabilityResponse {
        available_count: counts.available_count,
        total_participants: counts.total_participants,
        tier: intensity_tier(counts.available_count, counts.total_participants, HEATMAP_TIERS),
        available,
        unavailable,
    }))
}

pub async fn start_server(port: u16) -> std::io::Result<()> {
    let app_state = web::Data::new(AppState {
        teams: Mutex::new(HashMap::new()),
        polls: Mutex::new(HashMap::new()),
    });

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .service(Files::new("/static", "static"))
            .route("/api/teams", web::post().to(create_team))
            .route("/api/teams/{id}", web::get().to(get_team))
            .route("/api/teams/{id}/slots", web::get().to(get_slots))
            .route("/api/teams/{id}/appointments", web::patch().to(patch_appointments))
            .route(
                "/api/teams/{id}/appointments/{token}",
                web::delete().to(delete_appointment),
            )
            .route("/api/teams/{id}/cancelled", web::patch().to(patch_cancelled))
            .route("/api/polls", web::post().to(create_poll))
            .route("/api/polls/{url_path}", web::get().to(get_poll))
            .route(
                "/api/polls/{url_path}/availability",
                web::patch().to(patch_availability),
            )
            .route(
                "/api/polls/{url_path}/availability/{day}/{time}",
                web::get().to(get_cell_availability),
            )
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
