/// Event and attendance endpoints
///
/// # Endpoints
///
/// - `GET /api/events` - Events visible to the caller
/// - `POST /api/events` - Create a global or grade event
/// - `POST /api/events/:id/attendance` - Record attendance, replacing earlier records
/// - `GET /api/events/stats` - Attendance totals per event and grade
///
/// # Eligibility
///
/// Global events include every member. Grade events include the members of
/// that grade and operations staff. Recording attendance writes one row per
/// eligible member, marking the listed ones as attended.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::{non_blank, not_blank},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::NaiveDate;
use scoutstribe_shared::{
    auth::{
        authorization::{self, Action, Capability},
        middleware::AuthContext,
    },
    models::{Attendance, Event, EventType, NewEvent, User},
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use validator::Validate;

/// Create event request
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct CreateEventRequest {
    #[validate(custom(function = "not_blank", message = "Name, date and type are required"))]
    pub name: String,

    /// `YYYY-MM-DD`
    #[validate(custom(function = "not_blank", message = "Name, date and type are required"))]
    pub date: String,

    /// `global` or `grade`
    #[serde(rename = "type")]
    #[validate(custom(function = "not_blank", message = "Name, date and type are required"))]
    pub event_type: String,

    /// Required for grade events (Counselors default to their own)
    pub grade: Option<String>,
}

/// Record attendance request
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AttendanceRequest {
    /// IDs of the members who attended
    pub attendees: Vec<u64>,
}

/// Record attendance response
#[derive(Debug, Serialize, Deserialize)]
pub struct AttendanceResponse {
    pub message: String,
    pub attendance: Vec<Attendance>,
}

/// Attendance totals of one event
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventStats {
    pub event_id: u64,
    pub event_name: String,

    #[serde(rename = "type")]
    pub event_type: EventType,

    pub date: NaiveDate,

    /// Attendees per member grade
    pub grade_attendance: BTreeMap<String, u64>,

    pub total_attendees: u64,
}

/// Checks whether `user` can see `event`
fn can_view(user: &User, event: &Event) -> bool {
    match (event.event_type, &event.grade) {
        (EventType::Global, _) => authorization::require(user, Action::ViewEvents).is_ok(),
        (EventType::Grade, Some(grade)) => {
            authorization::can_access(user, Action::ViewEvents, grade)
        }
        (EventType::Grade, None) => false,
    }
}

/// List events visible to the caller
///
/// Counselors see global events and their own grade's events.
///
/// ```json
/// [
///   { "id": 1, "name": "Spring Camp", "date": "2026-04-10", "type": "global", "grade": null, "createdBy": 1 }
/// ]
/// ```
pub async fn list_events(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Event>>> {
    authorization::require(&auth.user, Action::ViewEvents)?;

    let events = state
        .store
        .list_events()
        .await?
        .into_iter()
        .filter(|event| can_view(&auth.user, event))
        .collect();

    Ok(Json(events))
}

/// Create an event
///
/// ```text
/// POST /api/events
///
/// { "name": "Grade 8 Hike", "date": "2026-05-02", "type": "grade", "grade": "8" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Missing name, bad date or type, grade event without grade
/// - `403 Forbidden`: Counselor creating a global event or another grade's event
pub async fn create_event(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateEventRequest>,
) -> ApiResult<(StatusCode, Json<Event>)> {
    req.validate()?;

    let date = NaiveDate::parse_from_str(req.date.trim(), "%Y-%m-%d").map_err(|_| {
        ApiError::BadRequest(format!("Invalid date '{}', expected YYYY-MM-DD", req.date))
    })?;

    let event_type: EventType = req.event_type.trim().parse().map_err(ApiError::BadRequest)?;

    let grade = match event_type {
        EventType::Global => {
            authorization::require(&auth.user, Action::CreateGlobalEvent)?;
            None
        }
        EventType::Grade => {
            let capability = authorization::require(&auth.user, Action::CreateGradeEvent)?;
            let grade = match non_blank(req.grade) {
                Some(grade) => grade,
                None if capability == Capability::OwnGrade => {
                    auth.user.grade.clone().ok_or_else(|| {
                        ApiError::BadRequest("Grade is required for grade events".to_string())
                    })?
                }
                None => {
                    return Err(ApiError::BadRequest(
                        "Grade is required for grade events".to_string(),
                    ))
                }
            };
            authorization::require_grade(&auth.user, Action::CreateGradeEvent, &grade)?;
            Some(grade)
        }
    };

    let event = state
        .store
        .insert_event(NewEvent {
            name: req.name.trim().to_string(),
            date,
            event_type,
            grade,
            created_by: auth.user_id(),
        })
        .await?;

    tracing::info!(
        event_id = event.id,
        event_type = %event.event_type,
        user_id = auth.user_id(),
        "Event created"
    );

    Ok((StatusCode::CREATED, Json(event)))
}

/// Record attendance for an event
///
/// ```text
/// POST /api/events/1/attendance
///
/// { "attendees": [1, 4, 7] }
/// ```
///
/// Replaces every earlier attendance record of the event.
///
/// # Errors
///
/// - `400 Bad Request`: A listed member does not exist or is not eligible
/// - `403 Forbidden`: Caller cannot record attendance for this event
/// - `404 Not Found`: No such event
pub async fn record_attendance(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<u64>,
    Json(req): Json<AttendanceRequest>,
) -> ApiResult<Json<AttendanceResponse>> {
    let event = state
        .store
        .find_event(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found".to_string()))?;

    match &event.grade {
        Some(grade) if event.event_type == EventType::Grade => {
            authorization::require_grade(&auth.user, Action::RecordAttendance, grade)?;
        }
        _ => {
            // Global attendance spans every grade
            if authorization::require(&auth.user, Action::RecordAttendance)? != Capability::AnyGrade
            {
                return Err(ApiError::Forbidden(
                    "Not authorized to record attendance for global events".to_string(),
                ));
            }
        }
    }

    let eligible: Vec<_> = state
        .store
        .list_members()
        .await?
        .into_iter()
        .filter(|member| event.admits(&member.grade))
        .collect();

    let attendees: BTreeSet<u64> = req.attendees.iter().copied().collect();
    if let Some(unknown) = attendees
        .iter()
        .find(|id| !eligible.iter().any(|member| member.id == **id))
    {
        return Err(ApiError::BadRequest(format!(
            "Member {} is not eligible for this event",
            unknown
        )));
    }

    let records = eligible
        .into_iter()
        .map(|member| Attendance {
            event_id: event.id,
            member_id: member.id,
            attended: attendees.contains(&member.id),
            grade: member.grade,
        })
        .collect();

    let attendance = state.store.replace_attendance(event.id, records).await?;

    tracing::info!(
        event_id = event.id,
        attended = attendees.len(),
        recorded = attendance.len(),
        user_id = auth.user_id(),
        "Attendance recorded"
    );

    Ok(Json(AttendanceResponse {
        message: "Attendance recorded successfully".to_string(),
        attendance,
    }))
}

/// Attendance statistics for every event
///
/// ```json
/// [
///   {
///     "eventId": 1,
///     "eventName": "Spring Camp",
///     "type": "global",
///     "date": "2026-04-10",
///     "gradeAttendance": { "7": 12, "8": 9 },
///     "totalAttendees": 21
///   }
/// ]
/// ```
pub async fn event_stats(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<EventStats>>> {
    authorization::require(&auth.user, Action::ViewEventStats)?;

    let attendance = state.store.list_attendance().await?;

    let stats = state
        .store
        .list_events()
        .await?
        .into_iter()
        .map(|event| {
            let mut grade_attendance: BTreeMap<String, u64> = BTreeMap::new();
            for record in attendance
                .iter()
                .filter(|record| record.event_id == event.id && record.attended)
            {
                *grade_attendance.entry(record.grade.clone()).or_insert(0) += 1;
            }

            EventStats {
                event_id: event.id,
                event_name: event.name,
                event_type: event.event_type,
                date: event.date,
                total_attendees: grade_attendance.values().sum(),
                grade_attendance,
            }
        })
        .collect();

    Ok(Json(stats))
}
