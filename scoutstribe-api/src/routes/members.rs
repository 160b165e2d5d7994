/// Member roster endpoints
///
/// Counselors manage the scouts of their own grade. Admins and Tribe Leaders
/// manage every grade and run the bulk operations: transfers between grades
/// and the yearly grade advancement.
///
/// # Endpoints
///
/// - `GET /api/grade/members` - Members visible to the caller
/// - `POST /api/grade/members` - Register a member
/// - `PUT /api/grade/members/:id` - Edit a member
/// - `DELETE /api/grade/members/:id` - Remove a member
/// - `GET /api/members/search?query=&year=&grade=` - Filter members
/// - `POST /api/members/transfer` - Move members to another grade
/// - `POST /api/members/advance-grades[?year=YYYY]` - Recompute grades
///
/// # Advancement
///
/// A member's grade is derived from `initialGrade` and `registrationYear`,
/// so advancing twice in the same year changes nothing. Editing a member's
/// grade or transferring it re-anchors both fields at the new grade.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::{non_blank, not_blank, MessageResponse},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{Datelike, Utc};
use scoutstribe_shared::{
    auth::{
        authorization::{self, Action, Capability},
        middleware::AuthContext,
    },
    grade,
    models::{Member, NewMember, User},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Register member request
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateMemberRequest {
    #[validate(custom(function = "not_blank", message = "First name is required"))]
    pub first_name: String,
    pub last_name: Option<String>,

    /// Registration year, defaults to the current year
    #[serde(alias = "registrationYear")]
    pub year: Option<String>,

    /// Grade, defaults to the caller's grade for Counselors
    pub grade: Option<String>,
}

/// Edit member request; absent fields are left unchanged
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateMemberRequest {
    #[validate(custom(function = "not_blank", message = "First name is required"))]
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub grade: Option<String>,
}

/// Search filters, all optional
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    /// Case-insensitive substring of the member's name
    pub query: Option<String>,

    /// Exact registration year
    pub year: Option<String>,

    /// Grade
    pub grade: Option<String>,
}

/// Transfer request
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct TransferRequest {
    /// Member IDs to move
    #[validate(length(min = 1, message = "No members selected"))]
    pub members: Vec<u64>,

    #[validate(custom(function = "not_blank", message = "New grade is required"))]
    pub new_grade: String,

    /// Registration year at the new grade, defaults to the current year
    pub year: Option<String>,
}

/// Transfer response
#[derive(Debug, Serialize, Deserialize)]
pub struct TransferResponse {
    pub message: String,
    pub members: Vec<Member>,
}

/// Advancement parameters
#[derive(Debug, Default, Deserialize)]
pub struct AdvanceQuery {
    /// Year to advance to, defaults to the current year
    pub year: Option<i32>,
}

/// A member the advancement skipped
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvanceFailure {
    pub member_id: u64,
    pub name: String,
    pub error: String,
}

/// Advancement response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvanceResponse {
    pub message: String,

    /// Members whose grade changed
    pub updated_members: Vec<Member>,

    pub errors: Vec<AdvanceFailure>,
}

fn current_year() -> i32 {
    Utc::now().year()
}

/// Validates a registration year, falling back to the current year
fn registration_year(year: Option<String>) -> ApiResult<String> {
    match non_blank(year) {
        Some(year) => match year.parse::<i32>() {
            Ok(value) if (1000..=9999).contains(&value) => Ok(year),
            _ => Err(ApiError::BadRequest(format!(
                "Invalid registration year: {}",
                year
            ))),
        },
        None => Ok(current_year().to_string()),
    }
}

/// Resolves the grade a member is written to
///
/// Falls back to the caller's own grade when they are limited to it.
fn target_grade(user: &User, requested: Option<String>) -> ApiResult<String> {
    let capability = authorization::require(user, Action::ManageMembers)?;

    let grade = match non_blank(requested) {
        Some(grade) => grade,
        None if capability == Capability::OwnGrade => user
            .grade
            .clone()
            .ok_or_else(|| ApiError::BadRequest("Grade is required".to_string()))?,
        None => return Err(ApiError::BadRequest("Grade is required".to_string())),
    };

    authorization::require_grade(user, Action::ManageMembers, &grade)?;

    Ok(grade)
}

async fn find_member(state: &AppState, id: u64) -> ApiResult<Member> {
    state
        .store
        .find_member(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Member not found".to_string()))
}

/// List members visible to the caller
///
/// # Response
///
/// ```json
/// [
///   {
///     "id": 1,
///     "firstName": "Noa",
///     "lastName": "Levi",
///     "grade": "8",
///     "registrationYear": "2025",
///     "initialGrade": "7"
///   }
/// ]
/// ```
pub async fn list_members(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Member>>> {
    authorization::require(&auth.user, Action::ViewMembers)?;

    let members = state
        .store
        .list_members()
        .await?
        .into_iter()
        .filter(|member| authorization::can_access(&auth.user, Action::ViewMembers, &member.grade))
        .collect();

    Ok(Json(members))
}

/// Register a member
///
/// ```text
/// POST /api/grade/members
///
/// { "firstName": "Noa", "lastName": "Levi", "year": "2026", "grade": "8" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Missing first name or grade, invalid year
/// - `403 Forbidden`: Counselor registering into another grade
pub async fn create_member(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateMemberRequest>,
) -> ApiResult<(StatusCode, Json<Member>)> {
    req.validate()?;

    let grade = target_grade(&auth.user, req.grade)?;
    let registration_year = registration_year(req.year)?;

    let member = state
        .store
        .insert_member(NewMember {
            first_name: req.first_name.trim().to_string(),
            last_name: non_blank(req.last_name).unwrap_or_default(),
            grade,
            registration_year,
        })
        .await?;

    tracing::info!(
        member_id = member.id,
        grade = %member.grade,
        user_id = auth.user_id(),
        "Member registered"
    );

    Ok((StatusCode::CREATED, Json(member)))
}

/// Edit a member
///
/// Changing the grade requires access to both the old and the new grade.
pub async fn update_member(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<u64>,
    Json(req): Json<UpdateMemberRequest>,
) -> ApiResult<Json<Member>> {
    req.validate()?;

    let mut member = find_member(&state, id).await?;
    authorization::require_grade(&auth.user, Action::ManageMembers, &member.grade)?;

    if let Some(first_name) = req.first_name {
        member.first_name = first_name.trim().to_string();
    }

    if let Some(last_name) = req.last_name {
        member.last_name = last_name.trim().to_string();
    }

    if let Some(grade) = non_blank(req.grade) {
        if !grade::equivalent(&grade, &member.grade) {
            authorization::require_grade(&auth.user, Action::ManageMembers, &grade)?;
            member.initial_grade = grade.clone();
            member.registration_year = current_year().to_string();
            member.grade = grade;
        }
    }

    let member = state
        .store
        .update_member(member)
        .await?
        .ok_or_else(|| ApiError::NotFound("Member not found".to_string()))?;

    tracing::info!(member_id = member.id, user_id = auth.user_id(), "Member updated");

    Ok(Json(member))
}

/// Remove a member
pub async fn delete_member(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<u64>,
) -> ApiResult<Json<MessageResponse>> {
    let member = find_member(&state, id).await?;
    authorization::require_grade(&auth.user, Action::ManageMembers, &member.grade)?;

    if !state.store.delete_member(member.id).await? {
        return Err(ApiError::NotFound("Member not found".to_string()));
    }

    tracing::info!(member_id = member.id, user_id = auth.user_id(), "Member deleted");

    Ok(Json(MessageResponse::new("Member deleted successfully")))
}

/// Search members
///
/// Filters combine with AND; results are limited to grades the caller can
/// view.
///
/// ```text
/// GET /api/members/search?query=noa&year=2025&grade=8
/// ```
pub async fn search_members(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(params): Query<SearchQuery>,
) -> ApiResult<Json<Vec<Member>>> {
    authorization::require(&auth.user, Action::ViewMembers)?;

    let query = non_blank(params.query).map(|q| q.to_lowercase());
    let year = non_blank(params.year);
    let grade_filter = non_blank(params.grade);

    let members = state
        .store
        .list_members()
        .await?
        .into_iter()
        .filter(|member| authorization::can_access(&auth.user, Action::ViewMembers, &member.grade))
        .filter(|member| match &query {
            Some(q) => member.full_name().to_lowercase().contains(q.as_str()),
            None => true,
        })
        .filter(|member| match &year {
            Some(y) => member.registration_year == *y,
            None => true,
        })
        .filter(|member| match &grade_filter {
            Some(g) => grade::equivalent(&member.grade, g),
            None => true,
        })
        .collect();

    Ok(Json(members))
}

/// Transfer members to another grade
///
/// ```text
/// POST /api/members/transfer
///
/// { "members": [1, 2], "newGrade": "9", "year": "2026" }
/// ```
///
/// Every listed member must exist; otherwise nothing is changed.
///
/// # Errors
///
/// - `400 Bad Request`: No members or no grade given, invalid year
/// - `403 Forbidden`: Caller is not an Admin or Tribe Leader
/// - `404 Not Found`: A listed member does not exist
pub async fn transfer_members(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<TransferRequest>,
) -> ApiResult<Json<TransferResponse>> {
    authorization::require(&auth.user, Action::TransferMembers)?;

    req.validate()?;

    let new_grade = req.new_grade.trim().to_string();
    let year = registration_year(req.year)?;

    let mut moved = Vec::with_capacity(req.members.len());
    for id in &req.members {
        let mut member = state
            .store
            .find_member(*id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Member {} not found", id)))?;

        member.grade = new_grade.clone();
        member.initial_grade = new_grade.clone();
        member.registration_year = year.clone();
        moved.push(member);
    }

    let members = state.store.update_members(moved).await?;

    tracing::info!(
        count = members.len(),
        grade = %new_grade,
        user_id = auth.user_id(),
        "Members transferred"
    );

    Ok(Json(TransferResponse {
        message: format!("{} members transferred to grade {}", members.len(), new_grade),
        members,
    }))
}

/// Recompute every member's grade for a year
///
/// Members with a named-track grade, a bad registration year, or who would
/// pass the last grade are left unchanged and reported in `errors`.
///
/// ```json
/// {
///   "message": "Updated 2 members",
///   "updatedMembers": [...],
///   "errors": [{ "memberId": 5, "name": "Dana Cohen", "error": "member has graduated (would be grade 13)" }]
/// }
/// ```
pub async fn advance_grades(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(params): Query<AdvanceQuery>,
) -> ApiResult<Json<AdvanceResponse>> {
    authorization::require(&auth.user, Action::AdvanceGrades)?;

    let year = params.year.unwrap_or_else(current_year);

    let mut changed = Vec::new();
    let mut errors = Vec::new();
    for mut member in state.store.list_members().await? {
        match grade::advanced_grade(&member.initial_grade, &member.registration_year, year) {
            Ok(advanced) if advanced != member.grade => {
                member.grade = advanced;
                changed.push(member);
            }
            Ok(_) => {}
            Err(e) => errors.push(AdvanceFailure {
                member_id: member.id,
                name: member.full_name(),
                error: e.to_string(),
            }),
        }
    }

    let updated_members = if changed.is_empty() {
        changed
    } else {
        state.store.update_members(changed).await?
    };

    tracing::info!(
        year,
        updated = updated_members.len(),
        skipped = errors.len(),
        user_id = auth.user_id(),
        "Grades advanced"
    );

    Ok(Json(AdvanceResponse {
        message: format!("Updated {} members", updated_members.len()),
        updated_members,
        errors,
    }))
}
