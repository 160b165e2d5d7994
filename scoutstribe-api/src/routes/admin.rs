/// User administration endpoints
///
/// Admins and Tribe Leaders manage users; only Admins delete them. Role
/// changes are checked role by role, so a Tribe Leader can promote a
/// Counselor but can neither grant nor revoke Admin.
///
/// # Endpoints
///
/// - `GET /api/admin/users` - All users
/// - `POST /api/admin/users` - Create a user with any assignable roles
/// - `DELETE /api/admin/users/:id` - Delete a user (Admin only)
/// - `PUT /api/admin/users/:id/roles` - Replace a user's roles
/// - `PUT /api/admin/users/:id/grade` - Assign a grade
/// - `DELETE /api/admin/users/:id/grade` - Clear the grade
/// - `GET /api/admin/users/by-grade` - Users grouped by grade
/// - `GET /api/admin/grades/leadership` - Counselors and Tribe Leaders per grade

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::{auth::UserResponse, non_blank, not_blank, MessageResponse},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use scoutstribe_shared::{
    auth::{
        authorization::{self, Action},
        middleware::AuthContext,
        password,
    },
    models::{user::parse_roles, NewUser, Role, RoleSet, User, UserView},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

/// Key grouping users without an assigned grade
pub const UNASSIGNED_GRADE: &str = "unassigned";

/// Create user request
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct CreateUserRequest {
    #[validate(
        length(min = 1, message = "Email and password are required"),
        email(message = "Invalid email format")
    )]
    pub email: String,

    #[validate(length(min = 1, message = "Email and password are required"))]
    pub password: String,

    /// Roles to grant, defaults to Counselor
    pub roles: Option<Vec<String>>,

    pub grade: Option<String>,
}

/// Replace roles request
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateRolesRequest {
    pub roles: Vec<String>,
}

/// Assign grade request
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct UpdateGradeRequest {
    #[validate(custom(function = "not_blank", message = "Grade is required"))]
    pub grade: String,
}

/// Leadership staff of one grade
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeLeadership {
    pub counselors: Vec<UserView>,
    pub tribe_leaders: Vec<UserView>,
}

fn parse_requested_roles(names: &[String]) -> ApiResult<RoleSet> {
    let roles = parse_roles(names)?;
    if roles.is_empty() {
        return Err(ApiError::BadRequest("At least one role is required".to_string()));
    }
    Ok(roles)
}

async fn find_target(state: &AppState, id: u64) -> ApiResult<User> {
    state
        .store
        .find_user(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
}

async fn save_user(state: &AppState, user: User) -> ApiResult<User> {
    state
        .store
        .update_user(user)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
}

/// List all users
///
/// # Response
///
/// ```json
/// [
///   { "id": 1, "email": "admin@scoutstribe.com", "roles": ["Admin"], "grade": "operations" }
/// ]
/// ```
pub async fn list_users(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<UserView>>> {
    authorization::require(&auth.user, Action::ManageUsers)?;

    let users = state.store.list_users().await?;

    Ok(Json(users.iter().map(User::view).collect()))
}

/// Create a user
///
/// # Endpoint
///
/// ```text
/// POST /api/admin/users
/// Authorization: Bearer <token>
/// Content-Type: application/json
///
/// {
///   "email": "leader2@scoutstribe.com",
///   "password": "secret",
///   "roles": ["Tribe Leader"],
///   "grade": "10"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Missing fields, unknown or empty roles
/// - `403 Forbidden`: Caller cannot manage users or grant one of the roles
/// - `409 Conflict`: Email already exists
pub async fn create_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    authorization::require(&auth.user, Action::ManageUsers)?;
    req.validate()?;

    let roles = match req.roles {
        Some(names) => parse_requested_roles(&names)?,
        None => [Role::Counselor].into_iter().collect(),
    };

    authorization::require_role_change(&auth.user, &RoleSet::new(), &roles)?;

    let user = state
        .store
        .insert_user(NewUser {
            email: req.email.trim().to_string(),
            password_hash: password::hash_password(&req.password)?,
            roles,
            grade: non_blank(req.grade),
        })
        .await?;

    tracing::info!(user_id = user.id, created_by = auth.user_id(), "User created");

    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            message: "User created successfully".to_string(),
            user: user.view(),
        }),
    ))
}

/// Delete a user
///
/// # Errors
///
/// - `400 Bad Request`: Deleting one's own account
/// - `403 Forbidden`: Caller is not an Admin
/// - `404 Not Found`: No such user
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<u64>,
) -> ApiResult<Json<MessageResponse>> {
    authorization::require(&auth.user, Action::DeleteUsers)?;

    if id == auth.user_id() {
        return Err(ApiError::BadRequest(
            "Cannot delete your own account".to_string(),
        ));
    }

    if !state.store.delete_user(id).await? {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    tracing::info!(user_id = id, deleted_by = auth.user_id(), "User deleted");

    Ok(Json(MessageResponse::new("User deleted successfully")))
}

/// Replace a user's roles
///
/// ```text
/// PUT /api/admin/users/3/roles
///
/// { "roles": ["Counselor", "Tribe Leader"] }
/// ```
pub async fn update_roles(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<u64>,
    Json(req): Json<UpdateRolesRequest>,
) -> ApiResult<Json<UserResponse>> {
    authorization::require(&auth.user, Action::ManageUsers)?;

    let roles = parse_requested_roles(&req.roles)?;
    let mut user = find_target(&state, id).await?;

    authorization::require_role_change(&auth.user, &user.roles, &roles)?;

    user.roles = roles;
    let user = save_user(&state, user).await?;

    tracing::info!(
        user_id = user.id,
        roles = ?user.roles,
        changed_by = auth.user_id(),
        "User roles updated"
    );

    Ok(Json(UserResponse {
        message: "User roles updated successfully".to_string(),
        user: user.view(),
    }))
}

/// Assign a grade to a user
pub async fn update_grade(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<u64>,
    Json(req): Json<UpdateGradeRequest>,
) -> ApiResult<Json<UserResponse>> {
    authorization::require(&auth.user, Action::ManageUsers)?;
    req.validate()?;

    let mut user = find_target(&state, id).await?;
    user.grade = Some(req.grade.trim().to_string());
    let user = save_user(&state, user).await?;

    tracing::info!(user_id = user.id, grade = ?user.grade, "User grade updated");

    Ok(Json(UserResponse {
        message: "User grade updated successfully".to_string(),
        user: user.view(),
    }))
}

/// Clear a user's grade
pub async fn remove_grade(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<u64>,
) -> ApiResult<Json<UserResponse>> {
    authorization::require(&auth.user, Action::ManageUsers)?;

    let mut user = find_target(&state, id).await?;
    user.grade = None;
    let user = save_user(&state, user).await?;

    tracing::info!(user_id = user.id, "User grade removed");

    Ok(Json(UserResponse {
        message: "User grade removed successfully".to_string(),
        user: user.view(),
    }))
}

/// Users grouped by grade
///
/// Users without a grade are listed under `"unassigned"`.
///
/// ```json
/// {
///   "8": [{ "id": 3, "email": "counselor@scoutstribe.com", "roles": ["Counselor"], "grade": "8" }],
///   "operations": [{ "id": 1, "email": "admin@scoutstribe.com", "roles": ["Admin"], "grade": "operations" }]
/// }
/// ```
pub async fn users_by_grade(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<BTreeMap<String, Vec<UserView>>>> {
    authorization::require(&auth.user, Action::ManageUsers)?;

    let mut grouped: BTreeMap<String, Vec<UserView>> = BTreeMap::new();
    for user in state.store.list_users().await? {
        let key = user
            .grade
            .clone()
            .unwrap_or_else(|| UNASSIGNED_GRADE.to_string());
        grouped.entry(key).or_default().push(user.view());
    }

    Ok(Json(grouped))
}

/// Counselors and Tribe Leaders of each grade
///
/// ```json
/// {
///   "8": { "counselors": [...], "tribeLeaders": [] },
///   "9": { "counselors": [], "tribeLeaders": [...] }
/// }
/// ```
pub async fn leadership_by_grade(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<BTreeMap<String, GradeLeadership>>> {
    authorization::require(&auth.user, Action::ManageUsers)?;

    let mut leadership: BTreeMap<String, GradeLeadership> = BTreeMap::new();
    for user in state.store.list_users().await? {
        let Some(grade) = user.grade.clone() else {
            continue;
        };

        let is_counselor = user.has_role(Role::Counselor);
        let is_leader = user.has_role(Role::TribeLeader);
        if !is_counselor && !is_leader {
            continue;
        }

        let entry = leadership.entry(grade).or_default();
        if is_counselor {
            entry.counselors.push(user.view());
        }
        if is_leader {
            entry.tribe_leaders.push(user.view());
        }
    }

    Ok(Json(leadership))
}
