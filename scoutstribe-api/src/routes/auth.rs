/// Authentication endpoints
///
/// This module provides user authentication endpoints:
/// - Self-signup (Counselor role only)
/// - Login
/// - Logout
/// - Current user
///
/// # Endpoints
///
/// - `POST /api/auth/signup` - Register new user
/// - `POST /api/auth/login` - Login and get a bearer token
/// - `POST /api/auth/logout` - Acknowledge logout
/// - `GET /api/auth/me` - Currently authenticated user

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::{non_blank, MessageResponse},
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use scoutstribe_shared::{
    auth::{middleware::AuthContext, password, token},
    models::{user::parse_roles, NewUser, Role, RoleSet, UserView},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Signup request
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct SignupRequest {
    /// Email address
    #[validate(
        length(min = 1, message = "Email and password are required"),
        email(message = "Invalid email format")
    )]
    pub email: String,

    /// Password
    #[validate(length(min = 1, message = "Email and password are required"))]
    pub password: String,

    /// Requested roles, defaults to Counselor
    pub roles: Option<Vec<String>>,

    /// Optional grade
    pub grade: Option<String>,
}

/// Login request
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct LoginRequest {
    /// Email address
    #[validate(length(min = 1, message = "Email and password are required"))]
    pub email: String,

    /// Password
    #[validate(length(min = 1, message = "Email and password are required"))]
    pub password: String,
}

/// Response carrying a single user
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub message: String,
    pub user: UserView,
}

/// Login response
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,

    /// Bearer token for the `Authorization` header
    pub token: String,

    pub user: UserView,
}

/// Register a new user
///
/// Anyone may sign up, but only as a Counselor. Other roles are granted
/// by Admins and Tribe Leaders through the admin endpoints.
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/signup
/// Content-Type: application/json
///
/// {
///   "email": "counselor@example.com",
///   "password": "secret",
///   "grade": "7"
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "message": "Signup successful",
///   "user": { "id": 4, "email": "counselor@example.com", "roles": ["Counselor"], "grade": "7" }
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Missing email or password, unknown role
/// - `403 Forbidden`: A role other than Counselor was requested
/// - `409 Conflict`: Email already exists
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    req.validate()?;

    let roles: RoleSet = match req.roles {
        Some(names) if !names.is_empty() => parse_roles(&names)?,
        _ => [Role::Counselor].into_iter().collect(),
    };

    if let Some(role) = roles.iter().find(|role| **role != Role::Counselor) {
        tracing::warn!(email = %req.email, role = %role, "Signup requested a privileged role");
        return Err(ApiError::Forbidden(format!(
            "The {} role cannot be requested at signup",
            role
        )));
    }

    let password_hash = password::hash_password(&req.password)?;

    let user = state
        .store
        .insert_user(NewUser {
            email: req.email.trim().to_string(),
            password_hash,
            roles,
            grade: non_blank(req.grade),
        })
        .await?;

    tracing::info!(user_id = user.id, email = %user.email, "User signed up");

    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            message: "Signup successful".to_string(),
            user: user.view(),
        }),
    ))
}

/// Login with email and password
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/login
/// Content-Type: application/json
///
/// {
///   "email": "leader@scoutstribe.com",
///   "password": "leader123"
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "message": "Login successful",
///   "token": "fake-jwt-token-for-user-2",
///   "user": { "id": 2, "email": "leader@scoutstribe.com", "roles": ["Tribe Leader"], "grade": "9" }
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Missing email or password
/// - `401 Unauthorized`: Unknown email or wrong password
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    req.validate()?;

    let invalid = || ApiError::Unauthorized("Invalid email or password".to_string());

    let user = state
        .store
        .find_user_by_email(req.email.trim())
        .await?
        .ok_or_else(invalid)?;

    if !password::verify_password(&req.password, &user.password_hash)? {
        tracing::debug!(user_id = user.id, "Login rejected: wrong password");
        return Err(invalid());
    }

    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token: token::issue_token(user.id),
        user: user.view(),
    }))
}

/// Logout
///
/// Tokens are not tracked server-side, so this only acknowledges the call.
pub async fn logout() -> Json<MessageResponse> {
    Json(MessageResponse::new("Logout successful"))
}

/// Currently authenticated user
pub async fn me(Extension(auth): Extension<AuthContext>) -> Json<UserView> {
    Json(auth.user.view())
}
