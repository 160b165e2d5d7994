/// Banner and health check endpoints
///
/// # Endpoints
///
/// ```text
/// GET /         -> "ScoutsTribe Server is running!"
/// GET /health
/// ```
///
/// # Health Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "users": 3
/// }
/// ```

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

/// Plain-text banner served at the root
pub const BANNER: &str = "ScoutsTribe Server is running!";

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Application version
    pub version: String,

    /// Number of registered users
    pub users: usize,
}

/// Root banner handler
pub async fn banner() -> &'static str {
    BANNER
}

/// Health check handler
///
/// Reports `degraded` instead of failing when the store cannot be read.
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let (status, users) = match state.store.list_users().await {
        Ok(users) => ("healthy", users.len()),
        Err(e) => {
            tracing::warn!("Health check could not read users: {}", e);
            ("degraded", 0)
        }
    };

    Ok(Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        users,
    }))
}
