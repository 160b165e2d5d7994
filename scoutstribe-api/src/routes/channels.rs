/// Channel endpoints
///
/// Channels are grade-scoped rooms. Admins and Tribe Leaders see and create
/// channels for every grade; Counselors only for their own.
///
/// # Endpoints
///
/// - `GET /api/channels` - Channels visible to the caller
/// - `POST /api/channels` - Create a channel

use crate::{
    app::AppState,
    error::ApiResult,
    routes::not_blank,
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use scoutstribe_shared::{
    auth::{
        authorization::{self, Action},
        middleware::AuthContext,
    },
    models::{Channel, NewChannel},
};
use serde::Deserialize;
use validator::Validate;

/// Create channel request
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct CreateChannelRequest {
    /// Channel name
    #[validate(
        custom(function = "not_blank", message = "Channel name is required"),
        length(max = 100, message = "Channel name is too long")
    )]
    pub name: String,

    /// Grade the channel belongs to
    #[validate(custom(function = "not_blank", message = "Grade is required"))]
    pub grade: String,
}

/// List channels the caller can access
///
/// # Endpoint
///
/// ```text
/// GET /api/channels
/// Authorization: Bearer <token>
/// ```
///
/// # Response
///
/// ```json
/// [
///   { "id": 1, "name": "Grade 8 Counselors", "grade": "8" }
/// ]
/// ```
pub async fn list_channels(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Channel>>> {
    let channels: Vec<Channel> = state
        .store
        .list_channels()
        .await?
        .into_iter()
        .filter(|channel| authorization::can_access_channel(&auth.user, channel))
        .collect();

    Ok(Json(channels))
}

/// Create a channel
///
/// # Endpoint
///
/// ```text
/// POST /api/channels
/// Authorization: Bearer <token>
/// Content-Type: application/json
///
/// { "name": "Grade 8 Counselors", "grade": "8" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Missing name or grade
/// - `403 Forbidden`: Counselor creating a channel for another grade
pub async fn create_channel(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateChannelRequest>,
) -> ApiResult<(StatusCode, Json<Channel>)> {
    req.validate()?;

    let name = req.name.trim().to_string();
    let grade = req.grade.trim().to_string();

    authorization::require_grade(&auth.user, Action::CreateChannel, &grade)?;

    let channel = state.store.insert_channel(NewChannel { name, grade }).await?;

    tracing::info!(
        channel_id = channel.id,
        grade = %channel.grade,
        user_id = auth.user_id(),
        "Channel created"
    );

    Ok((StatusCode::CREATED, Json(channel)))
}
