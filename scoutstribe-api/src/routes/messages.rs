/// Message endpoints
///
/// Reading and posting require access to the channel. Editing and deleting
/// additionally require being the author or an Admin.
///
/// # Endpoints
///
/// - `GET /api/channels/:channel_id/messages`
/// - `POST /api/channels/:channel_id/messages`
/// - `PUT /api/channels/:channel_id/messages/:message_id`
/// - `DELETE /api/channels/:channel_id/messages/:message_id`

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::{not_blank, MessageResponse},
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
    },
    models::{Channel, Message, NewMessage, User},
};
use serde::Deserialize;
use validator::Validate;

/// Send or edit message request
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct MessageRequest {
    #[validate(custom(function = "not_blank", message = "Message text is required"))]
    pub text: String,
}

/// Loads a channel and checks the caller may use it
async fn accessible_channel(
    state: &AppState,
    user: &User,
    channel_id: u64,
) -> ApiResult<Channel> {
    let channel = state
        .store
        .find_channel(channel_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Channel not found".to_string()))?;

    authorization::require_grade(user, Action::ViewChannel, &channel.grade)?;

    Ok(channel)
}

/// Loads a message that must belong to `channel`
async fn channel_message(state: &AppState, channel: &Channel, message_id: u64) -> ApiResult<Message> {
    state
        .store
        .find_message(message_id)
        .await?
        .filter(|message| message.channel_id == channel.id)
        .ok_or_else(|| ApiError::NotFound("Message not found".to_string()))
}

/// List messages of a channel in posting order
///
/// # Response
///
/// ```json
/// [
///   {
///     "id": 1,
///     "channelId": 1,
///     "userId": 3,
///     "userName": "counselor@scoutstribe.com",
///     "text": "Hike on Friday",
///     "timestamp": "2026-03-01T10:00:00Z",
///     "edited": false
///   }
/// ]
/// ```
pub async fn list_messages(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(channel_id): Path<u64>,
) -> ApiResult<Json<Vec<Message>>> {
    let channel = accessible_channel(&state, &auth.user, channel_id).await?;

    Ok(Json(state.store.list_messages(channel.id).await?))
}

/// Post a message to a channel
///
/// The author's email is recorded as the display name.
pub async fn send_message(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(channel_id): Path<u64>,
    Json(req): Json<MessageRequest>,
) -> ApiResult<(StatusCode, Json<Message>)> {
    req.validate()?;
    let channel = accessible_channel(&state, &auth.user, channel_id).await?;

    let message = state
        .store
        .insert_message(NewMessage {
            channel_id: channel.id,
            user_id: auth.user.id,
            user_name: auth.user.email.clone(),
            text: req.text,
        })
        .await?;

    tracing::debug!(channel_id = channel.id, message_id = message.id, "Message sent");

    Ok((StatusCode::CREATED, Json(message)))
}

/// Edit a message
///
/// # Errors
///
/// - `403 Forbidden`: Caller is neither the author nor an Admin
/// - `404 Not Found`: Channel or message missing, or message in another channel
pub async fn edit_message(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((channel_id, message_id)): Path<(u64, u64)>,
    Json(req): Json<MessageRequest>,
) -> ApiResult<Json<Message>> {
    req.validate()?;
    let channel = accessible_channel(&state, &auth.user, channel_id).await?;
    let mut message = channel_message(&state, &channel, message_id).await?;

    authorization::require_message_author(&auth.user, &message)?;

    message.text = req.text;
    message.edited = true;

    let message = state
        .store
        .update_message(message)
        .await?
        .ok_or_else(|| ApiError::NotFound("Message not found".to_string()))?;

    tracing::debug!(message_id = message.id, user_id = auth.user_id(), "Message edited");

    Ok(Json(message))
}

/// Delete a message
pub async fn delete_message(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((channel_id, message_id)): Path<(u64, u64)>,
) -> ApiResult<Json<MessageResponse>> {
    let channel = accessible_channel(&state, &auth.user, channel_id).await?;
    let message = channel_message(&state, &channel, message_id).await?;

    authorization::require_message_author(&auth.user, &message)?;

    if !state.store.delete_message(message.id).await? {
        return Err(ApiError::NotFound("Message not found".to_string()));
    }

    tracing::info!(message_id = message.id, user_id = auth.user_id(), "Message deleted");

    Ok(Json(MessageResponse::new("Message deleted")))
}
