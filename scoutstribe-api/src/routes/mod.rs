/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Banner and health check endpoints
/// - `auth`: Signup, login, logout and current user
/// - `channels`: Grade channels
/// - `messages`: Messages within a channel
/// - `admin`: User, role and grade administration
/// - `members`: Member roster, transfers and grade advancement
/// - `events`: Events, attendance and statistics

pub mod admin;
pub mod auth;
pub mod channels;
pub mod events;
pub mod health;
pub mod members;
pub mod messages;

use validator::ValidationError;

/// Field validator rejecting empty or whitespace-only strings
///
/// Used as `#[validate(custom(function = "not_blank", message = "..."))]`.
/// On `Option<String>` fields it only runs when a value is present.
pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Treats a blank optional string as absent
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Body of endpoints that only acknowledge an action
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
