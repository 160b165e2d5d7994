/// Channel and message models
///
/// A channel is a grade-scoped messaging room. Messages belong to exactly one
/// channel and can be edited or deleted by their author or an Admin.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Grade-scoped messaging room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub id: u64,
    pub name: String,
    pub grade: String,
}

/// Input for creating a channel
#[derive(Debug, Clone)]
pub struct NewChannel {
    pub name: String,
    pub grade: String,
}

/// Message posted to a channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: u64,
    pub channel_id: u64,

    /// Author's user ID
    pub user_id: u64,

    /// Author's display name at send time
    pub user_name: String,

    pub text: String,
    pub timestamp: DateTime<Utc>,

    /// Set once the text has been changed after sending
    pub edited: bool,
}

/// Input for posting a message
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub channel_id: u64,
    pub user_id: u64,
    pub user_name: String,
    pub text: String,
}
