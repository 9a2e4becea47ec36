//! Outbound event frames
//!
//! Every frame the hub pushes is `{"event": <name>, "data": <payload>}`. The
//! event name is an open string because REST handlers may push arbitrary
//! events through the internal call surface; the names the hub itself emits
//! are listed as constants.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tungstenite::protocol::Message as WsMessage;

use crate::client::UserId;

pub const ONLINE_USERS: &str = "online-users";
pub const NEW_MESSAGE: &str = "new-message";
pub const USER_TYPING: &str = "user-typing";
pub const NEW_LIKE: &str = "new-like";
pub const NEW_FOLLOWER: &str = "new-follower-notification";
pub const NEW_COMMENT: &str = "new-comment";
pub const NEW_REPLY: &str = "new-reply";
pub const NEW_SHARE: &str = "new-share";
pub const ADMIN_BROADCAST: &str = "admin-broadcast";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundEvent {
    pub event: String,
    pub data: Value,
}

impl OutboundEvent {
    pub fn new(event: impl Into<String>, data: Value) -> Self {
        Self {
            event: event.into(),
            data,
        }
    }

    pub fn online_users(users: Vec<UserId>) -> Self {
        Self::new(ONLINE_USERS, Value::from(users))
    }

    /// Serialize once so a fan-out clones the frame, not the payload tree.
    pub fn to_frame(&self) -> Option<WsMessage> {
        match serde_json::to_string(self) {
            Ok(json) => Some(WsMessage::text(json)),
            Err(e) => {
                tracing::error!(event = %self.event, "failed to serialize event: {e}");
                None
            }
        }
    }
}

/// Payload of `user-typing`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingPayload {
    pub user_id: UserId,
    pub display_name: String,
    pub room_id: String,
}
