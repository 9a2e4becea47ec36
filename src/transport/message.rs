use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::UserId;
use crate::hub::room::RoomId;

/// Inbound frames: `{"event": <name>, "data": <payload>}`.
#[derive(Debug, Deserialize, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    UserOnline(UserId),
    JoinChat(RoomId),
    /// Object carrying at least `roomId`; the rest is relayed untouched.
    SendMessage(Value),
    TypingStart(TypingStart),
    TypingStop(TypingStop),
    AdminAlert(Value),
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingStart {
    pub room_id: RoomId,
    pub user_id: UserId,
    #[serde(default)]
    pub display_name: String,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingStop {
    pub user_id: UserId,
}
