//! Typing tracker
//!
//! Ephemeral, never persisted. One entry per user, overwritten by every
//! `typing-start`, removed by `typing-stop` or when the user's connection
//! goes away. There is no inactivity timeout.

use std::collections::HashMap;

use crate::client::UserId;
use crate::hub::room::RoomId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypingEntry {
    pub room_id: RoomId,
    pub display_name: String,
}

#[derive(Debug, Default)]
pub struct TypingTracker {
    entries: HashMap<UserId, TypingEntry>,
}

impl TypingTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, user_id: &str, room_id: &str, display_name: &str) {
        self.entries.insert(
            user_id.to_string(),
            TypingEntry {
                room_id: room_id.to_string(),
                display_name: display_name.to_string(),
            },
        );
    }

    pub fn stop(&mut self, user_id: &str) -> Option<TypingEntry> {
        self.entries.remove(user_id)
    }

    pub fn get(&self, user_id: &str) -> Option<&TypingEntry> {
        self.entries.get(user_id)
    }

    /// Users currently typing in `room_id`.
    pub fn typing_in(&self, room_id: &str) -> Vec<UserId> {
        let mut users: Vec<UserId> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.room_id == room_id)
            .map(|(user, _)| user.clone())
            .collect();
        users.sort();
        users
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
