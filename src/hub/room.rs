//! Room membership
//!
//! A `Room` holds the connection ids joined to one logical channel. Rooms are
//! created on first join and only lose members when a connection goes away;
//! there is no explicit leave. Rooms left empty by a disconnect are pruned.
//!
//! Callers synchronize access (the router keeps this behind its own lock).

use std::collections::{HashMap, HashSet};

use crate::client::ConnectionId;

pub type RoomId = String;

#[derive(Debug, Default)]
pub struct Room {
    pub id: RoomId,
    pub members: HashSet<ConnectionId>,
}

impl Room {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            members: HashSet::new(),
        }
    }

    /// Duplicate joins are ignored.
    pub fn join(&mut self, connection_id: ConnectionId) -> bool {
        self.members.insert(connection_id)
    }

    pub fn leave(&mut self, connection_id: &str) -> bool {
        self.members.remove(connection_id)
    }

    pub fn contains(&self, connection_id: &str) -> bool {
        self.members.contains(connection_id)
    }
}

#[derive(Debug, Default)]
pub struct RoomMembership {
    rooms: HashMap<RoomId, Room>,
    joined: HashMap<ConnectionId, HashSet<RoomId>>,
}

impl RoomMembership {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the connection to the room, creating the room if needed.
    /// Returns `false` when the connection was already a member.
    pub fn join(&mut self, connection_id: &str, room_id: &str) -> bool {
        let room = self
            .rooms
            .entry(room_id.to_string())
            .or_insert_with(|| Room::new(room_id));
        let added = room.join(connection_id.to_string());

        self.joined
            .entry(connection_id.to_string())
            .or_default()
            .insert(room_id.to_string());
        added
    }

    pub fn room(&self, room_id: &str) -> Option<&Room> {
        self.rooms.get(room_id)
    }

    pub fn is_member(&self, connection_id: &str, room_id: &str) -> bool {
        self.rooms
            .get(room_id)
            .is_some_and(|room| room.contains(connection_id))
    }

    /// Member connection ids of a room; empty for unknown rooms.
    pub fn members(&self, room_id: &str) -> impl Iterator<Item = &ConnectionId> {
        self.rooms
            .get(room_id)
            .into_iter()
            .flat_map(|room| room.members.iter())
    }

    pub fn rooms_of(&self, connection_id: &str) -> Vec<RoomId> {
        self.joined
            .get(connection_id)
            .map(|rooms| rooms.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Drops every membership of a connection and returns the rooms it left.
    pub fn remove_connection(&mut self, connection_id: &str) -> Vec<RoomId> {
        let Some(rooms) = self.joined.remove(connection_id) else {
            return Vec::new();
        };

        for room_id in &rooms {
            let now_empty = match self.rooms.get_mut(room_id) {
                Some(room) => {
                    room.leave(connection_id);
                    room.members.is_empty()
                }
                None => false,
            };
            if now_empty {
                self.rooms.remove(room_id);
            }
        }

        rooms.into_iter().collect()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
