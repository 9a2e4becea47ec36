//! Event router
//!
//! The router owns the live state of the hub and decides who receives what:
//! - the connection table (every accepted socket)
//! - the presence registry (user id -> connection id)
//! - room membership (room id -> connection ids)
//! - the typing tracker (user id -> room, display name)
//!
//! Each map sits behind its own lock. Locks are always taken in the order
//! presence, rooms, typing, connections, and released before any storage I/O
//! (the router never performs any). Sends go to unbounded channels and never
//! block, so fan-out happens while the owning lock is held: presence
//! broadcasts leave in the order presence changes are applied, and chat
//! messages in one room leave in the order they were routed.
//!
//! Routing never fails. An offline recipient or an empty room means zero
//! deliveries, and a closed channel only costs that one delivery.

use std::collections::HashMap;

use parking_lot::Mutex;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::client::{Connection, ConnectionId, UserId};
use crate::hub::event::{self, OutboundEvent, TypingPayload};
use crate::hub::presence::PresenceRegistry;
use crate::hub::room::{RoomId, RoomMembership};
use crate::hub::typing::TypingTracker;

#[derive(Debug, Default)]
pub struct Router {
    presence: Mutex<PresenceRegistry>,
    rooms: Mutex<RoomMembership>,
    typing: Mutex<TypingTracker>,
    connections: Mutex<HashMap<ConnectionId, Connection>>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a freshly accepted connection. It receives global broadcasts from
    /// now on, even before it announces a user id.
    pub fn register(&self, connection: Connection) {
        debug!(connection = %connection.id, "connection registered");
        self.connections
            .lock()
            .insert(connection.id.clone(), connection);
    }

    pub fn connection_count(&self) -> usize {
        self.connections.lock().len()
    }

    pub fn is_registered(&self, connection_id: &str) -> bool {
        self.connections.lock().contains_key(connection_id)
    }

    /// `user-online`: binds the user to the connection (last registration
    /// wins) and sends the new online list to every connection. A connection
    /// that loses the user is unbound from it.
    pub fn set_online(&self, user_id: &str, connection_id: &str) {
        let mut presence = self.presence.lock();
        let displaced = presence.set_online(user_id, connection_id);
        info!(user = %user_id, connection = %connection_id, "user online");

        let mut connections = self.connections.lock();
        if let Some(stale) = displaced.and_then(|id| connections.get_mut(&id)) {
            debug!(connection = %stale.id, user = %user_id, "superseded connection unbound");
            stale.user_id = None;
        }
        if let Some(conn) = connections.get_mut(connection_id) {
            conn.user_id = Some(user_id.to_string());
        }

        let frame = OutboundEvent::online_users(presence.online_users());
        fan_out(&connections, connections.keys(), &frame);
    }

    pub fn get_connection(&self, user_id: &str) -> Option<ConnectionId> {
        self.presence.lock().get_connection(user_id).cloned()
    }

    pub fn online_users(&self) -> Vec<UserId> {
        self.presence.lock().online_users()
    }

    /// `join-chat`. Idempotent; returns `false` on a repeated join.
    pub fn join(&self, connection_id: &str, room_id: &str) -> bool {
        let joined = self.rooms.lock().join(connection_id, room_id);
        if joined {
            debug!(connection = %connection_id, room = %room_id, "joined room");
        }
        joined
    }

    pub fn room_members(&self, room_id: &str) -> Vec<ConnectionId> {
        let mut members: Vec<ConnectionId> =
            self.rooms.lock().members(room_id).cloned().collect();
        members.sort();
        members
    }

    pub fn rooms_of(&self, connection_id: &str) -> Vec<RoomId> {
        let mut rooms = self.rooms.lock().rooms_of(connection_id);
        rooms.sort();
        rooms
    }

    /// Transport-level disconnect. Forgets the connection, its room
    /// memberships, and (if it was the user's current connection) the user's
    /// presence and typing entries. Unknown ids are a no-op.
    pub fn disconnect(&self, connection_id: &str) {
        let mut presence = self.presence.lock();
        let went_offline = presence.drop_connection(connection_id);

        let left = self.rooms.lock().remove_connection(connection_id);

        if let Some(user_id) = &went_offline {
            self.typing.lock().stop(user_id);
        }

        let mut connections = self.connections.lock();
        let existed = connections.remove(connection_id).is_some();
        debug!(
            connection = %connection_id,
            existed,
            rooms_left = left.len(),
            "connection dropped"
        );

        if let Some(user_id) = went_offline {
            info!(user = %user_id, connection = %connection_id, "user offline");
            let frame = OutboundEvent::online_users(presence.online_users());
            fan_out(&connections, connections.keys(), &frame);
        }
    }

    /// `send-message`: relays the body to every connection in its room,
    /// sender included. The body must carry a string `roomId` and the sender
    /// must already be a member; anything else is dropped with a warning.
    pub fn send_message(&self, connection_id: &str, body: Value) -> usize {
        let Some(room_id) = body.get("roomId").and_then(Value::as_str).map(str::to_owned) else {
            warn!(connection = %connection_id, "send-message without roomId dropped");
            return 0;
        };

        let rooms = self.rooms.lock();
        if !rooms.is_member(connection_id, &room_id) {
            warn!(
                connection = %connection_id,
                room = %room_id,
                "send-message from a connection outside the room dropped"
            );
            return 0;
        }

        let connections = self.connections.lock();
        let sender = connections
            .get(connection_id)
            .and_then(|conn| conn.user_id.clone());
        let frame = OutboundEvent::new(event::NEW_MESSAGE, with_sender(body, sender));
        fan_out(&connections, rooms.members(&room_id), &frame)
    }

    /// `typing-start`: records the entry and tells every other member of the
    /// room.
    pub fn typing_start(
        &self,
        connection_id: &str,
        room_id: &str,
        user_id: &str,
        display_name: &str,
    ) -> usize {
        let rooms = self.rooms.lock();
        self.typing.lock().start(user_id, room_id, display_name);

        let payload = TypingPayload {
            user_id: user_id.to_string(),
            display_name: display_name.to_string(),
            room_id: room_id.to_string(),
        };
        let data = match serde_json::to_value(&payload) {
            Ok(data) => data,
            Err(e) => {
                warn!("failed to encode typing payload: {e}");
                return 0;
            }
        };

        let connections = self.connections.lock();
        let others = rooms
            .members(room_id)
            .filter(|member| member.as_str() != connection_id);
        fan_out(&connections, others, &OutboundEvent::new(event::USER_TYPING, data))
    }

    /// `typing-stop`.
    pub fn typing_stop(&self, user_id: &str) {
        self.typing.lock().stop(user_id);
    }

    pub fn is_typing(&self, user_id: &str) -> bool {
        self.typing.lock().get(user_id).is_some()
    }

    pub fn typing_in(&self, room_id: &str) -> Vec<UserId> {
        self.typing.lock().typing_in(room_id)
    }

    /// `admin-alert`. Authorization is the caller's job.
    pub fn admin_alert(&self, payload: Value) -> usize {
        self.broadcast_all(event::ADMIN_BROADCAST, payload)
    }

    /// Pushes to the single connection bound to `user_id`. Offline users are
    /// skipped silently: nothing is queued or retried.
    pub fn push_to_user(&self, user_id: &str, event_name: &str, payload: Value) -> bool {
        let presence = self.presence.lock();
        let Some(connection_id) = presence.get_connection(user_id) else {
            debug!(user = %user_id, event = %event_name, "recipient offline, push skipped");
            return false;
        };

        let connections = self.connections.lock();
        let frame = OutboundEvent::new(event_name, payload);
        fan_out(&connections, std::iter::once(connection_id), &frame) == 1
    }

    /// Sends to every registered connection regardless of rooms or presence.
    pub fn broadcast_all(&self, event_name: &str, payload: Value) -> usize {
        let connections = self.connections.lock();
        let frame = OutboundEvent::new(event_name, payload);
        fan_out(&connections, connections.keys(), &frame)
    }

    /// Sends to every connection currently joined to `room_id`.
    pub fn broadcast_to_room(&self, room_id: &str, event_name: &str, payload: Value) -> usize {
        let rooms = self.rooms.lock();
        let connections = self.connections.lock();
        let frame = OutboundEvent::new(event_name, payload);
        fan_out(&connections, rooms.members(room_id), &frame)
    }
}

/// Serializes `event` once and queues it on every target. Returns the number
/// of channels that accepted the frame.
fn fan_out<'a>(
    connections: &HashMap<ConnectionId, Connection>,
    targets: impl IntoIterator<Item = &'a ConnectionId>,
    event: &OutboundEvent,
) -> usize {
    let Some(frame) = event.to_frame() else {
        return 0;
    };

    let mut delivered = 0;
    for target in targets {
        match connections.get(target) {
            Some(conn) if conn.send(frame.clone()) => delivered += 1,
            Some(_) => debug!(
                connection = %target,
                event = %event.event,
                "send failed, channel closed"
            ),
            None => debug!(connection = %target, "no connection registered with id"),
        }
    }
    delivered
}

/// Fills in `sender` from the bound user id when the body has none.
fn with_sender(mut body: Value, sender: Option<UserId>) -> Value {
    if let (Some(map), Some(sender)) = (body.as_object_mut(), sender) {
        map.entry("sender").or_insert(Value::String(sender));
    }
    body
}
