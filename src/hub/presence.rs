//! Presence Registry
//!
//! Authoritative record of who is online. Each user id maps to at most one
//! connection id and each connection id is bound to at most one user id; a
//! reverse index keeps both directions in step.
//!
//! A new registration for a user overwrites the previous one (last
//! registration wins). The superseded connection is not torn down; it simply
//! stops being the user's address, so a later disconnect of that stale
//! connection leaves the newer entry alone.

use std::collections::{BTreeMap, HashMap};

use crate::client::{ConnectionId, UserId};

#[derive(Debug, Default)]
pub struct PresenceRegistry {
    by_user: BTreeMap<UserId, ConnectionId>,
    by_connection: HashMap<ConnectionId, UserId>,
}

impl PresenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `user_id` to `connection_id`, replacing whatever either side was
    /// bound to before. Returns the connection that lost `user_id`, if the
    /// user was bound elsewhere.
    pub fn set_online(&mut self, user_id: &str, connection_id: &str) -> Option<ConnectionId> {
        // the connection may have been registered under another user
        if let Some(previous_user) = self.by_connection.remove(connection_id) {
            if previous_user != user_id {
                self.by_user.remove(&previous_user);
            }
        }

        let displaced = self
            .by_user
            .insert(user_id.to_string(), connection_id.to_string())
            .filter(|previous_conn| previous_conn != connection_id);
        if let Some(previous_conn) = &displaced {
            self.by_connection.remove(previous_conn);
        }

        self.by_connection
            .insert(connection_id.to_string(), user_id.to_string());
        displaced
    }

    pub fn get_connection(&self, user_id: &str) -> Option<&ConnectionId> {
        self.by_user.get(user_id)
    }

    pub fn user_of(&self, connection_id: &str) -> Option<&UserId> {
        self.by_connection.get(connection_id)
    }

    /// Removes the user bound to `connection_id` and returns it. Unknown or
    /// superseded connections are a no-op.
    pub fn drop_connection(&mut self, connection_id: &str) -> Option<UserId> {
        let user_id = self.by_connection.remove(connection_id)?;
        self.by_user.remove(&user_id);
        Some(user_id)
    }

    /// Currently online user ids, ascending.
    pub fn online_users(&self) -> Vec<UserId> {
        self.by_user.keys().cloned().collect()
    }

    pub fn is_online(&self, user_id: &str) -> bool {
        self.by_user.contains_key(user_id)
    }

    pub fn len(&self) -> usize {
        self.by_user.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_user.is_empty()
    }
}
