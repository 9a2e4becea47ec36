//! The `client` module defines one live transport session as seen by the hub.
//!
//! A `Connection` is created when a socket is accepted and discarded when it
//! closes. It is never persisted.

pub mod connection;

pub use connection::{Connection, ConnectionId, UserId};
