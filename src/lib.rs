//! # socialhub
//!
//! `socialhub` is the real-time layer of a social-networking backend. It
//! tracks which users are connected, routes chat, typing, and engagement
//! events to the right live connections, and keeps durable per-user
//! notification records alongside the live pushes.
//!
//! ## Core Modules
//!
//! - `hub`: presence registry, room membership, typing tracker, and the event router.
//! - `client`: the live connection record the router delivers to.
//! - `notifications`: durable notification records backed by `sled`.
//! - `notify`: write-then-push entry points for request handlers.
//! - `transport`: the WebSocket protocol and server loop.
//! - `config`: configuration loading.
//! - `utils`: error type and logging.

pub mod client;
pub mod config;
pub mod hub;
pub mod notifications;
pub mod notify;
pub mod transport;
pub mod utils;

pub use hub::Router;
pub use notify::{Delivery, Notifier};
