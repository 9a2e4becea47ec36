//! The real-time core: who is online, which connections share a room, who is
//! typing, and where each event goes.
//!
//! `Router` is the only type the rest of the crate talks to; the registries
//! below it are plain owned state with no locking of their own.

pub mod event;
pub mod presence;
pub mod room;
pub mod router;
pub mod typing;

pub use event::OutboundEvent;
pub use router::Router;
