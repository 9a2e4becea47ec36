//! The `transport` module speaks the WebSocket side of the hub.
//!
//! It defines the inbound event protocol, turns frames into router calls,
//! and runs the accept loop that owns every socket.

pub mod message;
pub mod websocket;

pub use message::ClientEvent;
pub use websocket::{dispatch, handle_frame, serve, start_websocket_server};
