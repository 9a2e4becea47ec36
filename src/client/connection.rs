//! Connection representation
//!
//! `Connection` holds the sending side of a per-connection channel used by
//! the router to push frames. The transport task owns the receiving side and
//! forwards whatever arrives to the socket.

use tokio::sync::mpsc::UnboundedSender;
use tungstenite::protocol::Message as WsMessage;
use uuid::Uuid;

pub type ConnectionId = String;
pub type UserId = String;

#[derive(Debug)]
pub struct Connection {
    pub id: ConnectionId,
    pub sender: UnboundedSender<WsMessage>,
    /// Set by the `user-online` handshake.
    pub user_id: Option<UserId>,
}

impl Connection {
    /// Create a connection with a fresh `conn-<uuid>` id.
    pub fn new(sender: UnboundedSender<WsMessage>) -> Self {
        Self::with_id(format!("conn-{}", Uuid::new_v4()), sender)
    }

    pub fn with_id(id: impl Into<ConnectionId>, sender: UnboundedSender<WsMessage>) -> Self {
        Self {
            id: id.into(),
            sender,
            user_id: None,
        }
    }

    /// Queue a frame for this connection. Returns `false` when the transport
    /// side is already gone.
    pub fn send(&self, msg: WsMessage) -> bool {
        self.sender.send(msg).is_ok()
    }
}
