//! WebSocket transport
//!
//! Responsibilities:
//! - accept TCP connections and upgrade them
//! - refuse connections past `hub.max_connections`, counting sockets from
//!   accept until their cleanup has run, handshakes in flight included
//! - register a `Connection` per socket and forward router output to it
//! - parse inbound frames and hand them to the router
//! - run the router's disconnect cleanup exactly once per socket
//!
//! A bad frame only costs that frame: it is logged and skipped, and the
//! connection stays open.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::accept_async;
use tracing::{debug, info, warn};
use tungstenite::protocol::Message as WsMessage;

use crate::client::Connection;
use crate::config::Settings;
use crate::hub::Router;
use crate::transport::message::ClientEvent;
use crate::utils::Result;

/// One of the `hub.max_connections` places. Released on drop.
#[derive(Debug)]
pub(crate) struct ConnectionSlot {
    active: Arc<AtomicUsize>,
}

impl ConnectionSlot {
    pub(crate) fn acquire(active: &Arc<AtomicUsize>, limit: usize) -> Option<Self> {
        if active.fetch_add(1, Ordering::SeqCst) >= limit {
            active.fetch_sub(1, Ordering::SeqCst);
            return None;
        }
        Some(Self {
            active: Arc::clone(active),
        })
    }
}

impl Drop for ConnectionSlot {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Binds `addr` and serves until the listener fails.
pub async fn start_websocket_server(
    addr: &str,
    router: Arc<Router>,
    settings: Settings,
) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    serve(listener, router, settings).await
}

/// Accept loop over an already bound listener.
pub async fn serve(listener: TcpListener, router: Arc<Router>, settings: Settings) -> Result<()> {
    info!("WebSocket server listening on ws://{}", listener.local_addr()?);
    let limit = settings.hub.max_connections;
    let active = Arc::new(AtomicUsize::new(0));

    loop {
        let (stream, peer) = listener.accept().await?;
        let Some(slot) = ConnectionSlot::acquire(&active, limit) else {
            warn!(%peer, limit, "connection limit reached, refusing");
            drop(stream);
            continue;
        };

        let router = router.clone();
        tokio::spawn(async move {
            handle_socket(stream, router).await;
            drop(slot);
            debug!(%peer, "socket task finished");
        });
    }
}

async fn handle_socket(stream: TcpStream, router: Arc<Router>) {
    let ws_stream = match accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            warn!("WebSocket handshake error: {e}");
            return;
        }
    };
    let (mut ws_sender, mut ws_receiver) = ws_stream.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<WsMessage>();
    let connection = Connection::new(tx);
    let connection_id = connection.id.clone();
    router.register(connection);
    info!(connection = %connection_id, "connection opened");

    let cleanup_called = Arc::new(AtomicBool::new(false));
    let do_cleanup = {
        let router = router.clone();
        let connection_id = connection_id.clone();
        let cleanup_called = cleanup_called.clone();

        move || {
            if !cleanup_called.swap(true, Ordering::SeqCst) {
                router.disconnect(&connection_id);
                info!(connection = %connection_id, "connection closed");
            }
        }
    };

    let send_task = {
        let connection_id = connection_id.clone();
        let do_cleanup = do_cleanup.clone();

        tokio::spawn(async move {
            while let Some(msg) = rx.recv().await {
                if let Err(e) = ws_sender.send(msg).await {
                    debug!(connection = %connection_id, "failed to send frame: {e}");
                    break;
                }
            }
            do_cleanup();
            let _ = ws_sender.close().await;
        })
    };

    while let Some(frame) = ws_receiver.next().await {
        match frame {
            Ok(WsMessage::Text(text)) => handle_frame(&router, &connection_id, &text),
            Ok(WsMessage::Close(_)) => break,
            Ok(WsMessage::Ping(_) | WsMessage::Pong(_) | WsMessage::Frame(_)) => {}
            Ok(WsMessage::Binary(_)) => {
                warn!(connection = %connection_id, "binary frame ignored");
            }
            Err(e) => {
                debug!(connection = %connection_id, "read error: {e}");
                break;
            }
        }
    }

    // dropping the router's sender ends the send task
    do_cleanup();
    let _ = send_task.await;
}

/// Parses one text frame and dispatches it. Unparseable frames are logged
/// and dropped.
pub fn handle_frame(router: &Router, connection_id: &str, text: &str) {
    match serde_json::from_str::<ClientEvent>(text) {
        Ok(event) => dispatch(router, connection_id, event),
        Err(err) => {
            warn!(
                connection = %connection_id,
                "invalid client event: {err} | {}",
                text.chars().take(100).collect::<String>()
            );
        }
    }
}

/// Routes one inbound event on behalf of `connection_id`.
pub fn dispatch(router: &Router, connection_id: &str, event: ClientEvent) {
    match event {
        ClientEvent::UserOnline(user_id) => router.set_online(&user_id, connection_id),
        ClientEvent::JoinChat(room_id) => {
            router.join(connection_id, &room_id);
        }
        ClientEvent::SendMessage(body) => {
            router.send_message(connection_id, body);
        }
        ClientEvent::TypingStart(typing) => {
            router.typing_start(
                connection_id,
                &typing.room_id,
                &typing.user_id,
                &typing.display_name,
            );
        }
        ClientEvent::TypingStop(typing) => router.typing_stop(&typing.user_id),
        ClientEvent::AdminAlert(payload) => {
            router.admin_alert(payload);
        }
    }
}
