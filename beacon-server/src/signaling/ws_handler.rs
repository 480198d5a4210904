use axum::extract::ws::{CloseFrame, Message, Utf8Bytes, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::IntoResponse;
use beacon_core::{ConnectionId, RoomKey, SignalFrame};
use bytes::Bytes;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::config::KeepAlive;
use crate::server::AppState;
use crate::signaling::SignalingService;
use crate::transport::ConnectionHandle;

/// RFC 6455 close codes the relay sends.
const CLOSE_POLICY_VIOLATION: u16 = 1008;
const CLOSE_INTERNAL_ERROR: u16 = 1011;

#[derive(Debug, Deserialize)]
pub struct WsQuery {
    pub room: Option<String>,
}

/// How a session ended, out of `Active` or `Joining`.
enum SessionEnd {
    /// Transport closed or errored; nothing more to send.
    Disconnected,
    /// Keep-alive window elapsed with no inbound traffic.
    TimedOut,
    /// Unhandled fault inside the loop; close with an internal error code.
    Faulted,
}

/// Upgrade handler for `GET /ws?room=<key>`.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(query): Query<WsQuery>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, query, state))
}

/// Per-connection control loop.
///
/// A connection without a room key is closed with a policy violation
/// before any room logic runs. Everything after the join funnels through
/// the same cleanup below the session loop, so room membership is
/// released on every exit path.
async fn handle_socket(mut socket: WebSocket, query: WsQuery, state: AppState) {
    let Some(room) = query.room.filter(|room| !room.is_empty()).map(RoomKey::from) else {
        warn!("Rejecting connection without a room key");
        let _ = socket
            .send(Message::Close(Some(CloseFrame {
                code: CLOSE_POLICY_VIOLATION,
                reason: Utf8Bytes::from_static("room query parameter is required"),
            })))
            .await;
        return;
    };

    let id = ConnectionId::new();
    info!("New signaling connection {} for room {}", id, room);

    let (sender, mut receiver) = socket.split();
    let (tx, rx) = mpsc::unbounded_channel();
    let handle = ConnectionHandle::new(id.clone(), tx);

    let send_task = tokio::spawn(outbound_pump(sender, rx, state.keep_alive));

    let end = run_session(
        &mut receiver,
        &state.service,
        state.keep_alive,
        &room,
        &handle,
    )
    .await;

    state.service.leave(&id, &room);

    if let SessionEnd::Faulted = end {
        // Best effort: the pump may already be gone.
        let _ = handle.send(Message::Close(Some(CloseFrame {
            code: CLOSE_INTERNAL_ERROR,
            reason: Utf8Bytes::from_static("internal signaling error"),
        })));
    }

    // Dropping the last handle lets the pump drain its queue and exit.
    drop(handle);
    let _ = send_task.await;

    info!("Connection {} closed", id);
}

/// Inbound half of the per-connection state machine: joins the room, then
/// loops over frames until the transport closes, the keep-alive window
/// lapses, or an internal fault ends the session.
async fn run_session(
    receiver: &mut SplitStream<WebSocket>,
    service: &SignalingService,
    keep_alive: Option<KeepAlive>,
    room: &RoomKey,
    handle: &ConnectionHandle,
) -> SessionEnd {
    let id = handle.id().clone();

    match service.join(room, handle) {
        Ok(role) => debug!("Connection {} active in room {} as {:?}", id, room, role),
        Err(e) => {
            error!("Join failed for connection {} in room {}: {}", id, room, e);
            return SessionEnd::Faulted;
        }
    }

    loop {
        let next = match keep_alive {
            Some(keep_alive) => {
                match tokio::time::timeout(keep_alive.timeout, receiver.next()).await {
                    Ok(next) => next,
                    Err(_) => {
                        warn!("Connection {} missed its keep-alive window", id);
                        return SessionEnd::TimedOut;
                    }
                }
            }
            None => receiver.next().await,
        };

        match next {
            Some(Ok(Message::Text(text))) => match SignalFrame::parse(text.as_str()) {
                Ok(frame) => {
                    if let Err(e) = service.relay(&id, room, frame) {
                        error!("Relay failed for connection {}: {}", id, e);
                        return SessionEnd::Faulted;
                    }
                }
                // One bad frame never tears down the connection.
                Err(e) => warn!("Dropping malformed frame from {}: {}", id, e),
            },
            Some(Ok(Message::Close(_))) | None => {
                info!("Connection {} disconnected", id);
                return SessionEnd::Disconnected;
            }
            // Binary, ping and pong frames carry no signaling payload.
            Some(Ok(_)) => {}
            Some(Err(e)) => {
                warn!("Transport error on connection {}: {}", id, e);
                return SessionEnd::Disconnected;
            }
        }
    }
}

/// Outbound half: forwards queued frames to the socket in order and emits
/// keep-alive pings. Exits when the socket rejects a write or the last
/// `ConnectionHandle` is gone and the queue has drained.
async fn outbound_pump(
    mut sender: SplitSink<WebSocket, Message>,
    mut rx: mpsc::UnboundedReceiver<Message>,
    keep_alive: Option<KeepAlive>,
) {
    match keep_alive {
        Some(keep_alive) => {
            let mut ping = tokio::time::interval(keep_alive.interval);
            ping.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    msg = rx.recv() => match msg {
                        Some(msg) => {
                            if sender.send(msg).await.is_err() {
                                break;
                            }
                        }
                        None => break,
                    },
                    _ = ping.tick() => {
                        if sender.send(Message::Ping(Bytes::new())).await.is_err() {
                            break;
                        }
                    }
                }
            }
        }
        None => {
            while let Some(msg) = rx.recv().await {
                if sender.send(msg).await.is_err() {
                    break;
                }
            }
        }
    }
}
