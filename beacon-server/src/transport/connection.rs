use axum::extract::ws::Message;
use beacon_core::ConnectionId;
use thiserror::Error;
use tokio::sync::mpsc;

/// The connection's outbound pump has already shut down; the frame was
/// not delivered.
#[derive(Debug, Error)]
#[error("connection is closing")]
pub struct ConnectionClosing;

/// Non-owning handle to one client connection: the identity used for room
/// membership plus the sender feeding that connection's outbound pump.
///
/// Cloning is cheap. Dropping a handle never closes the underlying
/// socket; the socket belongs to the connection's own tasks.
#[derive(Clone)]
pub struct ConnectionHandle {
    id: ConnectionId,
    outbound: mpsc::UnboundedSender<Message>,
}

impl ConnectionHandle {
    pub fn new(id: ConnectionId, outbound: mpsc::UnboundedSender<Message>) -> Self {
        Self { id, outbound }
    }

    pub fn id(&self) -> &ConnectionId {
        &self.id
    }

    /// Queue a frame for delivery. Ordering is preserved per connection;
    /// the only failure is a pump that has already gone away, which the
    /// caller is expected to tolerate.
    pub fn send(&self, msg: Message) -> Result<(), ConnectionClosing> {
        self.outbound.send(msg).map_err(|_| ConnectionClosing)
    }
}
