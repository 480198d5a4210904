use axum::extract::ws::{Message, Utf8Bytes};
use beacon_core::{ConnectionId, FrameError, Role, RoomKey, ServerMessage, SignalFrame};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::room::RoomRegistry;
use crate::transport::ConnectionHandle;

/// A server-originated or relayed message could not be encoded. Delivery
/// failures never surface here; they are logged and swallowed per
/// recipient.
#[derive(Debug, Error)]
pub enum SignalError {
    #[error("failed to encode signaling message: {0}")]
    Encode(#[from] serde_json::Error),
    #[error(transparent)]
    Frame(#[from] FrameError),
}

/// Membership manager and relay engine in one cloneable facade. Every
/// connection task talks to its peers through this service and never to
/// another task directly.
#[derive(Clone, Default)]
pub struct SignalingService {
    registry: RoomRegistry,
}

impl SignalingService {
    pub fn new(registry: RoomRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &RoomRegistry {
        &self.registry
    }

    /// Join `room` and announce negotiation roles.
    ///
    /// The joiner always receives its own `ready` message. When a
    /// responder joins, every pre-existing member is also told that a
    /// responder arrived. Both announcements are queued inside the room's
    /// critical section: queue pushes never block, and holding the lock
    /// guarantees every peer sees its role assignment before any frame
    /// relayed after this join.
    pub fn join(&self, room: &RoomKey, handle: &ConnectionHandle) -> Result<Role, SignalError> {
        let as_initiator: Utf8Bytes = encode(true, room)?.into();
        let as_responder: Utf8Bytes = encode(false, room)?.into();

        let role = self.registry.with_room(room, |members| {
            let role = members.add(handle.clone());

            let ready = if role.is_initiator() {
                as_initiator
            } else {
                as_responder.clone()
            };
            if handle.send(Message::Text(ready)).is_err() {
                warn!(
                    "Connection {} went away before its ready message",
                    handle.id()
                );
            }

            // A third joiner announces the same way; role semantics
            // beyond the first pair are the peers' own problem.
            if role == Role::Responder {
                for peer in members.members_except(handle.id()) {
                    if peer.send(Message::Text(as_responder.clone())).is_err() {
                        warn!(
                            "Failed to notify {} of a responder in room {}",
                            peer.id(),
                            room
                        );
                    }
                }
            }

            role
        });

        info!("Connection {} joined room {} as {:?}", handle.id(), room, role);
        Ok(role)
    }

    /// Forward one signaling payload to every other member of `room`.
    ///
    /// The `room` field is stamped before fan-out. Each delivery is
    /// attempted independently: a recipient already tearing down loses
    /// this message, the rest still get theirs, and the call succeeds.
    pub fn relay(
        &self,
        sender: &ConnectionId,
        room: &RoomKey,
        mut frame: SignalFrame,
    ) -> Result<(), SignalError> {
        frame.set_room(room);
        let text: Utf8Bytes = frame.to_text()?.into();

        let recipients = self.registry.members_except(room, sender);
        debug!(
            "Relaying {:?} frame from {} to {} peer(s) in room {}",
            frame.tag(),
            sender,
            recipients.len(),
            room
        );

        for peer in recipients {
            if peer.send(Message::Text(text.clone())).is_err() {
                warn!(
                    "Dropped relay to {} in room {}: connection is closing",
                    peer.id(),
                    room
                );
            }
        }

        Ok(())
    }

    /// Idempotent counterpart of `join`. Deletes the room when the last
    /// member leaves.
    pub fn leave(&self, id: &ConnectionId, room: &RoomKey) {
        self.registry.leave(room, id);
        info!("Connection {} left room {}", id, room);
    }
}

fn encode(is_initiator: bool, room: &RoomKey) -> Result<String, serde_json::Error> {
    serde_json::to_string(&ServerMessage::Ready {
        is_initiator,
        room: room.clone(),
    })
}
