use std::sync::Arc;

use beacon_core::{ConnectionId, Role, RoomKey};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::info;

use crate::room::Room;
use crate::transport::ConnectionHandle;

/// Single source of truth for room membership, shared by every connection
/// task.
///
/// Per-key mutations run inside one map entry critical section, so two
/// connections racing to join the same fresh key are serialized: exactly
/// one of them observes the empty room and becomes the initiator.
#[derive(Clone, Default)]
pub struct RoomRegistry {
    rooms: Arc<DashMap<RoomKey, Room>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` against the (possibly just-created) room's member set,
    /// inside the per-key critical section. `f` must not block.
    pub(crate) fn with_room<T>(&self, room: &RoomKey, f: impl FnOnce(&mut Room) -> T) -> T {
        let mut members = self.rooms.entry(room.clone()).or_default();
        // A registered room is never empty, so an empty set means the
        // entry was just created.
        if members.is_empty() {
            info!("Creating room: {}", room);
        }
        f(&mut members)
    }

    /// Register `handle` under `room`, creating the room if absent, and
    /// return the joiner's negotiation role.
    pub fn join(&self, room: &RoomKey, handle: ConnectionHandle) -> Role {
        self.with_room(room, |members| members.add(handle))
    }

    /// Remove `id` from `room`, deleting the room in the same critical
    /// section when the last member leaves. A no-op when the room or the
    /// member is already gone, so racing cleanup paths are safe.
    pub fn leave(&self, room: &RoomKey, id: &ConnectionId) {
        if let Entry::Occupied(mut entry) = self.rooms.entry(room.clone()) {
            entry.get_mut().remove(id);
            if entry.get().is_empty() {
                info!("Room {} is empty, deleting", room);
                entry.remove();
            }
        }
    }

    /// Stable snapshot of the other members of `room`, taken under the
    /// registry lock. Callers iterate the snapshot, never the live set.
    pub fn members_except(&self, room: &RoomKey, id: &ConnectionId) -> Vec<ConnectionHandle> {
        self.rooms
            .get(room)
            .map(|room| room.members_except(id))
            .unwrap_or_default()
    }

    pub fn contains(&self, room: &RoomKey) -> bool {
        self.rooms.contains_key(room)
    }

    pub fn member_count(&self, room: &RoomKey) -> usize {
        self.rooms.get(room).map(|room| room.len()).unwrap_or(0)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
