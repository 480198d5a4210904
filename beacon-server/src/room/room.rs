use std::collections::HashMap;

use beacon_core::{ConnectionId, Role};

use crate::transport::ConnectionHandle;

/// Member set of one rendezvous room, unique by connection identity.
///
/// Invariant: a `Room` is never empty while present in the registry; the
/// registry deletes the entry in the same critical section that removes
/// the last member.
#[derive(Default)]
pub struct Room {
    members: HashMap<ConnectionId, ConnectionHandle>,
}

impl Room {
    /// Add a member and assign its negotiation role: the first connection
    /// in the room initiates, everyone after it responds. Re-adding a
    /// present member keeps the set unchanged.
    pub fn add(&mut self, handle: ConnectionHandle) -> Role {
        let role = if self.members.is_empty() {
            Role::Initiator
        } else {
            Role::Responder
        };
        let id = handle.id().clone();
        self.members.entry(id).or_insert(handle);
        role
    }

    pub fn remove(&mut self, id: &ConnectionId) -> bool {
        self.members.remove(id).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Snapshot of every member other than `id`.
    pub fn members_except(&self, id: &ConnectionId) -> Vec<ConnectionHandle> {
        self.members
            .iter()
            .filter(|(member, _)| *member != id)
            .map(|(_, handle)| handle.clone())
            .collect()
    }
}
