/// Negotiation role assigned at join time. Meaningful only to the first
/// two members of a room; the relay itself never acts on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// First member of the room. Expected to start the negotiation.
    Initiator,
    /// Any later member. Waits for the initiator's first message.
    Responder,
}

impl Role {
    pub fn is_initiator(self) -> bool {
        matches!(self, Role::Initiator)
    }
}
