mod connection;
mod role;
mod room;
mod signaling;

pub use connection::ConnectionId;
pub use role::Role;
pub use room::RoomKey;
pub use signaling::{FrameError, ServerMessage, SignalFrame};
