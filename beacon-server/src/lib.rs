pub mod config;
pub mod room;
pub mod server;
pub mod signaling;
pub mod transport;

pub use config::{KeepAlive, ServerConfig};
pub use room::{Room, RoomRegistry};
pub use server::{AppState, app, run};
pub use signaling::{SignalError, SignalingService, ws_handler};
pub use transport::ConnectionHandle;
