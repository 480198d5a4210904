use anyhow::{Context, Result};
use axum::{Router, routing::get};
use tracing::info;

use crate::config::{KeepAlive, ServerConfig};
use crate::signaling::{SignalingService, ws_handler};

/// Shared state handed to every connection handler.
#[derive(Clone)]
pub struct AppState {
    pub service: SignalingService,
    pub keep_alive: Option<KeepAlive>,
}

/// Build the signaling router. The relay exposes a single upgrade route;
/// the room key travels in its query string.
pub fn app(state: AppState) -> Router {
    Router::new().route("/ws", get(ws_handler)).with_state(state)
}

/// Bind the configured address and serve until the process stops.
pub async fn run(config: ServerConfig) -> Result<()> {
    let state = AppState {
        service: SignalingService::default(),
        keep_alive: config.keep_alive,
    };

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Signaling server listening on http://{}", addr);

    axum::serve(listener, app(state))
        .await
        .context("Signaling server exited")?;
    Ok(())
}
