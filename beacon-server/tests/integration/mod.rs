pub mod messaging_tests;

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use beacon_server::{AppState, KeepAlive, SignalingService, app};
use tracing::Level;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Spawn a relay on an ephemeral port. The returned service shares its
/// registry with the running server, so tests can observe room state.
pub async fn spawn_server(keep_alive: Option<KeepAlive>) -> (SocketAddr, SignalingService) {
    let service = SignalingService::default();
    let state = AppState {
        service: service.clone(),
        keep_alive,
    };

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Listener has no local address");

    tokio::spawn(async move {
        axum::serve(listener, app(state))
            .await
            .expect("Test server failed");
    });

    (addr, service)
}

/// Poll `predicate` until it holds or `timeout_ms` elapses.
pub async fn wait_until(predicate: impl Fn() -> bool, timeout_ms: u64) -> bool {
    let start = Instant::now();
    let timeout = Duration::from_millis(timeout_ms);

    loop {
        if predicate() {
            return true;
        }
        if start.elapsed() > timeout {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
