use serde_json::json;

use crate::integration::{init_tracing, spawn_server};
use crate::utils::TestClient;

#[tokio::test]
async fn test_offer_relayed_with_room_tag() {
    init_tracing();

    let (addr, _service) = spawn_server(None).await;

    let mut first = TestClient::connect(addr, "abc")
        .await
        .expect("Failed to connect first client");
    first.recv_json().await.expect("No ready for first client");

    let mut second = TestClient::connect(addr, "abc")
        .await
        .expect("Failed to connect second client");
    second.recv_json().await.expect("No ready for second client");
    first.recv_json().await.expect("No responder notice");

    first
        .send_json(&json!({"type": "offer", "sdp": "fake-sdp"}))
        .await
        .expect("Failed to send offer");

    let relayed = second.recv_json().await.expect("Offer was not relayed");
    assert_eq!(relayed["type"], "offer");
    assert_eq!(relayed["sdp"], "fake-sdp");
    assert_eq!(relayed["room"], "abc");

    // The sender never hears its own message back.
    first
        .expect_silence(250)
        .await
        .expect("Sender received its own frame");

    first.close().await.expect("Failed to close first client");
    second.close().await.expect("Failed to close second client");
}

/// A client-supplied `room` field is overwritten, never trusted.
#[tokio::test]
async fn test_spoofed_room_field_is_overwritten() {
    init_tracing();

    let (addr, _service) = spawn_server(None).await;

    let mut first = TestClient::connect(addr, "actual")
        .await
        .expect("Failed to connect first client");
    first.recv_json().await.expect("No ready for first client");

    let mut second = TestClient::connect(addr, "actual")
        .await
        .expect("Failed to connect second client");
    second.recv_json().await.expect("No ready for second client");
    first.recv_json().await.expect("No responder notice");

    first
        .send_json(&json!({"type": "candidate", "room": "spoofed"}))
        .await
        .expect("Failed to send candidate");

    let relayed = second.recv_json().await.expect("Candidate was not relayed");
    assert_eq!(relayed["room"], "actual");

    first.close().await.expect("Failed to close first client");
    second.close().await.expect("Failed to close second client");
}
