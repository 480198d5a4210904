use serde_json::json;

use crate::integration::{init_tracing, spawn_server};
use crate::utils::TestClient;

#[tokio::test]
async fn test_sender_excluded_from_relay() {
    init_tracing();

    let (addr, _service) = spawn_server(None).await;

    let mut alice = TestClient::connect(addr, "pair")
        .await
        .expect("Failed to connect A");
    alice.recv_json().await.expect("No ready for A");

    let mut bob = TestClient::connect(addr, "pair")
        .await
        .expect("Failed to connect B");
    bob.recv_json().await.expect("No ready for B");
    alice.recv_json().await.expect("No responder notice for A");

    for i in 0..3 {
        alice
            .send_json(&json!({"type": "candidate", "seq": i}))
            .await
            .expect("Failed to send candidate");
    }

    // Frames from one sender arrive at the recipient in send order.
    for i in 0..3 {
        let frame = bob.recv_json().await.expect("Candidate was not relayed");
        assert_eq!(frame["seq"], i);
        assert_eq!(frame["room"], "pair");
    }

    alice
        .expect_silence(250)
        .await
        .expect("Sender received its own frames");

    alice.close().await.expect("Failed to close A");
    bob.close().await.expect("Failed to close B");
}
