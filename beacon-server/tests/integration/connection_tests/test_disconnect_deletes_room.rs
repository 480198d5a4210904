use beacon_core::RoomKey;

use crate::integration::{init_tracing, spawn_server, wait_until};
use crate::utils::TestClient;

#[tokio::test]
async fn test_disconnect_deletes_room() {
    init_tracing();

    let (addr, service) = spawn_server(None).await;
    let room = RoomKey::from("abc");

    let mut first = TestClient::connect(addr, "abc")
        .await
        .expect("Failed to connect first client");
    first.recv_json().await.expect("No ready for first client");

    let mut second = TestClient::connect(addr, "abc")
        .await
        .expect("Failed to connect second client");
    second.recv_json().await.expect("No ready for second client");

    // One member leaving keeps the room alive for the other.
    second.close().await.expect("Failed to close second client");
    let registry = service.registry().clone();
    let drained = wait_until(|| registry.member_count(&room) == 1, 5000).await;
    assert!(drained, "Second client's leave was never processed");
    assert!(registry.contains(&room));

    // The last member leaving deletes the room.
    first.close().await.expect("Failed to close first client");
    let deleted = wait_until(|| !registry.contains(&room), 5000).await;
    assert!(deleted, "Empty room was not deleted");

    // A later join to the same key is a fresh first join.
    let mut third = TestClient::connect(addr, "abc")
        .await
        .expect("Failed to connect third client");
    let ready = third.recv_json().await.expect("No ready for third client");
    assert_eq!(ready["isInitiator"], true);

    third.close().await.expect("Failed to close third client");
}
