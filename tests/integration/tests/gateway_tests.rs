//! Gateway integration tests
//!
//! Each test spawns a real gateway on an ephemeral port and drives it
//! through WebSocket clients.

use anyhow::Result;
use hub_gateway::protocol::{GatewayMessage, OpCode, SendMessagePayload};
use integration_tests::fixtures::seed_profiles;
use integration_tests::helpers::TestGateway;

fn text_message(room_id: &str, content: &str, receiver: hub_core::UserId) -> GatewayMessage {
    GatewayMessage::send_message(SendMessagePayload {
        room_id: room_id.to_string(),
        content: content.to_string(),
        receiver_id: Some(receiver),
        group_id: None,
        attachments: Vec::new(),
    })
}

#[tokio::test]
async fn test_rejects_connection_without_token() -> Result<()> {
    let gateway = TestGateway::start().await?;

    let result = gateway.try_connect_raw("").await;
    assert!(result.is_err(), "handshake should fail without a token");

    let result = gateway.try_connect_raw("not-a-jwt").await;
    assert!(result.is_err(), "handshake should fail with a bad token");

    Ok(())
}

#[tokio::test]
async fn test_hello_sent_on_connect() -> Result<()> {
    let gateway = TestGateway::start().await?;
    let users = seed_profiles(&gateway.profiles);

    // connect() already asserts the first frame is Hello
    let client = gateway.connect(users.alice).await?;
    client.close().await?;

    Ok(())
}

#[tokio::test]
async fn test_heartbeat_is_acknowledged() -> Result<()> {
    let gateway = TestGateway::start().await?;
    let users = seed_profiles(&gateway.profiles);

    let mut client = gateway.connect(users.alice).await?;

    client.send(GatewayMessage::heartbeat(None)).await?;
    let ack = client.recv().await?;
    assert_eq!(ack.op, OpCode::HeartbeatAck);

    client.close().await?;
    Ok(())
}

#[tokio::test]
async fn test_message_fans_out_to_room_and_echoes_to_sender() -> Result<()> {
    let gateway = TestGateway::start().await?;
    let users = seed_profiles(&gateway.profiles);

    let mut alice = gateway.connect(users.alice).await?;
    let mut bob = gateway.connect(users.bob).await?;
    let mut carol = gateway.connect(users.carol).await?;

    alice.send(GatewayMessage::join_chat("conv-42")).await?;
    bob.send(GatewayMessage::join_chat("conv-42")).await?;
    // Let the joins land before sending
    bob.send(GatewayMessage::heartbeat(None)).await?;
    assert_eq!(bob.recv().await?.op, OpCode::HeartbeatAck);

    alice
        .send(text_message("conv-42", "Hello", users.bob))
        .await?;

    // Bob, a room member, gets exactly one copy
    let delivered = bob.recv().await?;
    assert_eq!(delivered.op, OpCode::Dispatch);
    assert_eq!(delivered.t.as_deref(), Some("RECEIVE_MESSAGE"));
    let data = delivered.d.expect("dispatch carries data");
    assert_eq!(data["content"], "Hello");
    assert_eq!(data["sender_display_name"], "alice");
    bob.expect_silence().await?;

    // Alice gets the room copy plus the sender echo
    let first = alice.recv().await?;
    let second = alice.recv().await?;
    assert_eq!(first.t.as_deref(), Some("RECEIVE_MESSAGE"));
    assert_eq!(second.t.as_deref(), Some("RECEIVE_MESSAGE"));
    assert_eq!(first.s, Some(1));
    assert_eq!(second.s, Some(2));
    alice.expect_silence().await?;

    // Carol never joined the room
    carol.expect_silence().await?;

    Ok(())
}

#[tokio::test]
async fn test_non_member_sender_gets_one_self_delivery() -> Result<()> {
    let gateway = TestGateway::start().await?;
    let users = seed_profiles(&gateway.profiles);

    let mut alice = gateway.connect(users.alice).await?;
    let mut bob = gateway.connect(users.bob).await?;

    // Only bob is in the room; alice sends without joining
    bob.send(GatewayMessage::join_chat("conv-42")).await?;
    bob.send(GatewayMessage::heartbeat(None)).await?;
    assert_eq!(bob.recv().await?.op, OpCode::HeartbeatAck);

    alice
        .send(text_message("conv-42", "drive-by", users.bob))
        .await?;

    assert_eq!(bob.recv().await?.t.as_deref(), Some("RECEIVE_MESSAGE"));
    bob.expect_silence().await?;

    // Alice gets exactly the sender echo
    assert_eq!(alice.recv().await?.t.as_deref(), Some("RECEIVE_MESSAGE"));
    alice.expect_silence().await?;

    Ok(())
}

#[tokio::test]
async fn test_rejected_message_errors_only_the_sender() -> Result<()> {
    let gateway = TestGateway::start().await?;
    let users = seed_profiles(&gateway.profiles);

    let mut alice = gateway.connect(users.alice).await?;
    let mut bob = gateway.connect(users.bob).await?;

    alice.send(GatewayMessage::join_chat("conv-42")).await?;
    bob.send(GatewayMessage::join_chat("conv-42")).await?;
    bob.send(GatewayMessage::heartbeat(None)).await?;
    assert_eq!(bob.recv().await?.op, OpCode::HeartbeatAck);

    // Empty content is rejected by the store, so nothing is broadcast
    alice.send(text_message("conv-42", "   ", users.bob)).await?;

    let error = alice.recv().await?;
    assert_eq!(error.t.as_deref(), Some("ERROR_MESSAGE"));
    let data = error.d.expect("error carries data");
    assert_eq!(data["reason"], "message content cannot be empty");
    alice.expect_silence().await?;
    bob.expect_silence().await?;

    // The connection survives the failed operation
    alice
        .send(text_message("conv-42", "second try", users.bob))
        .await?;
    let delivered = bob.recv().await?;
    assert_eq!(delivered.t.as_deref(), Some("RECEIVE_MESSAGE"));

    Ok(())
}

#[tokio::test]
async fn test_unknown_sender_is_rejected() -> Result<()> {
    let gateway = TestGateway::start().await?;
    let users = seed_profiles(&gateway.profiles);

    // Valid token for a user with no registered profile
    let ghost = hub_core::UserId::generate();
    let mut client = gateway.connect(ghost).await?;

    client.send(GatewayMessage::join_chat("conv-42")).await?;
    client
        .send(text_message("conv-42", "boo", users.bob))
        .await?;

    let error = client.recv().await?;
    assert_eq!(error.t.as_deref(), Some("ERROR_MESSAGE"));
    assert_eq!(error.d.expect("error carries data")["reason"], "sender profile not found");

    Ok(())
}

#[tokio::test]
async fn test_leave_stops_delivery() -> Result<()> {
    let gateway = TestGateway::start().await?;
    let users = seed_profiles(&gateway.profiles);

    let mut alice = gateway.connect(users.alice).await?;
    let mut bob = gateway.connect(users.bob).await?;

    alice.send(GatewayMessage::join_chat("conv-42")).await?;
    bob.send(GatewayMessage::join_chat("conv-42")).await?;
    bob.send(GatewayMessage::leave_chat("conv-42")).await?;
    bob.send(GatewayMessage::heartbeat(None)).await?;
    assert_eq!(bob.recv().await?.op, OpCode::HeartbeatAck);

    alice
        .send(text_message("conv-42", "anyone there?", users.bob))
        .await?;

    bob.expect_silence().await?;

    // Alice still gets the room copy and the echo
    assert_eq!(alice.recv().await?.t.as_deref(), Some("RECEIVE_MESSAGE"));
    assert_eq!(alice.recv().await?.t.as_deref(), Some("RECEIVE_MESSAGE"));

    Ok(())
}

#[tokio::test]
async fn test_disconnect_strips_membership() -> Result<()> {
    let gateway = TestGateway::start().await?;
    let users = seed_profiles(&gateway.profiles);

    let mut alice = gateway.connect(users.alice).await?;
    let bob = gateway.connect(users.bob).await?;

    alice.send(GatewayMessage::join_chat("conv-42")).await?;

    // Bob joins then drops the connection entirely
    // (the registry must forget him, not just his socket)
    drop(bob);

    // Give the server a moment to observe the disconnect
    tokio::time::sleep(std::time::Duration::from_millis(200)).await;

    alice
        .send(text_message("conv-42", "still here", users.bob))
        .await?;

    // Only Alice is in the room: room copy plus echo, no errors
    assert_eq!(alice.recv().await?.t.as_deref(), Some("RECEIVE_MESSAGE"));
    assert_eq!(alice.recv().await?.t.as_deref(), Some("RECEIVE_MESSAGE"));
    alice.expect_silence().await?;

    Ok(())
}

#[tokio::test]
async fn test_server_only_opcode_closes_with_unknown_opcode_code() -> Result<()> {
    let gateway = TestGateway::start().await?;
    let users = seed_profiles(&gateway.profiles);

    let mut client = gateway.connect(users.alice).await?;

    // Clients may not send Hello
    client
        .send(GatewayMessage::hello(
            hub_gateway::protocol::HelloPayload::new(),
        ))
        .await?;

    assert_eq!(client.expect_close_code().await?, 4001);

    Ok(())
}

#[tokio::test]
async fn test_malformed_frame_closes_with_decode_error_code() -> Result<()> {
    let gateway = TestGateway::start().await?;
    let users = seed_profiles(&gateway.profiles);

    let mut client = gateway.connect(users.alice).await?;

    client.send_raw("not json").await?;

    assert_eq!(client.expect_close_code().await?, 4002);

    Ok(())
}
