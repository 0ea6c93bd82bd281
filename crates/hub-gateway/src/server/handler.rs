//! WebSocket handler
//!
//! Authenticates the caller during the HTTP upgrade, then runs the
//! per-connection message loop.

use crate::connection::Connection;
use crate::handlers::MessageDispatcher;
use crate::protocol::{CloseCode, GatewayMessage, HelloPayload};
use crate::server::GatewayState;
use axum::{
    extract::{
        ws::{CloseFrame, Message},
        Query, State, WebSocketUpgrade,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures_util::{SinkExt, StreamExt};
use hub_common::AuthenticatedContext;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::interval;
use uuid::Uuid;

/// Default heartbeat interval in milliseconds
const HEARTBEAT_INTERVAL_MS: u64 = 45_000;

/// Timeout for no heartbeat before considering connection dead
const HEARTBEAT_TIMEOUT_MS: u64 = 90_000;

/// Channel buffer size for outgoing messages
const MESSAGE_BUFFER_SIZE: usize = 100;

/// Query parameters for the gateway upgrade request
#[derive(Debug, Deserialize)]
pub struct ConnectParams {
    /// Access token issued by the auth endpoint
    token: Option<String>,
}

/// WebSocket gateway handler
///
/// The token is validated before the upgrade completes, so an
/// unauthenticated caller never gets a WebSocket connection.
pub async fn gateway_handler(
    State(state): State<GatewayState>,
    Query(params): Query<ConnectParams>,
    ws: WebSocketUpgrade,
) -> Response {
    let Some(token) = params.token else {
        tracing::debug!("Upgrade rejected: missing token");
        return (StatusCode::UNAUTHORIZED, "missing token").into_response();
    };

    let claims = match state.jwt().validate_access_token(&token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!(error = %e, "Upgrade rejected: invalid token");
            return (StatusCode::UNAUTHORIZED, "invalid token").into_response();
        }
    };

    let identity = match AuthenticatedContext::from_claims(&claims) {
        Ok(identity) => identity,
        Err(e) => {
            tracing::debug!(error = %e, "Upgrade rejected: malformed claims");
            return (StatusCode::UNAUTHORIZED, "invalid token").into_response();
        }
    };

    ws.on_upgrade(move |socket| handle_socket(state, socket, identity))
}

/// Handle an upgraded WebSocket connection
async fn handle_socket(
    state: GatewayState,
    socket: axum::extract::ws::WebSocket,
    identity: AuthenticatedContext,
) {
    // Generate session ID
    let session_id = Uuid::new_v4().to_string();

    // Create message channel for outgoing messages
    let (tx, mut rx) = mpsc::channel::<GatewayMessage>(MESSAGE_BUFFER_SIZE);

    // Register connection
    let connection = state
        .registry()
        .add_connection(session_id.clone(), identity, tx);

    tracing::info!(
        session_id = %session_id,
        user_id = %connection.user_id(),
        "WebSocket connection established"
    );

    // Split the WebSocket
    let (mut ws_sink, mut ws_stream) = socket.split();

    // Send Hello message immediately
    let hello = GatewayMessage::hello(HelloPayload::with_interval(HEARTBEAT_INTERVAL_MS));
    if let Ok(json) = hello.to_json() {
        if ws_sink.send(Message::Text(json.into())).await.is_err() {
            tracing::warn!(session_id = %session_id, "Failed to send Hello message");
            state.registry().remove_connection(&session_id).await;
            return;
        }
    }

    // Clone state for tasks
    let state_recv = state.clone();
    let session_id_recv = session_id.clone();
    let connection_recv = connection.clone();

    // Spawn task to receive messages from WebSocket
    let recv_task = tokio::spawn(async move {
        while let Some(msg) = ws_stream.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    if let Err(close_code) =
                        handle_text_message(&state_recv, &connection_recv, &text).await
                    {
                        tracing::debug!(
                            session_id = %session_id_recv,
                            close_code = ?close_code,
                            "Closing connection due to error"
                        );
                        return Some(close_code);
                    }
                }
                Ok(Message::Binary(_)) => {
                    tracing::debug!(
                        session_id = %session_id_recv,
                        "Binary messages not supported"
                    );
                    return Some(CloseCode::DecodeError);
                }
                Ok(Message::Ping(_)) => {
                    tracing::trace!(session_id = %session_id_recv, "Ping received");
                    // Pong is handled automatically by axum
                }
                Ok(Message::Pong(_)) => {
                    tracing::trace!(session_id = %session_id_recv, "Pong received");
                }
                Ok(Message::Close(_)) => {
                    tracing::info!(session_id = %session_id_recv, "Client closed connection");
                    return None;
                }
                Err(e) => {
                    tracing::warn!(
                        session_id = %session_id_recv,
                        error = %e,
                        "WebSocket error"
                    );
                    return Some(CloseCode::UnknownError);
                }
            }
        }
        None
    });

    // Channel used to hand the writer a close code before shutdown
    let (close_tx, mut close_rx) = mpsc::channel::<Option<CloseCode>>(1);

    // Clone for send task
    let session_id_send = session_id.clone();

    // Spawn task to send messages to WebSocket; it also owns the close
    // handshake so the 4xxx code is visible on the wire
    let mut send_task = tokio::spawn(async move {
        loop {
            tokio::select! {
                maybe = rx.recv() => {
                    let Some(msg) = maybe else { break };
                    let Ok(json) = msg.to_json() else { continue };
                    if ws_sink.send(Message::Text(json.into())).await.is_err() {
                        tracing::warn!(
                            session_id = %session_id_send,
                            "Failed to send message to WebSocket"
                        );
                        break;
                    }
                }
                signal = close_rx.recv() => {
                    if let Some(Some(code)) = signal {
                        let frame = CloseFrame {
                            code: code.as_u16(),
                            reason: code.description().into(),
                        };
                        let _ = ws_sink.send(Message::Close(Some(frame))).await;
                    }
                    break;
                }
            }
        }

        // Close the WebSocket when the loop ends
        let _ = ws_sink.close().await;
    });

    // Clone for heartbeat task
    let session_id_hb = session_id.clone();
    let connection_hb = connection.clone();

    // Spawn heartbeat monitoring task
    let heartbeat_task = tokio::spawn(async move {
        let mut check_interval = interval(Duration::from_millis(HEARTBEAT_INTERVAL_MS / 2));

        loop {
            check_interval.tick().await;

            // Check if connection is dead (no heartbeat for too long)
            let time_since = connection_hb.time_since_heartbeat().await;
            if time_since > Duration::from_millis(HEARTBEAT_TIMEOUT_MS) {
                tracing::warn!(
                    session_id = %session_id_hb,
                    time_since_ms = time_since.as_millis(),
                    "Connection timed out (no heartbeat)"
                );
                break;
            }

            // Check if a heartbeat is overdue since the last tick
            if !connection_hb.is_heartbeat_acked().await
                && time_since > Duration::from_millis(HEARTBEAT_INTERVAL_MS)
            {
                tracing::warn!(
                    session_id = %session_id_hb,
                    "Connection zombied (heartbeat overdue)"
                );
                break;
            }

            connection_hb.await_heartbeat().await;
        }
    });

    // Wait for any task to complete, noting which close code (if any)
    // must still be delivered
    let mut close_code = None;
    let mut writer_gone = false;

    tokio::select! {
        result = recv_task => {
            if let Ok(Some(code)) = result {
                tracing::debug!(
                    session_id = %session_id,
                    close_code = ?code,
                    "Receive task ended with close code"
                );
                close_code = Some(code);
            }
        }
        _ = heartbeat_task => {
            tracing::debug!(session_id = %session_id, "Heartbeat task ended");
            close_code = Some(CloseCode::SessionTimeout);
        }
        _ = &mut send_task => {
            tracing::debug!(session_id = %session_id, "Send task ended");
            writer_gone = true;
        }
    }

    // Let the writer send the close frame before tearing down
    if !writer_gone {
        let _ = close_tx.send(close_code).await;
        let _ = send_task.await;
    }

    // Strip room memberships and drop the connection in one pass
    tracing::info!(session_id = %session_id, "Cleaning up connection");
    state.registry().remove_connection(&session_id).await;
}

/// Handle a text message from the client
async fn handle_text_message(
    state: &GatewayState,
    connection: &Arc<Connection>,
    text: &str,
) -> Result<(), CloseCode> {
    // Parse the message
    let message = match GatewayMessage::from_json(text) {
        Ok(m) => m,
        Err(e) => {
            tracing::debug!(
                session_id = %connection.session_id(),
                error = %e,
                "Failed to parse message"
            );
            return Err(CloseCode::DecodeError);
        }
    };

    tracing::trace!(
        session_id = %connection.session_id(),
        op = %message.op,
        "Received message"
    );

    // Dispatch to handler
    match MessageDispatcher::dispatch(state, connection, message).await {
        Ok(Some(close_code)) => Err(close_code),
        Ok(None) => Ok(()),
        Err(e) => {
            tracing::warn!(
                session_id = %connection.session_id(),
                error = %e,
                "Handler error"
            );
            Err(e.to_close_code().unwrap_or(CloseCode::UnknownError))
        }
    }
}
