//! Send Message handler (op 4)
//!
//! Persists the message first, then fans it out. Nothing is broadcast for
//! a message that was not stored, and a failed send never terminates the
//! connection.

use super::HandlerResult;
use crate::connection::Connection;
use crate::events::{ErrorPayload, GatewayEventType};
use crate::protocol::{CloseCode, GatewayMessage, SendMessagePayload};
use crate::server::GatewayState;
use hub_core::{MessageDraft, RoomId};
use std::sync::Arc;

/// Handles Send Message messages
pub struct SendMessageHandler;

impl SendMessageHandler {
    /// Handle a Send Message message
    pub async fn handle(
        state: &GatewayState,
        connection: &Arc<Connection>,
        payload: SendMessagePayload,
    ) -> HandlerResult<Option<CloseCode>> {
        let room_id = match RoomId::new(payload.room_id) {
            Ok(id) => id,
            Err(e) => {
                Self::send_error(connection, e.to_string()).await;
                return Ok(None);
            }
        };

        let draft = MessageDraft {
            content: payload.content,
            receiver_id: payload.receiver_id,
            group_id: payload.group_id,
            attachments: payload.attachments,
        };

        // Persist before any fan-out. No registry lock is held across this await.
        let view = match state
            .message_store()
            .create_message(connection.user_id(), draft)
            .await
        {
            Ok(view) => view,
            Err(e) => {
                if e.is_rejection() {
                    tracing::debug!(
                        session_id = %connection.session_id(),
                        room_id = %room_id,
                        reason = %e,
                        "Message rejected"
                    );
                } else {
                    tracing::error!(
                        session_id = %connection.session_id(),
                        room_id = %room_id,
                        error = %e,
                        "Message persistence failed"
                    );
                }
                Self::send_error(connection, e.to_string()).await;
                return Ok(None);
            }
        };

        let data = match serde_json::to_value(&view) {
            Ok(data) => data,
            Err(e) => {
                tracing::error!(
                    session_id = %connection.session_id(),
                    error = %e,
                    "Failed to serialize stored message"
                );
                Self::send_error(connection, "failed to send message").await;
                return Ok(None);
            }
        };

        // Fan out to the room, then echo to the caller. A caller who joined
        // the room receives the message twice; deduplication is the
        // client's concern.
        let delivered = state
            .registry()
            .dispatch_to_room(&room_id, GatewayEventType::ReceiveMessage.as_str(), data.clone())
            .await;

        let echo = GatewayMessage::dispatch(
            GatewayEventType::ReceiveMessage.as_str(),
            connection.next_sequence(),
            data,
        );
        if let Err(e) = connection.send(echo).await {
            tracing::warn!(
                session_id = %connection.session_id(),
                error = %e,
                "Failed to echo message to sender"
            );
        }

        tracing::debug!(
            session_id = %connection.session_id(),
            room_id = %room_id,
            message_id = %view.id,
            delivered = delivered,
            "Message stored and dispatched"
        );

        Ok(None)
    }

    /// Deliver an `ERROR_MESSAGE` event to the caller only
    async fn send_error(connection: &Arc<Connection>, reason: impl Into<String>) {
        let payload = ErrorPayload::new(reason);
        let data = serde_json::to_value(&payload).unwrap_or_default();

        let message = GatewayMessage::dispatch(
            GatewayEventType::ErrorMessage.as_str(),
            connection.next_sequence(),
            data,
        );

        if let Err(e) = connection.send(message).await {
            tracing::warn!(
                session_id = %connection.session_id(),
                error = %e,
                "Failed to deliver error event"
            );
        }
    }
}
