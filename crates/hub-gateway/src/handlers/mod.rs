//! Op code handlers
//!
//! Handles incoming WebSocket messages based on their operation code.

mod error;
mod heartbeat;
mod join;
mod leave;
mod send;

pub use error::{HandlerError, HandlerResult};
pub use heartbeat::HeartbeatHandler;
pub use join::JoinChatHandler;
pub use leave::LeaveChatHandler;
pub use send::SendMessageHandler;

use crate::connection::Connection;
use crate::protocol::{CloseCode, GatewayMessage, OpCode};
use crate::server::GatewayState;
use std::sync::Arc;

/// Dispatch incoming client messages to appropriate handlers
pub struct MessageDispatcher;

impl MessageDispatcher {
    /// Handle an incoming client message
    pub async fn dispatch(
        state: &GatewayState,
        connection: &Arc<Connection>,
        message: GatewayMessage,
    ) -> HandlerResult<Option<CloseCode>> {
        // Validate that this is a client-sendable op code
        if !message.op.is_client_op() {
            tracing::warn!(
                session_id = %connection.session_id(),
                op = %message.op,
                "Received server-only op code from client"
            );
            return Ok(Some(CloseCode::UnknownOpcode));
        }

        match message.op {
            OpCode::Heartbeat => {
                let seq = message.as_heartbeat_seq().ok_or_else(|| {
                    HandlerError::InvalidPayload("Invalid Heartbeat payload".to_string())
                })?;

                HeartbeatHandler::handle(connection, seq).await
            }
            OpCode::JoinChat => {
                let payload = message.as_join_chat().ok_or_else(|| {
                    HandlerError::InvalidPayload("Invalid Join Chat payload".to_string())
                })?;

                JoinChatHandler::handle(state, connection, payload).await
            }
            OpCode::LeaveChat => {
                let payload = message.as_leave_chat().ok_or_else(|| {
                    HandlerError::InvalidPayload("Invalid Leave Chat payload".to_string())
                })?;

                LeaveChatHandler::handle(state, connection, payload).await
            }
            OpCode::SendMessage => {
                let payload = message.as_send_message().ok_or_else(|| {
                    HandlerError::InvalidPayload("Invalid Send Message payload".to_string())
                })?;

                SendMessageHandler::handle(state, connection, payload).await
            }
            // These ops should never reach here due to is_client_op check
            _ => {
                tracing::error!(op = %message.op, "Unhandled client op code");
                Ok(Some(CloseCode::UnknownOpcode))
            }
        }
    }
}
