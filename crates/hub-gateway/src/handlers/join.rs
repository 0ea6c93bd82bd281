//! Join Chat handler (op 2)

use super::{HandlerError, HandlerResult};
use crate::connection::Connection;
use crate::protocol::{CloseCode, JoinChatPayload};
use crate::server::GatewayState;
use hub_core::RoomId;
use std::sync::Arc;

/// Handles Join Chat messages
pub struct JoinChatHandler;

impl JoinChatHandler {
    /// Handle a Join Chat message
    ///
    /// Joining a room the session already belongs to is a no-op.
    pub async fn handle(
        state: &GatewayState,
        connection: &Arc<Connection>,
        payload: JoinChatPayload,
    ) -> HandlerResult<Option<CloseCode>> {
        let room_id = RoomId::new(payload.room_id)
            .map_err(|e| HandlerError::InvalidPayload(e.to_string()))?;

        state
            .registry()
            .join_room(connection.session_id(), room_id.clone())
            .await;

        tracing::debug!(
            session_id = %connection.session_id(),
            user_id = %connection.user_id(),
            room_id = %room_id,
            "Joined room"
        );

        Ok(None)
    }
}
