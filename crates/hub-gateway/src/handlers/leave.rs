//! Leave Chat handler (op 3)

use super::{HandlerError, HandlerResult};
use crate::connection::Connection;
use crate::protocol::{CloseCode, LeaveChatPayload};
use crate::server::GatewayState;
use hub_core::RoomId;
use std::sync::Arc;

/// Handles Leave Chat messages
pub struct LeaveChatHandler;

impl LeaveChatHandler {
    /// Handle a Leave Chat message
    ///
    /// Leaving a room the session never joined is a no-op.
    pub async fn handle(
        state: &GatewayState,
        connection: &Arc<Connection>,
        payload: LeaveChatPayload,
    ) -> HandlerResult<Option<CloseCode>> {
        let room_id = RoomId::new(payload.room_id)
            .map_err(|e| HandlerError::InvalidPayload(e.to_string()))?;

        state
            .registry()
            .leave_room(connection.session_id(), &room_id)
            .await;

        tracing::debug!(
            session_id = %connection.session_id(),
            user_id = %connection.user_id(),
            room_id = %room_id,
            "Left room"
        );

        Ok(None)
    }
}
