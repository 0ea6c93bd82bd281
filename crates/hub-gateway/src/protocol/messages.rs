//! Gateway message format
//!
//! Defines the structure for all WebSocket messages.

use super::{HelloPayload, JoinChatPayload, LeaveChatPayload, OpCode, SendMessagePayload};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Gateway message format
///
/// All messages sent over the WebSocket connection follow this envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayMessage {
    /// Operation code
    pub op: OpCode,

    /// Event type (only for op=0 Dispatch)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub t: Option<String>,

    /// Sequence number (only for op=0 Dispatch)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub s: Option<u64>,

    /// Event data payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub d: Option<Value>,
}

impl GatewayMessage {
    // === Server Messages ===

    /// Create a Dispatch message (op=0)
    #[must_use]
    pub fn dispatch(event_type: impl Into<String>, sequence: u64, data: Value) -> Self {
        Self {
            op: OpCode::Dispatch,
            t: Some(event_type.into()),
            s: Some(sequence),
            d: Some(data),
        }
    }

    /// Create a Hello message (op=10)
    #[must_use]
    pub fn hello(payload: HelloPayload) -> Self {
        Self {
            op: OpCode::Hello,
            t: None,
            s: None,
            d: Some(serde_json::to_value(payload).unwrap_or_default()),
        }
    }

    /// Create a Heartbeat ACK message (op=11)
    #[must_use]
    pub fn heartbeat_ack() -> Self {
        Self {
            op: OpCode::HeartbeatAck,
            t: None,
            s: None,
            d: None,
        }
    }

    // === Client Messages ===

    /// Create a JoinChat message (op=2)
    #[must_use]
    pub fn join_chat(room_id: impl Into<String>) -> Self {
        Self {
            op: OpCode::JoinChat,
            t: None,
            s: None,
            d: serde_json::to_value(JoinChatPayload { room_id: room_id.into() }).ok(),
        }
    }

    /// Create a LeaveChat message (op=3)
    #[must_use]
    pub fn leave_chat(room_id: impl Into<String>) -> Self {
        Self {
            op: OpCode::LeaveChat,
            t: None,
            s: None,
            d: serde_json::to_value(LeaveChatPayload { room_id: room_id.into() }).ok(),
        }
    }

    /// Create a SendMessage message (op=4)
    #[must_use]
    pub fn send_message(payload: SendMessagePayload) -> Self {
        Self {
            op: OpCode::SendMessage,
            t: None,
            s: None,
            d: serde_json::to_value(payload).ok(),
        }
    }

    /// Create a Heartbeat message (op=1)
    #[must_use]
    pub fn heartbeat(last_sequence: Option<u64>) -> Self {
        Self {
            op: OpCode::Heartbeat,
            t: None,
            s: None,
            d: last_sequence.map(|s| Value::Number(s.into())),
        }
    }

    // === Parsing Client Messages ===

    /// Try to parse as a JoinChat payload (op=2)
    pub fn as_join_chat(&self) -> Option<JoinChatPayload> {
        if self.op != OpCode::JoinChat {
            return None;
        }
        self.d.as_ref().and_then(|d| serde_json::from_value(d.clone()).ok())
    }

    /// Try to parse as a LeaveChat payload (op=3)
    pub fn as_leave_chat(&self) -> Option<LeaveChatPayload> {
        if self.op != OpCode::LeaveChat {
            return None;
        }
        self.d.as_ref().and_then(|d| serde_json::from_value(d.clone()).ok())
    }

    /// Try to parse as a SendMessage payload (op=4)
    pub fn as_send_message(&self) -> Option<SendMessagePayload> {
        if self.op != OpCode::SendMessage {
            return None;
        }
        self.d.as_ref().and_then(|d| serde_json::from_value(d.clone()).ok())
    }

    /// Try to parse the heartbeat sequence number (op=1)
    pub fn as_heartbeat_seq(&self) -> Option<Option<u64>> {
        if self.op != OpCode::Heartbeat {
            return None;
        }
        Some(self.d.as_ref().and_then(|d| d.as_u64()))
    }

    // === Utilities ===

    /// Check if this is a valid client message
    #[must_use]
    pub fn is_valid_client_message(&self) -> bool {
        self.op.is_client_op()
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl std::fmt::Display for GatewayMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(t) = &self.t {
            write!(f, "GatewayMessage(op={}, t={}", self.op, t)?;
            if let Some(s) = self.s {
                write!(f, ", s={s}")?;
            }
            write!(f, ")")
        } else {
            write!(f, "GatewayMessage(op={})", self.op)
        }
    }
}
