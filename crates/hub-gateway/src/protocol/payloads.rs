//! Client payload definitions
//!
//! Defines the payload structures for client-to-server messages.

use hub_core::{AttachmentUpload, GroupId, UserId};
use serde::{Deserialize, Serialize};

/// Payload for op 10 (Hello)
///
/// Sent by the server immediately after connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelloPayload {
    /// Heartbeat interval in milliseconds
    pub heartbeat_interval: u64,
}

impl HelloPayload {
    /// Default heartbeat interval (45 seconds)
    pub const DEFAULT_HEARTBEAT_INTERVAL: u64 = 45_000;

    /// Create a new Hello payload with default interval
    #[must_use]
    pub fn new() -> Self {
        Self {
            heartbeat_interval: Self::DEFAULT_HEARTBEAT_INTERVAL,
        }
    }

    /// Create a Hello payload with custom interval
    #[must_use]
    pub fn with_interval(heartbeat_interval: u64) -> Self {
        Self { heartbeat_interval }
    }
}

impl Default for HelloPayload {
    fn default() -> Self {
        Self::new()
    }
}

/// Payload for op 2 (JoinChat)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinChatPayload {
    /// Identifier of the room to join
    pub room_id: String,
}

/// Payload for op 3 (LeaveChat)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveChatPayload {
    /// Identifier of the room to leave
    pub room_id: String,
}

/// Payload for op 4 (SendMessage)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessagePayload {
    /// Room to broadcast into once the message is stored
    pub room_id: String,

    /// Message text
    pub content: String,

    /// Direct-message recipient
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receiver_id: Option<UserId>,

    /// Group conversation destination
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,

    /// Ordered media uploads to attach
    #[serde(default)]
    pub attachments: Vec<AttachmentUpload>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hello_default_interval() {
        let hello = HelloPayload::new();
        assert_eq!(hello.heartbeat_interval, 45_000);

        let custom = HelloPayload::with_interval(10_000);
        assert_eq!(custom.heartbeat_interval, 10_000);
    }

    #[test]
    fn test_send_payload_minimal_json() {
        let payload: SendMessagePayload =
            serde_json::from_str(r#"{"room_id":"conv-42","content":"hello"}"#).unwrap();

        assert_eq!(payload.room_id, "conv-42");
        assert_eq!(payload.content, "hello");
        assert!(payload.receiver_id.is_none());
        assert!(payload.group_id.is_none());
        assert!(payload.attachments.is_empty());
    }

    #[test]
    fn test_send_payload_omits_empty_options() {
        let payload = SendMessagePayload {
            room_id: "conv-42".to_string(),
            content: "hello".to_string(),
            receiver_id: None,
            group_id: None,
            attachments: Vec::new(),
        };

        let json = serde_json::to_string(&payload).unwrap();
        assert!(!json.contains("receiver_id"));
        assert!(!json.contains("group_id"));
    }
}
