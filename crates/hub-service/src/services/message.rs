//! Message service
//!
//! The persistence gateway implementation: validates drafts, resolves sender
//! display data, materializes attachments, and records messages in memory.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use hub_core::{
    AttachmentUpload, MediaId, MediaItem, MessageDraft, MessageId, MessageStore, MessageView,
    StoreError, StoreResult, UserId,
};
use tracing::{info, instrument};

use super::profile::ProfileDirectory;

/// Maximum accepted content length in characters
const MAX_CONTENT_LEN: usize = 4000;

/// In-memory message store
///
/// Owns draft validation and the canonical message representation. A draft
/// either becomes a fully populated [`MessageView`] or a rejection; nothing
/// is recorded on the rejection path.
pub struct MessageService {
    profiles: Arc<ProfileDirectory>,
    messages: DashMap<MessageId, MessageView>,
}

impl MessageService {
    /// Create a service backed by the given profile directory
    #[must_use]
    pub fn new(profiles: Arc<ProfileDirectory>) -> Self {
        Self {
            profiles,
            messages: DashMap::new(),
        }
    }

    /// The profile directory this service resolves senders against
    pub fn profiles(&self) -> &ProfileDirectory {
        &self.profiles
    }

    /// Fetch a stored message by id
    pub fn get(&self, id: MessageId) -> Option<MessageView> {
        self.messages.get(&id).map(|m| m.clone())
    }

    /// Number of stored messages
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Validate a draft against the business rules
    fn validate(&self, sender: UserId, draft: &MessageDraft) -> StoreResult<()> {
        if draft.content.trim().is_empty() && draft.attachments.is_empty() {
            return Err(StoreError::rejected("message content cannot be empty"));
        }

        if draft.content.chars().count() > MAX_CONTENT_LEN {
            return Err(StoreError::rejected(format!(
                "message content exceeds {MAX_CONTENT_LEN} characters"
            )));
        }

        if draft.receiver_id.is_none() && draft.group_id.is_none() {
            return Err(StoreError::rejected(
                "message must address a receiver or a group",
            ));
        }

        if !self.profiles.contains(sender) {
            return Err(StoreError::rejected("sender profile not found"));
        }

        if let Some(receiver_id) = draft.receiver_id {
            if !self.profiles.contains(receiver_id) {
                return Err(StoreError::rejected("recipient not found"));
            }
        }

        Ok(())
    }

    /// Turn attachment uploads into stored media items, preserving order
    fn materialize_media(attachments: &[AttachmentUpload]) -> Vec<MediaItem> {
        attachments
            .iter()
            .enumerate()
            .map(|(position, upload)| {
                let id = MediaId::generate();
                MediaItem {
                    id,
                    url: format!("/media/{id}/{}", upload.file_name),
                    file_name: upload.file_name.clone(),
                    kind: upload.kind,
                    position: position as u32,
                }
            })
            .collect()
    }
}

#[async_trait]
impl MessageStore for MessageService {
    #[instrument(skip(self, draft))]
    async fn create_message(
        &self,
        sender: UserId,
        draft: MessageDraft,
    ) -> StoreResult<MessageView> {
        self.validate(sender, &draft)?;

        // validate() checked the sender exists
        let profile = self
            .profiles
            .get(sender)
            .ok_or_else(|| StoreError::rejected("sender profile not found"))?;

        let media = Self::materialize_media(&draft.attachments);

        let view = MessageView {
            id: MessageId::generate(),
            content: draft.content,
            sender_id: sender,
            sender_display_name: profile.display_name,
            sender_avatar: profile.avatar_url,
            sent_at: Utc::now(),
            is_edited: false,
            media,
            reactions: Vec::new(),
        };

        self.messages.insert(view.id, view.clone());

        info!(message_id = %view.id, sender_id = %sender, "Message stored");

        Ok(view)
    }
}

impl std::fmt::Debug for MessageService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageService")
            .field("profiles", &self.profiles.len())
            .field("messages", &self.messages.len())
            .finish()
    }
}
