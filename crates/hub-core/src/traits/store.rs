//! Message store contract (the persistence gateway)

use async_trait::async_trait;

use crate::entities::{MessageDraft, MessageView};
use crate::error::StoreResult;
use crate::value_objects::UserId;

/// Durable message storage collaborator
///
/// The store owns validation and the storage schema. The realtime hub only
/// relies on this contract: a draft either becomes a fully populated
/// [`MessageView`] (sender display data resolved, media materialized) or a
/// [`StoreError`](crate::StoreError) explaining why not. A message is
/// broadcast if and only if this call succeeded.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Durably record a message and return its display-ready view
    async fn create_message(&self, sender: UserId, draft: MessageDraft)
        -> StoreResult<MessageView>;
}
