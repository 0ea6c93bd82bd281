//! Individual WebSocket connection
//!
//! Represents a single WebSocket connection and its state.

use crate::protocol::GatewayMessage;
use hub_common::AuthenticatedContext;
use hub_core::{RoomId, UserId};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, RwLock};

/// A single WebSocket connection
///
/// Identity is resolved during the HTTP upgrade, so every connection
/// carries its authenticated caller from the moment it exists.
pub struct Connection {
    /// Unique session ID
    session_id: String,

    /// Authenticated caller identity
    identity: AuthenticatedContext,

    /// Channel to send messages to the WebSocket
    sender: mpsc::Sender<GatewayMessage>,

    /// Last sequence number sent
    sequence: AtomicU64,

    /// Last heartbeat received
    last_heartbeat: RwLock<Instant>,

    /// Whether we've received a heartbeat since the last supervision tick
    heartbeat_acked: RwLock<bool>,

    /// Rooms this connection has joined
    rooms: RwLock<HashSet<RoomId>>,

    /// Connection creation time
    created_at: Instant,
}

impl Connection {
    /// Create a new connection
    pub fn new(
        session_id: String,
        identity: AuthenticatedContext,
        sender: mpsc::Sender<GatewayMessage>,
    ) -> Arc<Self> {
        Arc::new(Self {
            session_id,
            identity,
            sender,
            sequence: AtomicU64::new(0),
            last_heartbeat: RwLock::new(Instant::now()),
            heartbeat_acked: RwLock::new(true),
            rooms: RwLock::new(HashSet::new()),
            created_at: Instant::now(),
        })
    }

    /// Get the session ID
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Get the authenticated user ID
    pub fn user_id(&self) -> UserId {
        self.identity.user_id()
    }

    /// Get the next sequence number
    pub fn next_sequence(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Get the current sequence number
    pub fn current_sequence(&self) -> u64 {
        self.sequence.load(Ordering::SeqCst)
    }

    /// Record a heartbeat received
    pub async fn record_heartbeat(&self) {
        *self.last_heartbeat.write().await = Instant::now();
        *self.heartbeat_acked.write().await = true;
    }

    /// Get time since last heartbeat
    pub async fn time_since_heartbeat(&self) -> std::time::Duration {
        self.last_heartbeat.read().await.elapsed()
    }

    /// Check if a heartbeat arrived since the last supervision tick
    pub async fn is_heartbeat_acked(&self) -> bool {
        *self.heartbeat_acked.read().await
    }

    /// Mark the connection as awaiting a heartbeat
    pub async fn await_heartbeat(&self) {
        *self.heartbeat_acked.write().await = false;
    }

    /// Record a room membership
    pub async fn join_room(&self, room_id: RoomId) {
        self.rooms.write().await.insert(room_id);
    }

    /// Drop a room membership
    pub async fn leave_room(&self, room_id: &RoomId) {
        self.rooms.write().await.remove(room_id);
    }

    /// Get all joined rooms
    pub async fn rooms(&self) -> Vec<RoomId> {
        self.rooms.read().await.iter().cloned().collect()
    }

    /// Check membership in a room
    pub async fn is_in_room(&self, room_id: &RoomId) -> bool {
        self.rooms.read().await.contains(room_id)
    }

    /// Get connection age
    pub fn age(&self) -> std::time::Duration {
        self.created_at.elapsed()
    }

    /// Send a message to this connection
    pub async fn send(
        &self,
        message: GatewayMessage,
    ) -> Result<(), mpsc::error::SendError<GatewayMessage>> {
        self.sender.send(message).await
    }

    /// Try to send a message (non-blocking)
    pub fn try_send(
        &self,
        message: GatewayMessage,
    ) -> Result<(), mpsc::error::TrySendError<GatewayMessage>> {
        self.sender.try_send(message)
    }

    /// Check if the sender channel is closed
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("session_id", &self.session_id)
            .field("user_id", &self.identity.user_id())
            .field("sequence", &self.sequence.load(Ordering::SeqCst))
            .finish()
    }
}
