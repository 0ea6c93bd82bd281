//! Connection registry
//!
//! Tracks all active WebSocket connections and their room memberships
//! using DashMap for thread-safe access.

use super::Connection;
use crate::protocol::GatewayMessage;
use hub_common::AuthenticatedContext;
use hub_core::RoomId;
use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Tracks all active WebSocket connections
///
/// Uses `DashMap` for concurrent access, so lookups and membership
/// changes never hold a lock across an await point.
pub struct RoomRegistry {
    /// Active connections by session ID
    connections: DashMap<String, Arc<Connection>>,

    /// Room ID to session IDs mapping
    room_connections: DashMap<RoomId, HashSet<String>>,
}

impl RoomRegistry {
    /// Create a new registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
            room_connections: DashMap::new(),
        }
    }

    /// Create a new registry wrapped in Arc
    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Register a new connection
    pub fn add_connection(
        &self,
        session_id: String,
        identity: AuthenticatedContext,
        sender: mpsc::Sender<GatewayMessage>,
    ) -> Arc<Connection> {
        let connection = Connection::new(session_id.clone(), identity, sender);
        self.connections.insert(session_id.clone(), connection.clone());

        tracing::debug!(session_id = %session_id, "Connection added");

        connection
    }

    /// Remove a connection and strip all of its room memberships
    ///
    /// Uses `alter` for atomic modify-and-cleanup operations to avoid TOCTOU
    /// race conditions. A session already gone is a no-op.
    pub async fn remove_connection(&self, session_id: &str) {
        if let Some((_, connection)) = self.connections.remove(session_id) {
            for room_id in connection.rooms().await {
                // Atomically modify the sessions set
                self.room_connections.alter(&room_id, |_, mut sessions| {
                    sessions.remove(session_id);
                    sessions
                });
            }

            // Clean up all empty room entries atomically
            self.room_connections.retain(|_, sessions| !sessions.is_empty());

            tracing::debug!(session_id = %session_id, "Connection removed");
        }
    }

    /// Get a connection by session ID
    pub fn get_connection(&self, session_id: &str) -> Option<Arc<Connection>> {
        self.connections.get(session_id).map(|r| r.clone())
    }

    /// Add a connection to a room
    ///
    /// Joining a room the session already belongs to is a no-op. Returns
    /// `false` if the session is unknown.
    pub async fn join_room(&self, session_id: &str, room_id: RoomId) -> bool {
        if let Some(connection) = self.connections.get(session_id) {
            connection.join_room(room_id.clone()).await;

            self.room_connections
                .entry(room_id.clone())
                .or_default()
                .insert(session_id.to_string());

            tracing::trace!(
                session_id = %session_id,
                room_id = %room_id,
                "Connection joined room"
            );

            true
        } else {
            false
        }
    }

    /// Remove a connection from a room
    ///
    /// Leaving a room the session never joined is a no-op. Empty room
    /// entries are cleaned up atomically.
    pub async fn leave_room(&self, session_id: &str, room_id: &RoomId) -> bool {
        if let Some(connection) = self.connections.get(session_id) {
            connection.leave_room(room_id).await;

            // Atomically modify the sessions set
            self.room_connections.alter(room_id, |_, mut sessions| {
                sessions.remove(session_id);
                sessions
            });

            // Clean up empty entry
            self.room_connections.retain(|_, sessions| !sessions.is_empty());

            tracing::trace!(
                session_id = %session_id,
                room_id = %room_id,
                "Connection left room"
            );

            true
        } else {
            false
        }
    }

    /// Get all connections currently in a room
    ///
    /// Snapshot semantics: the returned set reflects membership at call
    /// time and is safe to iterate while other sessions join or leave.
    pub fn members_of(&self, room_id: &RoomId) -> Vec<Arc<Connection>> {
        self.room_connections
            .get(room_id)
            .map(|sessions| {
                sessions
                    .iter()
                    .filter_map(|sid| self.connections.get(sid).map(|c| c.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Dispatch an event to every connection in a room
    ///
    /// Each connection gets its own sequence number so per-connection
    /// ordering holds regardless of who else is in the room.
    pub async fn dispatch_to_room(
        &self,
        room_id: &RoomId,
        event_type: &str,
        data: serde_json::Value,
    ) -> usize {
        let connections = self.members_of(room_id);
        let mut sent = 0;

        for conn in connections {
            let message = GatewayMessage::dispatch(event_type, conn.next_sequence(), data.clone());
            if conn.send(message).await.is_ok() {
                sent += 1;
            }
        }

        tracing::trace!(
            room_id = %room_id,
            event = event_type,
            sent = sent,
            "Event dispatched to room connections"
        );

        sent
    }

    /// Get the total number of active connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Get the number of rooms with at least one member
    pub fn room_count(&self) -> usize {
        self.room_connections.len()
    }

    /// Check if a session exists
    pub fn has_session(&self, session_id: &str) -> bool {
        self.connections.contains_key(session_id)
    }

    /// Clean up connections whose send channel is closed
    pub async fn cleanup_closed_connections(&self) -> usize {
        let closed: Vec<String> = self
            .connections
            .iter()
            .filter(|r| r.is_closed())
            .map(|r| r.key().clone())
            .collect();

        let count = closed.len();

        for session_id in closed {
            self.remove_connection(&session_id).await;
        }

        if count > 0 {
            tracing::info!(count = count, "Cleaned up closed connections");
        }

        count
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RoomRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoomRegistry")
            .field("connections", &self.connections.len())
            .field("rooms", &self.room_connections.len())
            .finish()
    }
}
