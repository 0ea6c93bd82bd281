//! Gateway state
//!
//! Application state for the gateway server.

use crate::connection::RoomRegistry;
use hub_common::{AppConfig, JwtService};
use hub_core::MessageStore;
use std::sync::Arc;

/// Gateway application state
///
/// Holds all shared dependencies for the gateway server.
#[derive(Clone)]
pub struct GatewayState {
    /// Connection registry for WebSocket connections
    registry: Arc<RoomRegistry>,
    /// Message store used before any fan-out
    message_store: Arc<dyn MessageStore>,
    /// JWT service for upgrade-time authentication
    jwt: Arc<JwtService>,
    /// Application configuration
    config: Arc<AppConfig>,
}

impl GatewayState {
    /// Create a new gateway state
    pub fn new(
        registry: Arc<RoomRegistry>,
        message_store: Arc<dyn MessageStore>,
        jwt: Arc<JwtService>,
        config: AppConfig,
    ) -> Self {
        Self {
            registry,
            message_store,
            jwt,
            config: Arc::new(config),
        }
    }

    /// Get the connection registry
    pub fn registry(&self) -> &RoomRegistry {
        &self.registry
    }

    /// Get the message store
    pub fn message_store(&self) -> &Arc<dyn MessageStore> {
        &self.message_store
    }

    /// Get the JWT service
    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

impl std::fmt::Debug for GatewayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayState")
            .field("registry", &self.registry)
            .field("config", &"AppConfig")
            .finish()
    }
}
