//! # hub-gateway
//!
//! WebSocket gateway for real-time chat fan-out: rooms, join/leave, and
//! persisted-message broadcast.

pub mod connection;
pub mod events;
pub mod handlers;
pub mod protocol;
pub mod server;

pub use server::{create_app, create_gateway_state, run, run_server, GatewayState};
