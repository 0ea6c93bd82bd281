//! WebSocket connection management

mod connection;
mod registry;

pub use connection::Connection;
pub use registry::RoomRegistry;
