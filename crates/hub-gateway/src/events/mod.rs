//! Dispatch events sent to clients

mod event_types;
mod payloads;

pub use event_types::GatewayEventType;
pub use payloads::ErrorPayload;
