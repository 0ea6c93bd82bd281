//! Gateway services

mod message;
mod profile;

pub use message::MessageService;
pub use profile::{ProfileDirectory, UserProfile};
