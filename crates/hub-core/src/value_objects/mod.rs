//! Value objects - identifier newtypes used across the system

mod ids;
mod room;

pub use ids::{GroupId, MediaId, MessageId, UserId};
pub use room::{RoomId, RoomIdError};
