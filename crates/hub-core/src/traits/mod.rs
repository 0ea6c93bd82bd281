//! Store traits (ports) - the contracts the realtime hub requires
//!
//! The domain layer defines what it needs; an infrastructure crate provides
//! the implementation.

mod store;

pub use store::MessageStore;
