//! # hub-service
//!
//! The message persistence gateway: validates outgoing drafts, resolves sender
//! display data from the profile directory, and records messages in an
//! in-memory store. Implements the `MessageStore` contract from `hub-core`.

pub mod services;

pub use services::{MessageService, ProfileDirectory, UserProfile};
