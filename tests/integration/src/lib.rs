//! Integration test support
//!
//! Shared helpers and fixtures for gateway integration tests.

pub mod fixtures;
pub mod helpers;
