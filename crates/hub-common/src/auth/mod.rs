//! Authentication utilities

mod context;
mod jwt;

pub use context::AuthenticatedContext;
pub use jwt::{Claims, JwtService, TokenPair, TokenType};
