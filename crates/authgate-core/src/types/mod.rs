//! Shared domain types.

pub mod context;
pub mod id;

pub use context::RequestContext;
pub use id::{SessionId, UserId};
