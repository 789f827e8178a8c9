//! # authgate-entity
//!
//! Entity models persisted by the user directory.

pub mod user;

pub use user::{NewUser, User};
