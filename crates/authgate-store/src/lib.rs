//! # authgate-store
//!
//! Token store implementations for AuthGate. Supports two modes:
//!
//! - **memory**: in-process table behind a single lock, with a min-heap of
//!   expiries reclaimed by one background sweeper task
//! - **redis**: Redis-backed store using native key expiry
//!   ([redis](https://crates.io/crates/redis) crate)
//!
//! The backend is selected at runtime based on configuration.

pub mod keys;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;
#[cfg(feature = "redis-backend")]
pub mod redis;

pub use provider::TokenStoreManager;
