//! Core traits defined in `authgate-core` and implemented by other crates.

pub mod token_store;

pub use token_store::TokenStore;
