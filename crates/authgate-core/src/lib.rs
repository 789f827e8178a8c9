//! # authgate-core
//!
//! Core crate for AuthGate. Contains the token store and user directory
//! traits, configuration schemas, typed identifiers, the request context
//! attached by the claim gate, and the unified error system.
//!
//! This crate has **no** internal dependencies on other AuthGate crates.

pub mod config;
pub mod deadline;
pub mod error;
pub mod response;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
