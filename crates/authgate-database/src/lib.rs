//! # authgate-database
//!
//! The [`UserDirectory`] contract and its backends:
//!
//! - **postgres**: sqlx connection pool, embedded migrations and the
//!   [`repositories::UserRepository`]
//! - **memory**: [`memory::MemoryUserDirectory`] over `dashmap`, for local
//!   runs and tests
//!
//! [`DirectoryManager`] picks one at startup from `database.provider`.

pub mod connection;
pub mod directory;
pub mod memory;
pub mod migration;
pub mod provider;
pub mod repositories;

pub use connection::DatabasePool;
pub use directory::UserDirectory;
pub use provider::DirectoryManager;
