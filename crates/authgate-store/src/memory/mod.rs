//! In-memory token store.

pub mod store;
pub mod sweeper;

pub use store::MemoryTokenStore;
pub use sweeper::run_sweeper;
