//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use authgate_auth::SessionManager;
use authgate_core::config::AppConfig;
use authgate_core::traits::TokenStore;
use authgate_database::UserDirectory;

/// Shared dependencies, passed to handlers via `State<AppState>`.
///
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Session lifecycle manager
    pub session_manager: Arc<SessionManager>,
    /// User directory backend
    pub users: Arc<dyn UserDirectory>,
    /// Token store backend
    pub store: Arc<dyn TokenStore>,
}

impl AppState {
    /// Assemble state from its parts.
    pub fn new(
        config: AppConfig,
        session_manager: SessionManager,
        users: Arc<dyn UserDirectory>,
        store: Arc<dyn TokenStore>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            session_manager: Arc::new(session_manager),
            users,
            store,
        }
    }
}
