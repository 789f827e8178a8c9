//! User directory manager that dispatches to the configured backend.

use std::sync::Arc;

use tracing::info;

use authgate_core::config::DatabaseConfig;
use authgate_core::error::AppError;
use authgate_core::result::AppResult;

use crate::connection::DatabasePool;
use crate::directory::UserDirectory;
use crate::memory::MemoryUserDirectory;
use crate::migration::run_migrations;
use crate::repositories::UserRepository;

/// Wraps the user directory selected by `database.provider`.
#[derive(Debug, Clone)]
pub struct DirectoryManager {
    inner: Arc<dyn UserDirectory>,
    pool: Option<DatabasePool>,
}

impl DirectoryManager {
    /// Build the configured backend, connecting and migrating for postgres.
    pub async fn new(config: &DatabaseConfig) -> AppResult<Self> {
        match config.provider.as_str() {
            "postgres" => {
                info!("Initializing PostgreSQL user directory");
                let pool = DatabasePool::connect(config).await?;
                if config.run_migrations {
                    run_migrations(pool.pool()).await?;
                }
                let repository = UserRepository::new(pool.pool().clone(), config.query_timeout());
                Ok(Self {
                    inner: Arc::new(repository),
                    pool: Some(pool),
                })
            }
            "memory" => {
                info!("Initializing in-memory user directory");
                Ok(Self {
                    inner: Arc::new(MemoryUserDirectory::new()),
                    pool: None,
                })
            }
            other => Err(AppError::configuration(format!(
                "Unknown directory provider: '{other}'. Supported: memory, postgres"
            ))),
        }
    }

    /// Shared handle to the active backend.
    pub fn directory(&self) -> Arc<dyn UserDirectory> {
        Arc::clone(&self.inner)
    }

    /// Release backend resources.
    pub async fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}
