//! Token store manager that dispatches to the configured backend.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::info;

use authgate_core::config::StoreConfig;
use authgate_core::error::AppError;
use authgate_core::result::AppResult;
use authgate_core::traits::TokenStore;

/// Token store manager wrapping the configured backend.
///
/// The backend is selected once at construction time.
#[derive(Debug, Clone)]
pub struct TokenStoreManager {
    inner: Arc<dyn TokenStore>,
    backend: &'static str,
}

impl TokenStoreManager {
    /// Build the backend named by `config.provider`.
    ///
    /// For the memory backend this also spawns its sweeper, which stops when
    /// `shutdown` flips to `true`.
    pub async fn new(config: &StoreConfig, shutdown: watch::Receiver<bool>) -> AppResult<Self> {
        let (inner, backend): (Arc<dyn TokenStore>, &'static str) = match config.provider.as_str()
        {
            #[cfg(feature = "redis-backend")]
            "redis" => {
                info!("Initializing Redis token store");
                let client = crate::redis::RedisClient::connect(&config.redis).await?;
                let store =
                    crate::redis::RedisTokenStore::new(client, config.operation_timeout());
                (Arc::new(store), "redis")
            }
            #[cfg(feature = "memory")]
            "memory" => {
                info!(
                    sweep_interval_seconds = config.memory.sweep_interval().as_secs(),
                    "Initializing in-memory token store"
                );
                let store = crate::memory::MemoryTokenStore::new();
                store.spawn_sweeper(config.memory.sweep_interval(), shutdown);
                (Arc::new(store), "memory")
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown store provider: '{other}'. Supported: memory, redis"
                )));
            }
        };

        Ok(Self { inner, backend })
    }

    /// Name of the active backend.
    pub fn backend(&self) -> &'static str {
        self.backend
    }

    /// Shared handle to the active backend.
    pub fn store(&self) -> Arc<dyn TokenStore> {
        Arc::clone(&self.inner)
    }
}
