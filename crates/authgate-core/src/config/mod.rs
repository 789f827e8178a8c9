//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! TOML files and `AUTHGATE__*` environment variables. Each sub-module
//! represents a logical configuration section.

pub mod auth;
pub mod database;
pub mod logging;
pub mod server;
pub mod store;

use serde::{Deserialize, Serialize};

pub use self::auth::{Argon2Config, AuthConfig};
pub use self::database::DatabaseConfig;
pub use self::logging::LoggingConfig;
pub use self::server::{CorsConfig, ServerConfig};
pub use self::store::{MemoryStoreConfig, RedisStoreConfig, StoreConfig};

use crate::error::AppError;

/// Environment variable that overrides `auth.jwt_secret` when set.
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Token signing and credential settings.
    pub auth: AuthConfig,
    /// Token store backend settings.
    #[serde(default)]
    pub store: StoreConfig,
    /// User directory backend settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files and the environment.
    ///
    /// Merges `config/default.toml`, an optional `config/{env}.toml` overlay,
    /// environment variables prefixed with `AUTHGATE__`, and finally the
    /// `JWT_SECRET` variable. The result is validated before returning, so a
    /// missing signing secret fails here.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("AUTHGATE")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("auth.jwt_secret", std::env::var(JWT_SECRET_ENV).ok())
            .map_err(|e| AppError::configuration(format!("Invalid override: {e}")))?
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let parsed: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        parsed.validate()?;
        Ok(parsed)
    }

    /// Check invariants serde cannot express.
    pub fn validate(&self) -> Result<(), AppError> {
        self.auth.validate()?;
        self.store.validate()?;
        match self.database.provider.as_str() {
            "memory" | "postgres" => Ok(()),
            other => Err(AppError::configuration(format!(
                "Unknown directory provider: '{other}'. Supported: memory, postgres"
            ))),
        }
    }
}
