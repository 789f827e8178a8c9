//! Argon2id password hashing and verification.
//!
//! Both operations are CPU-bound and run on tokio's blocking pool.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        PasswordHash, PasswordHasher as ArgonHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

use authgate_core::config::Argon2Config;
use authgate_core::error::{AppError, ErrorKind};

/// Hashes and verifies passwords with Argon2id.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("algorithm", &"argon2id")
            .finish_non_exhaustive()
    }
}

impl PasswordHasher {
    /// Build a hasher with the configured cost parameters.
    pub fn new(config: &Argon2Config) -> Result<Self, AppError> {
        let params = Params::new(config.memory_kib, config.iterations, config.parallelism, None)
            .map_err(|e| AppError::configuration(format!("Invalid Argon2 parameters: {e}")))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hash `password` with a random salt, returning a PHC string.
    pub async fn hash_password(&self, password: String) -> Result<String, AppError> {
        let argon2 = self.argon2.clone();
        tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            argon2
                .hash_password(password.as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))
        })
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Internal, "Password hashing task failed", e))?
    }

    /// Check `password` against a stored PHC string.
    ///
    /// `Ok(false)` on mismatch; `Internal` if the stored hash is unreadable.
    pub async fn verify_password(&self, password: String, hash: String) -> Result<bool, AppError> {
        let argon2 = self.argon2.clone();
        tokio::task::spawn_blocking(move || {
            let parsed = PasswordHash::new(&hash)
                .map_err(|e| AppError::internal(format!("Invalid password hash format: {e}")))?;

            match argon2.verify_password(password.as_bytes(), &parsed) {
                Ok(()) => Ok(true),
                Err(argon2::password_hash::Error::Password) => Ok(false),
                Err(e) => Err(AppError::internal(format!(
                    "Password verification failed: {e}"
                ))),
            }
        })
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Internal, "Password verification task failed", e)
        })?
    }
}
