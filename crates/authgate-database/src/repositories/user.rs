//! PostgreSQL user repository.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use authgate_core::deadline::with_deadline;
use authgate_core::error::{AppError, ErrorKind};
use authgate_core::result::AppResult;
use authgate_core::types::UserId;
use authgate_entity::user::{NewUser, User};

use crate::directory::{UserDirectory, normalize_email};

/// Postgres error code for a failed CHECK constraint.
const CHECK_VIOLATION: &str = "23514";

/// Repository for the `users` table.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
    query_timeout: Duration,
}

impl UserRepository {
    /// Create a repository over `pool`, bounding each query by `query_timeout`.
    pub fn new(pool: PgPool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }
}

/// Translate a sqlx failure into the directory's error vocabulary.
fn map_sqlx_error(e: sqlx::Error, context: &'static str) -> AppError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return AppError::conflict("Email already registered");
        }
        if db.code().as_deref() == Some(CHECK_VIOLATION) {
            return AppError::bad_request("User record failed validation");
        }
    }
    AppError::with_source(ErrorKind::Internal, context, e)
}

#[async_trait]
impl UserDirectory for UserRepository {
    async fn create(&self, user: NewUser) -> AppResult<User> {
        let query = sqlx::query_as::<_, User>(
            "INSERT INTO users (id, name, email, password_hash) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, name, email, password_hash, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(&user.name)
        .bind(normalize_email(&user.email))
        .bind(&user.password_hash)
        .fetch_one(&self.pool);

        with_deadline(self.query_timeout, "users INSERT", async {
            query
                .await
                .map_err(|e| map_sqlx_error(e, "Failed to create user"))
        })
        .await
    }

    async fn find_by_email(&self, email: &str) -> AppResult<User> {
        let query = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, created_at \
             FROM users WHERE LOWER(email) = LOWER($1)",
        )
        .bind(email.trim())
        .fetch_optional(&self.pool);

        with_deadline(self.query_timeout, "users SELECT by email", async {
            query
                .await
                .map_err(|e| map_sqlx_error(e, "Failed to find user by email"))?
                .ok_or_else(|| AppError::not_found("User not found"))
        })
        .await
    }

    async fn find_by_id(&self, id: UserId) -> AppResult<User> {
        let query = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, created_at FROM users WHERE id = $1",
        )
        .bind(id.into_uuid())
        .fetch_optional(&self.pool);

        with_deadline(self.query_timeout, "users SELECT by id", async {
            query
                .await
                .map_err(|e| map_sqlx_error(e, "Failed to find user by id"))?
                .ok_or_else(|| AppError::not_found("User not found"))
        })
        .await
    }

    async fn health_check(&self) -> AppResult<bool> {
        let query = sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(&self.pool);

        with_deadline(self.query_timeout, "database health check", async {
            query
                .await
                .map(|v| v == 1)
                .map_err(|e| map_sqlx_error(e, "Database health check failed"))
        })
        .await
    }
}
