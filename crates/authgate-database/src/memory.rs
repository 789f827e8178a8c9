//! In-memory user directory.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;

use authgate_core::error::AppError;
use authgate_core::result::AppResult;
use authgate_core::types::UserId;
use authgate_entity::user::{NewUser, User};

use crate::directory::{UserDirectory, normalize_email};

/// Directory kept in process memory. Contents are lost on restart.
#[derive(Debug, Clone, Default)]
pub struct MemoryUserDirectory {
    /// Normalized email to user id; the entry lock makes email claims atomic.
    by_email: Arc<DashMap<String, UserId>>,
    users: Arc<DashMap<UserId, User>>,
}

impl MemoryUserDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered users.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Whether no users are registered.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn create(&self, user: NewUser) -> AppResult<User> {
        let email = normalize_email(&user.email);

        match self.by_email.entry(email.clone()) {
            Entry::Occupied(_) => Err(AppError::conflict("Email already registered")),
            Entry::Vacant(slot) => {
                let record = User {
                    id: UserId::new(),
                    name: user.name,
                    email,
                    password_hash: user.password_hash,
                    created_at: Utc::now(),
                };
                self.users.insert(record.id, record.clone());
                slot.insert(record.id);
                debug!(user_id = %record.id, "User created in memory directory");
                Ok(record)
            }
        }
    }

    async fn find_by_email(&self, email: &str) -> AppResult<User> {
        let id = self
            .by_email
            .get(&normalize_email(email))
            .map(|entry| *entry.value())
            .ok_or_else(|| AppError::not_found("User not found"))?;
        self.find_by_id(id).await
    }

    async fn find_by_id(&self, id: UserId) -> AppResult<User> {
        self.users
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
