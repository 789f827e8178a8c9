//! Token store operations over Redis.
//!
//! Each session is a plain string key holding the user id, written with
//! `SET .. PX` so expiry is enforced by Redis itself.

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::{debug, error};

use authgate_core::deadline::with_deadline;
use authgate_core::error::{AppError, ErrorKind};
use authgate_core::result::AppResult;
use authgate_core::traits::TokenStore;
use authgate_core::types::{SessionId, UserId};

use super::client::RedisClient;
use crate::keys::session_key;

/// Redis-backed token store.
#[derive(Debug, Clone)]
pub struct RedisTokenStore {
    client: RedisClient,
    /// Deadline applied to every command.
    timeout: Duration,
}

impl RedisTokenStore {
    /// Create a store over a connected client.
    pub fn new(client: RedisClient, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    fn key(&self, session_id: &SessionId) -> String {
        self.client.prefixed_key(&session_key(session_id))
    }

    fn map_err(e: redis::RedisError) -> AppError {
        error!(error = %e, "Redis command failed");
        AppError::with_source(ErrorKind::Internal, "Token store unavailable", e)
    }
}

/// TTL in whole milliseconds, rounded up so a sub-millisecond TTL is not lost.
fn ttl_millis(ttl: Duration) -> u64 {
    let nanos = ttl.as_nanos();
    let millis = nanos.div_ceil(1_000_000);
    u64::try_from(millis).unwrap_or(u64::MAX)
}

fn parse_user_id(raw: &str) -> AppResult<UserId> {
    raw.parse::<UserId>().map_err(|e| {
        AppError::with_source(ErrorKind::Internal, "Corrupt session entry in token store", e)
    })
}

#[async_trait]
impl TokenStore for RedisTokenStore {
    async fn get(&self, session_id: &SessionId) -> AppResult<UserId> {
        let key = self.key(session_id);
        let mut conn = self.client.conn();

        let raw: Option<String> = with_deadline(self.timeout, "redis GET", async {
            conn.get(&key).await.map_err(Self::map_err)
        })
        .await?;

        match raw {
            Some(value) => parse_user_id(&value),
            None => Err(AppError::unauthorized("Session is invalid or expired")),
        }
    }

    async fn set(&self, session_id: &SessionId, user_id: UserId, ttl: Duration) -> AppResult<()> {
        if ttl.is_zero() {
            debug!(session_id = %session_id, "Zero TTL, entry treated as expired");
            return self.delete(session_id).await;
        }

        let key = self.key(session_id);
        let mut conn = self.client.conn();
        let millis = ttl_millis(ttl);

        with_deadline(self.timeout, "redis SET", async {
            conn.pset_ex::<_, _, ()>(&key, user_id.to_string(), millis)
                .await
                .map_err(Self::map_err)
        })
        .await
    }

    async fn delete(&self, session_id: &SessionId) -> AppResult<()> {
        let key = self.key(session_id);
        let mut conn = self.client.conn();

        with_deadline(self.timeout, "redis DEL", async {
            conn.del::<_, ()>(&key).await.map_err(Self::map_err)
        })
        .await
    }

    async fn take(&self, session_id: &SessionId) -> AppResult<bool> {
        let key = self.key(session_id);
        let mut conn = self.client.conn();

        let removed: i64 = with_deadline(self.timeout, "redis DEL", async {
            conn.del(&key).await.map_err(Self::map_err)
        })
        .await?;
        Ok(removed > 0)
    }

    async fn health_check(&self) -> AppResult<bool> {
        let mut conn = self.client.conn();
        let pong: String = with_deadline(self.timeout, "redis PING", async {
            redis::cmd("PING")
                .query_async(&mut conn)
                .await
                .map_err(Self::map_err)
        })
        .await?;
        Ok(pong == "PONG")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use authgate_core::config::RedisStoreConfig;

    /// Live-server tests run only when `AUTHGATE_TEST_REDIS_URL` is set.
    async fn live_store() -> Option<RedisTokenStore> {
        let url = std::env::var("AUTHGATE_TEST_REDIS_URL").ok()?;
        let config = RedisStoreConfig {
            url,
            key_prefix: "authgate-test:".to_string(),
        };
        let client = RedisClient::connect(&config)
            .await
            .expect("Failed to connect to test Redis");
        Some(RedisTokenStore::new(client, Duration::from_secs(2)))
    }

    #[test]
    fn test_ttl_millis_rounds_up() {
        assert_eq!(ttl_millis(Duration::from_secs(900)), 900_000);
        assert_eq!(ttl_millis(Duration::from_micros(1)), 1);
        assert_eq!(ttl_millis(Duration::from_micros(1500)), 2);
    }

    #[test]
    fn test_parse_user_id() {
        let id = UserId::new();
        assert_eq!(parse_user_id(&id.to_string()).unwrap(), id);

        let err = parse_user_id("garbage").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Internal);
    }

    #[tokio::test]
    async fn test_live_get_missing_is_unauthorized() {
        let Some(store) = live_store().await else {
            return;
        };
        let err = store.get(&SessionId::generate()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
    }

    #[tokio::test]
    async fn test_live_set_get_delete() {
        let Some(store) = live_store().await else {
            return;
        };
        let session = SessionId::generate();
        let user = UserId::new();

        store
            .set(&session, user, Duration::from_secs(30))
            .await
            .unwrap();
        assert_eq!(store.get(&session).await.unwrap(), user);
        assert!(store.health_check().await.unwrap());

        store.delete(&session).await.unwrap();
        store.delete(&session).await.unwrap();
        assert!(store.get(&session).await.is_err());
    }

    #[tokio::test]
    async fn test_live_take_reports_removal_once() {
        let Some(store) = live_store().await else {
            return;
        };
        let session = SessionId::generate();

        store
            .set(&session, UserId::new(), Duration::from_secs(30))
            .await
            .unwrap();
        assert!(store.take(&session).await.unwrap());
        assert!(!store.take(&session).await.unwrap());
    }

    #[tokio::test]
    async fn test_live_zero_ttl_removes_existing_entry() {
        let Some(store) = live_store().await else {
            return;
        };
        let session = SessionId::generate();

        store
            .set(&session, UserId::new(), Duration::from_secs(30))
            .await
            .unwrap();
        store.set(&session, UserId::new(), Duration::ZERO).await.unwrap();
        assert!(store.get(&session).await.is_err());
    }

    #[tokio::test]
    async fn test_live_entry_expires() {
        let Some(store) = live_store().await else {
            return;
        };
        let session = SessionId::generate();

        store
            .set(&session, UserId::new(), Duration::from_millis(100))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(300)).await;

        let err = store.get(&session).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
    }
}
