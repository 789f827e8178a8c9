//! In-process token store: one lock over a session table plus an expiry heap.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::debug;

use authgate_core::error::AppError;
use authgate_core::result::AppResult;
use authgate_core::traits::TokenStore;
use authgate_core::types::{SessionId, UserId};

/// A live session entry.
#[derive(Debug, Clone)]
struct Entry {
    user_id: UserId,
    expires_at: Instant,
    /// Distinguishes this insertion from earlier ones under the same key.
    generation: u64,
}

/// State guarded by the store lock.
#[derive(Debug, Default)]
struct SessionTable {
    entries: HashMap<SessionId, Entry>,
    /// Min-heap of `(expires_at, generation, key)` consumed by the sweeper.
    expiries: BinaryHeap<Reverse<(Instant, u64, SessionId)>>,
    next_generation: u64,
}

impl SessionTable {
    fn insert(&mut self, session_id: SessionId, user_id: UserId, expires_at: Instant) {
        self.next_generation += 1;
        let generation = self.next_generation;
        self.expiries
            .push(Reverse((expires_at, generation, session_id.clone())));
        self.entries.insert(
            session_id,
            Entry {
                user_id,
                expires_at,
                generation,
            },
        );
    }

    /// Drops every heap record due at `now`, removing the table entry only if
    /// the record still describes the current insertion under that key.
    fn purge_expired(&mut self, now: Instant) -> usize {
        let mut removed = 0;
        while let Some(Reverse((expires_at, _, _))) = self.expiries.peek() {
            if *expires_at > now {
                break;
            }
            let Some(Reverse((_, generation, session_id))) = self.expiries.pop() else {
                break;
            };
            let current = self
                .entries
                .get(&session_id)
                .is_some_and(|entry| entry.generation == generation);
            if current {
                self.entries.remove(&session_id);
                removed += 1;
            }
        }
        removed
    }
}

/// In-memory token store.
///
/// Cloning is cheap; clones share the same table.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    table: Arc<Mutex<SessionTable>>,
}

impl MemoryTokenStore {
    /// Create an empty store. Call [`MemoryTokenStore::spawn_sweeper`] to
    /// reclaim expired entries in the background.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries that have not yet expired.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.table
            .lock()
            .entries
            .values()
            .filter(|entry| entry.expires_at > now)
            .count()
    }

    /// Whether no unexpired entries remain.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of entries physically held, expired or not.
    pub fn allocated(&self) -> usize {
        self.table.lock().entries.len()
    }

    /// Remove every entry whose TTL has elapsed. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        self.table.lock().purge_expired(Instant::now())
    }

    /// Spawn the single background sweeper for this store.
    pub fn spawn_sweeper(&self, every: Duration, shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(super::sweeper::run_sweeper(self.clone(), every, shutdown))
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn get(&self, session_id: &SessionId) -> AppResult<UserId> {
        let now = Instant::now();
        let mut table = self.table.lock();

        match table.entries.get(session_id) {
            Some(entry) if entry.expires_at > now => Ok(entry.user_id),
            Some(_) => {
                table.entries.remove(session_id);
                Err(AppError::unauthorized("Session is invalid or expired"))
            }
            None => Err(AppError::unauthorized("Session is invalid or expired")),
        }
    }

    async fn set(&self, session_id: &SessionId, user_id: UserId, ttl: Duration) -> AppResult<()> {
        let mut table = self.table.lock();

        if ttl.is_zero() {
            table.entries.remove(session_id);
            debug!(session_id = %session_id, "Zero TTL, entry treated as expired");
            return Ok(());
        }

        let expires_at = Instant::now()
            .checked_add(ttl)
            .ok_or_else(|| AppError::internal(format!("Session TTL out of range: {ttl:?}")))?;

        table.insert(session_id.clone(), user_id, expires_at);
        Ok(())
    }

    async fn delete(&self, session_id: &SessionId) -> AppResult<()> {
        self.table.lock().entries.remove(session_id);
        Ok(())
    }

    async fn take(&self, session_id: &SessionId) -> AppResult<bool> {
        let now = Instant::now();
        let removed = self.table.lock().entries.remove(session_id);
        Ok(removed.is_some_and(|entry| entry.expires_at > now))
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
