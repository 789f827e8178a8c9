//! Background reclamation of expired in-memory sessions.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use super::store::MemoryTokenStore;

/// Runs until the shutdown signal flips to `true` (or its sender is dropped),
/// purging expired entries every `every`.
///
/// Lookups already refuse expired entries; the sweeper only bounds memory.
pub async fn run_sweeper(
    store: MemoryTokenStore,
    every: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    info!(interval_ms = every.as_millis() as u64, "Token store sweeper started");

    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let removed = store.purge_expired();
                if removed > 0 {
                    debug!(removed, remaining = store.allocated(), "Swept expired sessions");
                }
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }

    info!("Token store sweeper stopped");
}
