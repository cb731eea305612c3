//! Periodic removal of expired pastes.
//!
//! Reads already delete expired records lazily; the sweeper only keeps
//! never-read records from lingering on disk.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use toopaste_core::PasteStore;

/// Spawn a task that purges expired pastes every `interval`.
pub fn spawn_expiry_sweeper(store: Arc<PasteStore>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let store = store.clone();
            match tokio::task::spawn_blocking(move || store.purge_expired()).await {
                Ok(Ok(0)) => {}
                Ok(Ok(removed)) => tracing::info!("Purged {} expired paste(s)", removed),
                Ok(Err(err)) => tracing::warn!("Expired paste sweep failed: {}", err),
                Err(err) => tracing::error!("Expired paste sweep panicked: {}", err),
            }
        }
    })
}
