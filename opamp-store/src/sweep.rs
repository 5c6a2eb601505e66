use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::InMemoryStore;

/// Spawns the background task that periodically purges hard-deleted
/// `AgentRemoteConfig`/`AgentPackage` records past their retention window.
/// Cancelled via `shutdown`; the caller awaits the returned handle during
/// graceful shutdown to make sure the loop actually stopped.
pub fn spawn_sweep_loop(store: Arc<InMemoryStore>, interval: Duration, retention: chrono::Duration, shutdown: CancellationToken) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    store.sweep_deleted(retention);
                    debug!("soft-delete sweep completed");
                }
                _ = shutdown.cancelled() => {
                    debug!("soft-delete sweep loop shutting down");
                    return;
                }
            }
        }
    })
}
