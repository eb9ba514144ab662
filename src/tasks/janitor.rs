//! Cache Janitor
//!
//! Background task that periodically purges expired cache entries so they
//! stop occupying capacity between reads.

use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::cache::CacheStore;

/// Shortest sweep interval accepted.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Handle to a running sweep task.
///
/// The task keeps only a weak reference to the store and exits on its own
/// once the store is dropped. Dropping the handle stops the task.
#[derive(Debug)]
pub struct CacheJanitor {
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl CacheJanitor {
    /// Spawns the sweep loop on the current tokio runtime.
    ///
    /// # Panics
    /// Panics when called outside a tokio runtime.
    pub fn start<V>(store: &Arc<CacheStore<V>>, interval: Duration) -> Self
    where
        V: Clone + Send + Sync + 'static,
    {
        let interval = interval.max(MIN_INTERVAL);
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(sweep_loop(Arc::downgrade(store), interval, cancel.clone()));

        Self {
            cancel,
            handle: Some(handle),
        }
    }

    /// Starts a janitor with the configured sweep interval.
    pub fn from_config<V>(store: &Arc<CacheStore<V>>, config: &crate::config::Config) -> Self
    where
        V: Clone + Send + Sync + 'static,
    {
        Self::start(store, config.cleanup_interval)
    }

    /// Signals the task to stop. A sweep already running completes first.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    /// Stops the task and waits for it to exit.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for CacheJanitor {
    fn drop(&mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

async fn sweep_loop<V>(weak: Weak<CacheStore<V>>, interval: Duration, cancel: CancellationToken)
where
    V: Clone + Send + Sync + 'static,
{
    info!(
        interval_ms = interval.as_millis() as u64,
        "Starting cache janitor"
    );

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!("Cache janitor stopped");
                return;
            }
            _ = tokio::time::sleep(interval) => {}
        }

        let Some(store) = weak.upgrade() else {
            debug!("Cache store dropped, janitor exiting");
            return;
        };

        let removed = store.purge_expired();
        if removed > 0 {
            info!(removed, remaining = store.len(), "Janitor purged expired entries");
        } else {
            debug!("Janitor sweep: no expired entries found");
        }
    }
}
