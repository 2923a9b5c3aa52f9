//! Holder of the current home snapshot

use std::sync::Arc;

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::watch;

use super::snapshot::Snapshot;

pub const DEFAULT_SNAPSHOT_BUFFER: usize = 64;

/// Concurrency-safe holder of the current [`Snapshot`].
///
/// The current value lives in a watch channel and is replaced under its write
/// lock, so concurrent updates are serialized and each one sees the value left
/// by the previous. Every published version is also fanned out to subscribers.
pub struct SnapshotStore {
    current: watch::Sender<Arc<Snapshot>>,
    updates: broadcast::Sender<Arc<Snapshot>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::with_buffer(DEFAULT_SNAPSHOT_BUFFER)
    }

    /// `buffer` is how many versions a slow subscriber may fall behind before it
    /// starts skipping to newer ones
    pub fn with_buffer(buffer: usize) -> Self {
        let (current, _) = watch::channel(Arc::new(Snapshot::default()));
        let (updates, _) = broadcast::channel(buffer.max(1));
        Self { current, updates }
    }

    pub fn current(&self) -> Arc<Snapshot> {
        self.current.borrow().clone()
    }

    /// Atomically replace the current snapshot with `f(current)`
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&Snapshot) -> Snapshot,
    {
        self.current.send_modify(|snapshot| {
            let next = Arc::new(f(&**snapshot));
            *snapshot = Arc::clone(&next);
            // No subscribers is fine, the watch value is still current
            let _ = self.updates.send(next);
        });
    }

    /// Subscribe to the current snapshot followed by every later update
    pub fn subscribe(&self) -> Subscription {
        // Holding the read lock keeps updates out until the receiver exists,
        // so nothing falls between the first value and the stream.
        let guard = self.current.borrow();
        let updates = self.updates.subscribe();
        let first = Arc::clone(&guard);
        drop(guard);

        Subscription {
            pending: Some(first),
            updates,
        }
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

/// One observer's view of the snapshot stream
pub struct Subscription {
    pending: Option<Arc<Snapshot>>,
    updates: broadcast::Receiver<Arc<Snapshot>>,
}

impl Subscription {
    /// Next snapshot in emission order, or `None` once the store is gone
    pub async fn next(&mut self) -> Option<Arc<Snapshot>> {
        if let Some(first) = self.pending.take() {
            return Some(first);
        }

        loop {
            match self.updates.recv().await {
                Ok(snapshot) => return Some(snapshot),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Snapshot subscriber lagged, skipped {} versions", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}
