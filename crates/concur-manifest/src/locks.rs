//! Per-organisation async write locks.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Lazily created async mutex per organisation id.
///
/// The outer map lock is `parking_lot` and held only to look up or insert
/// an entry; the returned guard is a tokio guard that may be held across
/// `.await`. Entries nobody holds or waits on are pruned on each lookup.
#[derive(Debug, Clone, Default)]
pub struct ManifestLocks {
    inner: Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>,
}

impl ManifestLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for and take the lock for `org_id`.
    pub async fn lock(&self, org_id: &str) -> OwnedMutexGuard<()> {
        let mutex = {
            let mut map = self.inner.lock();
            map.retain(|_, m| Arc::strong_count(m) > 1);
            Arc::clone(map.entry(org_id.to_string()).or_default())
        };
        mutex.lock_owned().await
    }

    /// Number of organisations with a live lock entry.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
