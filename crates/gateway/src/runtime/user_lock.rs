//! Per-user provisioning lock.
//!
//! Serializes assistant and thread provisioning for one user inside this
//! process so two concurrent first-time requests do not both create remote
//! resources. Cross-process races are closed by the store's
//! insert-if-absent semantics.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Maps each user id to an async mutex.
pub struct UserLockMap {
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl Default for UserLockMap {
    fn default() -> Self {
        Self::new()
    }
}

impl UserLockMap {
    pub fn new() -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Wait for exclusive provisioning access for `user_id`.
    ///
    /// The guard releases on drop.
    pub async fn acquire(&self, user_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock();
            locks
                .entry(user_id.to_owned())
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }

    /// Number of tracked users (for monitoring).
    pub fn user_count(&self) -> usize {
        self.locks.lock().len()
    }

    /// Drop locks nobody holds or waits on.
    pub fn prune_idle(&self) {
        let mut locks = self.locks.lock();
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
    }
}
