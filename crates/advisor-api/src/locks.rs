use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type LockMap = Mutex<HashMap<String, Arc<AsyncMutex<()>>>>;

/// Per-user async mutexes. Holding a [`UserGuard`] excludes every other
/// holder for the same user id; different ids never contend. Entries are
/// dropped from the map once nobody holds or waits on them.
#[derive(Clone, Default)]
pub struct UserLocks {
    inner: Arc<LockMap>,
}

pub struct UserGuard {
    map: Arc<LockMap>,
    user_id: String,
    // Still held while `drop` runs, so it counts toward the strong count.
    _guard: OwnedMutexGuard<()>,
}

impl UserLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self, user_id: &str) -> UserGuard {
        let mutex = {
            let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            map.entry(user_id.to_string()).or_default().clone()
        };

        let guard = mutex.lock_owned().await;
        UserGuard {
            map: self.inner.clone(),
            user_id: user_id.to_string(),
            _guard: guard,
        }
    }

    /// Number of users with a live lock entry.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Drop for UserGuard {
    fn drop(&mut self) {
        let mut map = self.map.lock().unwrap_or_else(|e| e.into_inner());
        // One reference in the map, one inside our guard: no waiters.
        if map.get(&self.user_id).is_some_and(|m| Arc::strong_count(m) == 2) {
            map.remove(&self.user_id);
        }
    }
}
