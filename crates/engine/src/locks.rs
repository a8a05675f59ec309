//! In-process serialization of writes per branch.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use uuid::Uuid;

#[derive(Debug, Default)]
pub(crate) struct BranchLocks {
    inner: Mutex<HashMap<Uuid, Arc<AsyncMutex<()>>>>,
}

impl BranchLocks {
    /// Wait for exclusive write access to `branch_id`.
    ///
    /// Held across the whole DB transaction so two submissions for one branch
    /// never interleave their stock decrements.
    pub(crate) async fn acquire(&self, branch_id: Uuid) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self
                .inner
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            Arc::clone(map.entry(branch_id).or_default())
        };
        lock.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn same_branch_is_exclusive() {
        let locks = BranchLocks::default();
        let branch = Uuid::new_v4();

        let guard = locks.acquire(branch).await;
        let lock = {
            let map = locks.inner.lock().unwrap();
            Arc::clone(&map[&branch])
        };
        assert!(lock.try_lock().is_err());
        drop(guard);
        assert!(lock.try_lock().is_ok());
    }

    #[tokio::test]
    async fn other_branches_do_not_wait() {
        let locks = BranchLocks::default();
        let _a = locks.acquire(Uuid::new_v4()).await;
        let _b = locks.acquire(Uuid::new_v4()).await;
    }
}
