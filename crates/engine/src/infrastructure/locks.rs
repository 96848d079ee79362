//! Per-user transition locks.
//!
//! Narrative operations for the same user must not run concurrently:
//! two simultaneous choices race on the cursor and the visited list. Each
//! mutating use case holds the user's lock for its whole
//! read-validate-mutate-commit span. Different users proceed in parallel.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use storyweave_domain::UserId;

/// Map of per-user async mutexes.
///
/// Lock entries are created on first use and kept for the process
/// lifetime; the user population of one chat bot is small enough that no
/// eviction is needed.
#[derive(Default)]
pub struct UserLocks {
    locks: DashMap<UserId, Arc<Mutex<()>>>,
}

impl UserLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the transition lock for a user, waiting if another
    /// transition for the same user is in flight.
    pub async fn acquire(&self, user_id: UserId) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry(user_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }
}
