//! Per-staff write serialization
//!
//! Every check-overlap-then-write sequence for a staff member runs while
//! holding that staff member's lock, so concurrent requests queue here
//! instead of racing for the SQLite write lock.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Debug, Clone, Default)]
pub struct StaffLocks {
    locks: Arc<DashMap<i64, Arc<Mutex<()>>>>,
}

impl StaffLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `staff_id`'s calendar
    pub async fn acquire(&self, staff_id: i64) -> OwnedMutexGuard<()> {
        let lock = self.locks.entry(staff_id).or_default().clone();
        lock.lock_owned().await
    }

    /// Drop the entry of a removed staff member
    pub fn forget(&self, staff_id: i64) {
        self.locks.remove(&staff_id);
    }
}
