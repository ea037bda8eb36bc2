//! Per-aggregate write serialization. Every read-modify-write against one
//! classroom or attendance record must run under that id's lock so concurrent
//! handlers cannot lose each other's writes. Operations on distinct ids never
//! contend.

use bson::oid::ObjectId;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Default)]
pub struct LockArena {
    locks: DashMap<ObjectId, Arc<Mutex<()>>>,
}

impl LockArena {
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// Acquires the single-writer lock for one aggregate id.
    pub async fn lock(&self, id: ObjectId) -> OwnedMutexGuard<()> {
        let mutex = self
            .locks
            .entry(id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        mutex.lock_owned().await
    }

    /// Drops the lock entry once the aggregate no longer exists (e.g. the
    /// classroom record was removed on end).
    pub fn forget(&self, id: &ObjectId) {
        self.locks.remove(id);
    }
}
