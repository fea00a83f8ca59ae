//! Transactional auction data store
//!
//! The shared transactional resource behind cross-app auction, filtering
//! and signals data. Writers stage changes inside a [`Transaction`], which
//! holds the store's single lock until commit; the purge issued during a
//! session transition takes the same lock, so a purge fully precedes or
//! fully follows any given write transaction. It can never observe or
//! leave behind a partial write.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Cross-app auction data tables
#[derive(Debug, Clone, Default)]
pub struct AuctionTables {
    /// Custom-audience update history, owner package -> last update receipt
    pub update_history: HashMap<String, String>,
    /// Packages with recorded app-install filtering state
    pub install_filtering: HashSet<String>,
    /// Protected signals, owner package -> encoded signals blob
    pub protected_signals: HashMap<String, String>,
}

/// Handle to the shared transactional auction data resource
#[derive(Clone, Default)]
pub struct AuctionDataStore {
    tables: Arc<Mutex<AuctionTables>>,
}

impl AuctionDataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a write transaction. Blocks until any in-flight transaction
    /// or purge has finished.
    pub async fn begin(&self) -> Transaction {
        Transaction {
            guard: self.tables.clone().lock_owned().await,
        }
    }

    /// Read-only snapshot of committed state
    pub async fn snapshot(&self) -> AuctionTables {
        self.tables.lock().await.clone()
    }

    /// Delete the selected tables as a single transaction
    pub(crate) async fn clear(
        &self,
        update_history: bool,
        install_filtering: bool,
        protected_signals: bool,
    ) {
        let mut guard = self.tables.lock().await;
        if update_history {
            guard.update_history.clear();
        }
        if install_filtering {
            guard.install_filtering.clear();
        }
        if protected_signals {
            guard.protected_signals.clear();
        }
    }
}

/// Exclusive write transaction on the auction data tables
///
/// Writes become visible to other readers only once the transaction is
/// committed (or dropped, which has the same effect; there is no rollback
/// at this layer).
pub struct Transaction {
    guard: OwnedMutexGuard<AuctionTables>,
}

impl Transaction {
    pub fn record_update(&mut self, owner: impl Into<String>, receipt: impl Into<String>) {
        self.guard.update_history.insert(owner.into(), receipt.into());
    }

    pub fn record_install(&mut self, package: impl Into<String>) {
        self.guard.install_filtering.insert(package.into());
    }

    pub fn record_signals(&mut self, owner: impl Into<String>, encoded: impl Into<String>) {
        self.guard.protected_signals.insert(owner.into(), encoded.into());
    }

    /// Commit the transaction, releasing the lock
    pub fn commit(self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn writes_commit_atomically() {
        let store = AuctionDataStore::new();

        let mut txn = store.begin().await;
        txn.record_update("com.example.buyer", "receipt-1");
        txn.record_signals("com.example.buyer", "c2lnbmFscw");
        txn.commit();

        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.update_history.len(), 1);
        assert_eq!(snapshot.protected_signals.len(), 1);
    }

    #[tokio::test]
    async fn purge_waits_for_in_flight_transaction() {
        let store = AuctionDataStore::new();
        let purged = Arc::new(AtomicBool::new(false));

        let mut txn = store.begin().await;
        txn.record_install("com.example.app");

        let purge_store = store.clone();
        let purge_flag = purged.clone();
        let purge_task = tokio::spawn(async move {
            purge_store.clear(true, true, true).await;
            purge_flag.store(true, Ordering::SeqCst);
        });

        // The purge cannot proceed while the transaction holds the lock.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!purged.load(Ordering::SeqCst));

        txn.commit();
        purge_task.await.unwrap();
        assert!(purged.load(Ordering::SeqCst));

        // The purge observed the committed row and deleted it.
        assert!(store.snapshot().await.install_filtering.is_empty());
    }

    #[tokio::test]
    async fn selective_clear_leaves_other_tables() {
        let store = AuctionDataStore::new();
        let mut txn = store.begin().await;
        txn.record_update("com.example.buyer", "receipt-1");
        txn.record_install("com.example.app");
        txn.commit();

        store.clear(true, false, false).await;

        let snapshot = store.snapshot().await;
        assert!(snapshot.update_history.is_empty());
        assert_eq!(snapshot.install_filtering.len(), 1);
    }
}
