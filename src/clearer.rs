//! Data clearer boundary
//!
//! Narrow async side-effect trait invoked by the session controller during
//! a phase transition. No decision logic here, pure destructive execution.

use thiserror::Error;
use tracing::info;

use crate::data::AuctionDataStore;

/// Which cross-app data families a purge deletes. The controller always
/// requests all three together, as one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PurgeRequest {
    pub update_history: bool,
    pub install_filtering: bool,
    pub protected_signals: bool,
}

impl PurgeRequest {
    pub fn all() -> Self {
        Self {
            update_history: true,
            install_filtering: true,
            protected_signals: true,
        }
    }
}

/// Purge failure; no structured taxonomy beyond "failed"
#[derive(Debug, Error)]
#[error("purge failed: {0}")]
pub struct PurgeError(pub String);

/// Destructive side effect deleting cross-app auction, filtering and
/// signals data during a phase transition
#[async_trait::async_trait]
pub trait DataClearer: Send + Sync {
    async fn purge(&self, request: PurgeRequest) -> Result<(), PurgeError>;
}

/// Clearer that purges the shared [`AuctionDataStore`] as one transaction
pub struct AuctionDataClearer {
    data: AuctionDataStore,
}

impl AuctionDataClearer {
    pub fn new(data: AuctionDataStore) -> Self {
        Self { data }
    }
}

#[async_trait::async_trait]
impl DataClearer for AuctionDataClearer {
    async fn purge(&self, request: PurgeRequest) -> Result<(), PurgeError> {
        info!(?request, "purging cross-app auction data");
        self.data
            .clear(
                request.update_history,
                request.install_filtering,
                request.protected_signals,
            )
            .await;
        info!("auction data purge committed");
        Ok(())
    }
}
