//! Session store
//!
//! Async get/set abstraction over the session entity with three
//! interchangeable backends: durable (file-backed), in-memory and no-op.
//! A factory selects a backend at startup from the feature flag and
//! platform capability.

mod factory;
mod file;
mod memory;
mod noop;

pub use factory::session_store;
pub use file::FileSessionStore;
pub use memory::MemorySessionStore;
pub use noop::NoopSessionStore;

use chrono::{DateTime, Utc};
use std::time::Duration;

use crate::error::{DevSessionError, Result};
use crate::session::DevSession;

/// Durable store for the single device-wide [`DevSession`] value.
///
/// All operations run off the caller's thread; mutation is last-write-wins
/// with no optimistic-concurrency check. The controller (or the simplified
/// setter helpers below) is the only writer path; readers never mutate.
#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    /// Current persisted value. A never-written backing store synthesizes
    /// and persists the default `{Prod, no expiry}` before returning it.
    async fn get(&self) -> Result<DevSession>;

    /// Atomically overwrite the persisted value and return the value
    /// actually stored, so callers can observe normalization (expiry
    /// truncated to millisecond precision).
    async fn set(&self, session: DevSession) -> Result<DevSession>;

    /// Simplified setter: write `{Dev, expiry}` directly, bypassing the
    /// controller's clearer orchestration. Callers have already checked
    /// `is_active`.
    async fn start_session(&self, expiry: DateTime<Utc>) -> Result<()> {
        self.set(DevSession::dev(expiry)).await?;
        Ok(())
    }

    /// Simplified setter: write `{Prod}` directly.
    async fn end_session(&self) -> Result<()> {
        self.set(DevSession::prod()).await?;
        Ok(())
    }

    /// True iff the persisted phase is `Dev` and the session has not expired
    async fn is_active(&self) -> Result<bool> {
        Ok(self.get().await?.is_active())
    }
}

/// Bounded-wait helpers over any [`SessionStore`].
///
/// A timed-out read/write surfaces as [`DevSessionError::Timeout`], never as
/// a silent default phase.
#[async_trait::async_trait]
pub trait SessionStoreExt: SessionStore {
    async fn get_timeout(&self, wait: Duration) -> Result<DevSession> {
        tokio::time::timeout(wait, self.get())
            .await
            .map_err(|_| DevSessionError::Timeout { duration: wait })?
    }

    async fn set_timeout(&self, session: DevSession, wait: Duration) -> Result<DevSession> {
        tokio::time::timeout(wait, self.set(session))
            .await
            .map_err(|_| DevSessionError::Timeout { duration: wait })?
    }
}

impl<T: SessionStore + ?Sized> SessionStoreExt for T {}
