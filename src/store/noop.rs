//! No-op session store
//!
//! Selected when the developer session feature is administratively
//! disabled. Reads always observe production; writes are accepted and
//! discarded, so every other component behaves as if developer sessions
//! do not exist.

use crate::error::Result;
use crate::session::DevSession;
use crate::store::SessionStore;

/// Feature-disabled [`SessionStore`] backend
pub struct NoopSessionStore;

#[async_trait::async_trait]
impl SessionStore for NoopSessionStore {
    async fn get(&self) -> Result<DevSession> {
        Ok(DevSession::prod())
    }

    async fn set(&self, _session: DevSession) -> Result<DevSession> {
        // Discarded; a subsequent get still observes production.
        Ok(DevSession::prod())
    }
}
