//! In-memory session store
//!
//! Holds the session in a single guarded variable. Satisfies the store
//! contract but does not survive process restart; used where durable
//! structured storage is unavailable.

use tokio::sync::RwLock;

use crate::error::Result;
use crate::session::DevSession;
use crate::store::SessionStore;

/// Volatile [`SessionStore`] backend
pub struct MemorySessionStore {
    current: RwLock<Option<DevSession>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self {
            current: RwLock::new(None),
        }
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self) -> Result<DevSession> {
        {
            let guard = self.current.read().await;
            if let Some(session) = guard.as_ref() {
                return Ok(session.clone());
            }
        }
        // First read initializes, same as the durable backend.
        let mut guard = self.current.write().await;
        Ok(guard.get_or_insert_with(DevSession::prod).clone())
    }

    async fn set(&self, session: DevSession) -> Result<DevSession> {
        // Same millisecond normalization the durable record applies.
        let stored = DevSession::from_record(&session.to_record());
        let mut guard = self.current.write().await;
        *guard = Some(stored.clone());
        Ok(stored)
    }
}
