//! Store backend selection
//!
//! Single construction-time selection point: feature flag off picks the
//! no-op backend; otherwise the durable backend when a storage directory
//! can be resolved, with the in-memory backend as the fallback.

use std::sync::Arc;
use tracing::{info, warn};

use crate::config::DevSessionConfig;
use crate::store::{FileSessionStore, MemorySessionStore, NoopSessionStore, SessionStore};

/// Select a [`SessionStore`] backend from configuration
pub fn session_store(config: &DevSessionConfig) -> Arc<dyn SessionStore> {
    if !config.enabled {
        info!("developer sessions disabled, using no-op session store");
        return Arc::new(NoopSessionStore);
    }

    match config.resolve_storage_dir() {
        Some(dir) => {
            info!(dir = %dir.display(), "using durable session store");
            Arc::new(FileSessionStore::new(dir))
        }
        None => {
            warn!("no storage directory available, session state will not survive restart");
            Arc::new(MemorySessionStore::new())
        }
    }
}
