//! Developer session configuration
//!
//! Feature flag, session TTL, storage location and operation timeouts.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the developer session subsystem
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DevSessionConfig {
    /// Master feature flag; when off every component behaves as if
    /// developer sessions do not exist
    #[serde(default)]
    pub enabled: bool,

    /// How long a started session stays active before expiring
    #[serde(default = "default_ttl_hours")]
    pub session_ttl_hours: u64,

    /// Directory for the durable session record.
    /// Defaults to the platform data dir when unset.
    #[serde(default)]
    pub storage_dir: Option<PathBuf>,

    /// Bound for blocking waits on store reads/writes
    #[serde(default = "default_op_timeout_secs")]
    pub op_timeout_secs: u64,
}

impl Default for DevSessionConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            session_ttl_hours: default_ttl_hours(),
            storage_dir: None,
            op_timeout_secs: default_op_timeout_secs(),
        }
    }
}

impl DevSessionConfig {
    /// Session time-to-live as a chrono duration
    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.session_ttl_hours as i64)
    }

    /// Timeout for bounded store waits
    pub fn op_timeout(&self) -> Duration {
        Duration::from_secs(self.op_timeout_secs)
    }

    /// Resolve the storage directory, falling back to the platform data dir
    pub fn resolve_storage_dir(&self) -> Option<PathBuf> {
        if let Some(dir) = &self.storage_dir {
            return Some(dir.clone());
        }
        dirs::data_dir().map(|d| d.join("devsession"))
    }
}

fn default_ttl_hours() -> u64 {
    24
}

fn default_op_timeout_secs() -> u64 {
    5
}
