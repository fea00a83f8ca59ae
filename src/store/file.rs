//! Durable file-backed session store
//!
//! Persists the versioned session record as JSON, written atomically via
//! temp file + rename. Durable across process restarts.

use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{DevSessionError, Result};
use crate::session::{DevSession, SessionRecord};
use crate::store::SessionStore;

const RECORD_FILE: &str = "dev_session.json";

/// File-backed [`SessionStore`] backend
pub struct FileSessionStore {
    root_dir: PathBuf,
    record_path: PathBuf,
}

impl FileSessionStore {
    pub fn new(root_dir: PathBuf) -> Self {
        let record_path = root_dir.join(RECORD_FILE);
        Self {
            root_dir,
            record_path,
        }
    }

    pub fn record_path(&self) -> &Path {
        &self.record_path
    }

    async fn write_record(&self, session: &DevSession) -> Result<DevSession> {
        let record = session.to_record();
        let content = serde_json::to_string_pretty(&record)?;

        tokio::fs::create_dir_all(&self.root_dir).await?;

        // Write to a uniquely-named temp file, then rename into place.
        let tmp = self
            .record_path
            .with_extension(format!("tmp.{}", uuid::Uuid::new_v4()));
        tokio::fs::write(&tmp, content.as_bytes()).await?;
        if let Err(rename_err) = tokio::fs::rename(&tmp, &self.record_path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(rename_err.into());
        }

        debug!(phase = ?session.phase, "persisted session record");
        Ok(DevSession::from_record(&record))
    }
}

#[async_trait::async_trait]
impl SessionStore for FileSessionStore {
    async fn get(&self) -> Result<DevSession> {
        let content = match tokio::fs::read_to_string(&self.record_path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                // First read ever: synthesize and persist the default.
                debug!("no session record found, initializing to production");
                return self.write_record(&DevSession::prod()).await;
            }
            Err(err) => return Err(err.into()),
        };

        if content.trim().is_empty() {
            return self.write_record(&DevSession::prod()).await;
        }

        let record: SessionRecord = serde_json::from_str(&content).map_err(|err| {
            warn!(path = ?self.record_path, %err, "unreadable session record");
            DevSessionError::Corrupt {
                path: self.record_path.clone(),
            }
        })?;

        Ok(DevSession::from_record(&record))
    }

    async fn set(&self, session: DevSession) -> Result<DevSession> {
        self.write_record(&session).await
    }
}
