//! Session controller
//!
//! Orchestrates phase transitions: reads the current phase, decides no-op
//! versus a two-step transition (enter transitional phase, purge, enter
//! terminal phase) and reports a tri-state result.
//!
//! The controller holds no lock of its own across the purge; it awaits the
//! purge before issuing the terminal-phase write, so no other component
//! can observe the new terminal phase until the purge has committed.

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::clearer::{DataClearer, PurgeRequest};
use crate::config::DevSessionConfig;
use crate::error::Result;
use crate::session::{DevSession, SessionPhase};
use crate::store::SessionStore;

/// Outcome of a controller operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionResult {
    /// Purge ran and the terminal phase was committed
    Success,
    /// The purge failed; the store is left in its transitional phase and a
    /// later call retries the whole purge-then-commit sequence
    Failure,
    /// The requested end state was already current; no side effects
    NoOp,
}

/// Drives `start_session` / `end_session` transitions
pub struct SessionController {
    store: Arc<dyn SessionStore>,
    clearer: Arc<dyn DataClearer>,
    ttl: chrono::Duration,
}

impl SessionController {
    pub fn new(
        store: Arc<dyn SessionStore>,
        clearer: Arc<dyn DataClearer>,
        ttl: chrono::Duration,
    ) -> Self {
        Self {
            store,
            clearer,
            ttl,
        }
    }

    pub fn from_config(
        config: &DevSessionConfig,
        store: Arc<dyn SessionStore>,
        clearer: Arc<dyn DataClearer>,
    ) -> Self {
        Self::new(store, clearer, config.session_ttl())
    }

    /// Enter a developer session.
    ///
    /// Idempotent on phase alone: an already-`Dev` store yields `NoOp`
    /// without rechecking expiry and without touching the clearer. Every
    /// other phase, transitional ones included, runs the full
    /// purge-then-commit sequence, so a transition stuck by an earlier
    /// purge failure heals on retry.
    pub async fn start_session(&self) -> Result<TransitionResult> {
        let current = self.store.get().await?;
        if current.phase == SessionPhase::Dev {
            debug!("developer session already active, nothing to do");
            return Ok(TransitionResult::NoOp);
        }

        self.transition(SessionPhase::ProdToDev, SessionPhase::Dev)
            .await
    }

    /// Leave a developer session; mirror of [`Self::start_session`].
    pub async fn end_session(&self) -> Result<TransitionResult> {
        let current = self.store.get().await?;
        if current.phase == SessionPhase::Prod {
            debug!("already in production, nothing to do");
            return Ok(TransitionResult::NoOp);
        }

        self.transition(SessionPhase::DevToProd, SessionPhase::Prod)
            .await
    }

    async fn transition(
        &self,
        via: SessionPhase,
        target: SessionPhase,
    ) -> Result<TransitionResult> {
        self.store.set(DevSession::transitional(via)).await?;
        info!(?via, "entered transitional phase, purging auction data");

        match self.clearer.purge(PurgeRequest::all()).await {
            Ok(()) => {
                // Expiry counts from commit time, after the purge.
                let session = match target {
                    SessionPhase::Dev => DevSession::dev(Utc::now() + self.ttl),
                    _ => DevSession::prod(),
                };
                let stored = self.store.set(session).await?;
                info!(phase = ?stored.phase, "session transition committed");
                Ok(TransitionResult::Success)
            }
            Err(err) => {
                // No compensating rollback: the store stays in the
                // transitional phase until a retry repeats the purge.
                error!(%err, stuck_phase = ?via, "auction data purge failed");
                Ok(TransitionResult::Failure)
            }
        }
    }
}
