//! Session entity
//!
//! The device-wide developer session: phase state machine plus optional
//! expiry, and the versioned record persisted by the durable store.
//!
//! Valid transitions follow the natural cycle
//! `Prod -> ProdToDev -> Dev -> DevToProd -> Prod`; the transitional values
//! are only ever written by the controller while a purge is in flight.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current schema version of the on-disk record
pub const SCHEMA_VERSION: u32 = 1;

/// One discrete value of the session state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Store has never been initialized; never a valid steady state
    Uninitialized,
    /// Production isolation rules in force
    Prod,
    /// Purge in flight on the way into a developer session
    ProdToDev,
    /// Developer session active (subject to expiry)
    Dev,
    /// Purge in flight on the way back to production
    DevToProd,
}

impl SessionPhase {
    /// A phase the system can remain in indefinitely
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Prod | Self::Dev)
    }

    /// A phase only held while a purge is in flight
    pub fn is_transitional(self) -> bool {
        matches!(self, Self::ProdToDev | Self::DevToProd)
    }

    /// Wire ordinal for the durable record
    pub fn ordinal(self) -> u32 {
        match self {
            Self::Uninitialized => 0,
            Self::Prod => 1,
            Self::ProdToDev => 2,
            Self::Dev => 3,
            Self::DevToProd => 4,
        }
    }

    /// Decode a wire ordinal. Unknown values from future writers decode as
    /// `Uninitialized` so older readers fail closed instead of crashing.
    pub fn from_ordinal(ordinal: u32) -> Self {
        match ordinal {
            1 => Self::Prod,
            2 => Self::ProdToDev,
            3 => Self::Dev,
            4 => Self::DevToProd,
            _ => Self::Uninitialized,
        }
    }
}

/// The single piece of durable global session state
///
/// Exactly one value exists device-wide; it is overwritten, never deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevSession {
    pub phase: SessionPhase,
    /// When set, a `Dev` phase is inactive once `now >= expiry`.
    /// `Prod`-family phases carry no expiry.
    pub expiry: Option<DateTime<Utc>>,
}

impl DevSession {
    /// Freshly initialized production value (the first-read default)
    pub fn prod() -> Self {
        Self {
            phase: SessionPhase::Prod,
            expiry: None,
        }
    }

    /// Active developer session with the given expiry
    pub fn dev(expiry: DateTime<Utc>) -> Self {
        Self {
            phase: SessionPhase::Dev,
            expiry: Some(expiry),
        }
    }

    /// Transitional value written before a purge
    pub fn transitional(phase: SessionPhase) -> Self {
        debug_assert!(phase.is_transitional());
        Self {
            phase,
            expiry: None,
        }
    }

    /// True iff the phase is `Dev` and the session has not expired at `now`.
    /// A `Dev` session without an expiry never expires.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.phase == SessionPhase::Dev && self.expiry.map_or(true, |expiry| now < expiry)
    }

    /// True iff the session is active right now
    pub fn is_active(&self) -> bool {
        self.is_active_at(Utc::now())
    }

    /// Convert to the durable wire record. Expiry is truncated to
    /// millisecond precision; callers of `set()` observe this normalization.
    pub fn to_record(&self) -> SessionRecord {
        SessionRecord {
            schema_version: SCHEMA_VERSION,
            phase: self.phase.ordinal(),
            expiry_ms: self.expiry.map(|e| e.timestamp_millis()),
        }
    }

    /// Decode a durable record. Records written by a newer schema version
    /// decode as `Uninitialized` (fail closed, never crash).
    pub fn from_record(record: &SessionRecord) -> Self {
        if record.schema_version > SCHEMA_VERSION {
            return Self {
                phase: SessionPhase::Uninitialized,
                expiry: None,
            };
        }
        Self {
            phase: SessionPhase::from_ordinal(record.phase),
            expiry: record
                .expiry_ms
                .and_then(DateTime::<Utc>::from_timestamp_millis),
        }
    }
}

impl Default for DevSession {
    fn default() -> Self {
        Self::prod()
    }
}

/// Versioned on-disk representation of a [`DevSession`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub schema_version: u32,
    /// Phase ordinal, see [`SessionPhase::ordinal`]
    pub phase: u32,
    /// Expiry as epoch milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_ms: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const ALL_PHASES: [SessionPhase; 5] = [
        SessionPhase::Uninitialized,
        SessionPhase::Prod,
        SessionPhase::ProdToDev,
        SessionPhase::Dev,
        SessionPhase::DevToProd,
    ];

    #[test]
    fn phase_ordinal_round_trip() {
        for phase in ALL_PHASES {
            assert_eq!(SessionPhase::from_ordinal(phase.ordinal()), phase);
        }
    }

    #[test]
    fn unknown_ordinal_fails_closed() {
        assert_eq!(SessionPhase::from_ordinal(99), SessionPhase::Uninitialized);
    }

    #[test]
    fn record_round_trip_every_phase() {
        let expiry = Utc.with_ymd_and_hms(2026, 9, 1, 12, 0, 0).unwrap();
        for phase in ALL_PHASES {
            let session = DevSession {
                phase,
                expiry: if phase == SessionPhase::Dev {
                    Some(expiry)
                } else {
                    None
                },
            };
            assert_eq!(DevSession::from_record(&session.to_record()), session);
        }
    }

    #[test]
    fn expiry_truncated_to_millis() {
        let precise = Utc.timestamp_opt(1_760_000_000, 123_456_789).unwrap();
        let session = DevSession::dev(precise);
        let stored = DevSession::from_record(&session.to_record());
        let expiry = stored.expiry.unwrap();
        assert_eq!(expiry.timestamp_millis(), precise.timestamp_millis());
        assert_ne!(expiry, precise);
    }

    #[test]
    fn future_schema_version_fails_closed() {
        let record = SessionRecord {
            schema_version: SCHEMA_VERSION + 1,
            phase: SessionPhase::Dev.ordinal(),
            expiry_ms: None,
        };
        assert_eq!(
            DevSession::from_record(&record).phase,
            SessionPhase::Uninitialized
        );
    }

    #[test]
    fn expired_dev_session_is_inactive() {
        let now = Utc::now();
        let expired = DevSession::dev(now - chrono::Duration::seconds(1));
        assert!(!expired.is_active_at(now));

        let active = DevSession::dev(now + chrono::Duration::days(1));
        assert!(active.is_active_at(now));
    }

    #[test]
    fn dev_without_expiry_never_expires() {
        let session = DevSession {
            phase: SessionPhase::Dev,
            expiry: None,
        };
        assert!(session.is_active());
    }

    #[test]
    fn prod_is_never_active() {
        assert!(!DevSession::prod().is_active());
    }
}
