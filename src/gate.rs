//! Access-control gate
//!
//! Per-call capability decision combining the device developer-options
//! flag, caller debuggability and the current session phase. The decision
//! logic is an explicit ordered rule table so the precedence (not-ready
//! over permission over disabled) stays visible and testable.

use std::sync::Arc;
use tracing::warn;

use crate::error::AccessError;
use crate::session::SessionPhase;
use crate::store::SessionStore;

/// Device-level developer options switch
pub trait DeviceGate: Send + Sync {
    fn developer_options_enabled(&self) -> bool;
}

/// Resolved caller identity
#[derive(Debug, Clone)]
pub struct CallerInfo {
    pub package_name: String,
    pub debuggable: bool,
}

/// Caller identity lookup. A failed lookup is degraded by the gate, never
/// propagated.
pub trait CallerRegistry: Send + Sync {
    fn resolve(&self, uid: u32) -> anyhow::Result<CallerInfo>;
}

/// Capability decision handed to platform entry points
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevContext {
    pub enabled: bool,
    pub caller_package: String,
    pub phase: SessionPhase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Enabled,
    Disabled,
    NotReady,
    PermissionDenied,
}

#[derive(Clone, Copy)]
enum Flag {
    On,
    Off,
    Any,
}

impl Flag {
    fn matches(self, value: bool) -> bool {
        match self {
            Self::On => value,
            Self::Off => !value,
            Self::Any => true,
        }
    }
}

#[derive(Clone, Copy)]
enum PhaseMatch {
    Is(SessionPhase),
    Transitional,
    Any,
}

impl PhaseMatch {
    fn matches(self, phase: SessionPhase) -> bool {
        match self {
            Self::Is(p) => phase == p,
            Self::Transitional => phase.is_transitional(),
            Self::Any => true,
        }
    }
}

struct Rule {
    phase: PhaseMatch,
    developer_options: Flag,
    debuggable: Flag,
    outcome: Outcome,
}

/// Ordered decision table, evaluated top-down; first match wins.
const DECISION_TABLE: &[Rule] = &[
    // Mid-transition and uninitialized stores outrank everything.
    Rule {
        phase: PhaseMatch::Is(SessionPhase::Uninitialized),
        developer_options: Flag::Any,
        debuggable: Flag::Any,
        outcome: Outcome::NotReady,
    },
    Rule {
        phase: PhaseMatch::Transitional,
        developer_options: Flag::Any,
        debuggable: Flag::Any,
        outcome: Outcome::NotReady,
    },
    Rule {
        phase: PhaseMatch::Any,
        developer_options: Flag::Off,
        debuggable: Flag::Any,
        outcome: Outcome::Disabled,
    },
    Rule {
        phase: PhaseMatch::Any,
        developer_options: Flag::On,
        debuggable: Flag::On,
        outcome: Outcome::Enabled,
    },
    // Untrusted caller while a developer session is active.
    Rule {
        phase: PhaseMatch::Is(SessionPhase::Dev),
        developer_options: Flag::On,
        debuggable: Flag::Off,
        outcome: Outcome::PermissionDenied,
    },
    Rule {
        phase: PhaseMatch::Any,
        developer_options: Flag::On,
        debuggable: Flag::Off,
        outcome: Outcome::Disabled,
    },
];

fn decide(phase: SessionPhase, developer_options: bool, debuggable: bool) -> Outcome {
    DECISION_TABLE
        .iter()
        .find(|rule| {
            rule.phase.matches(phase)
                && rule.developer_options.matches(developer_options)
                && rule.debuggable.matches(debuggable)
        })
        .map(|rule| rule.outcome)
        // The table is total; fail closed if it ever stops being so.
        .unwrap_or(Outcome::Disabled)
}

/// Read-only capability gate consulted by every platform entry point
pub struct AccessGate {
    device: Arc<dyn DeviceGate>,
    callers: Arc<dyn CallerRegistry>,
    store: Arc<dyn SessionStore>,
}

impl AccessGate {
    pub fn new(
        device: Arc<dyn DeviceGate>,
        callers: Arc<dyn CallerRegistry>,
        store: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            device,
            callers,
            store,
        }
    }

    /// Produce a capability decision for the given caller uid.
    ///
    /// A failed identity lookup degrades to capability-disabled with a
    /// placeholder identity; callers are never blocked just because
    /// package-name resolution failed.
    pub async fn resolve(&self, uid: u32) -> Result<DevContext, AccessError> {
        let session = self.store.get().await?;

        let (caller, degraded) = match self.callers.resolve(uid) {
            Ok(caller) => (caller, false),
            Err(err) => {
                warn!(uid, %err, "caller identity lookup failed, degrading to disabled");
                let placeholder = CallerInfo {
                    package_name: "unknown".to_string(),
                    debuggable: false,
                };
                (placeholder, true)
            }
        };

        let developer_options = self.device.developer_options_enabled();
        let mut outcome = decide(session.phase, developer_options, caller.debuggable);
        // A denial earned only by the placeholder identity is not a real
        // denial; callers are never blocked because resolution failed.
        if degraded && outcome == Outcome::PermissionDenied {
            outcome = Outcome::Disabled;
        }

        match outcome {
            Outcome::Enabled => Ok(DevContext {
                enabled: true,
                caller_package: caller.package_name,
                phase: session.phase,
            }),
            Outcome::Disabled => Ok(DevContext {
                enabled: false,
                caller_package: caller.package_name,
                phase: session.phase,
            }),
            Outcome::NotReady => Err(AccessError::NotReady {
                phase: session.phase,
            }),
            Outcome::PermissionDenied => Err(AccessError::PermissionDenied {
                package: caller.package_name,
            }),
        }
    }

    /// Convenience entry point for request handlers that carry an ambient
    /// identity. Fails fast when none is available rather than guessing.
    pub async fn resolve_ambient(&self, uid: Option<u32>) -> Result<DevContext, AccessError> {
        let uid = uid.ok_or(AccessError::NoCallerIdentity)?;
        self.resolve(uid).await
    }
}
