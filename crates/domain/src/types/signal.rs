//! Process-wide signals
//!
//! Published by the call path, consumed by the UI shell (session) and the
//! audit surface (governance).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::governance::RiskLevel;
use crate::constants::{SIGNAL_GOVERNANCE_INGESTED, SIGNAL_SESSION_INVALIDATED};

/// Governance telemetry carried out-of-band when a mutation is vetoed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceSignal {
    pub id: Uuid,
    pub origin: String,
    pub action: String,
    pub message: String,
    pub risk: RiskLevel,
    pub intercepted: bool,
    pub emitted_at: DateTime<Utc>,
}

/// A signal published on the process-wide bus
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Signal {
    /// The remote rejected the session; the shell must re-authenticate
    SessionInvalidated {
        reason: String,
        /// Tenant that was active when the session was torn down
        tenant_id: Option<String>,
        emitted_at: DateTime<Utc>,
    },
    /// A governance decision worth auditing
    GovernanceIngested(GovernanceSignal),
}

impl Signal {
    pub fn session_invalidated(reason: impl Into<String>, tenant_id: Option<String>) -> Self {
        Self::SessionInvalidated { reason: reason.into(), tenant_id, emitted_at: Utc::now() }
    }

    /// Stable event name for consumers that route on strings
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SessionInvalidated { .. } => SIGNAL_SESSION_INVALIDATED,
            Self::GovernanceIngested(_) => SIGNAL_GOVERNANCE_INGESTED,
        }
    }
}
