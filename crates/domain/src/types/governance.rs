//! Governance policy inputs and outputs

use serde::{Deserialize, Serialize};
#[cfg(feature = "ts-gen")]
use ts_rs::TS;

use crate::impl_domain_enum_conversions;

/// Declared risk of an attempted action, ordered from least to most severe
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

impl_domain_enum_conversions!(RiskLevel {
    Low => "low",
    Medium => "medium",
    High => "high",
    Critical => "critical",
});

/// Description of an action submitted for a governance decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDescriptor {
    /// Operation name, e.g. `delete_entity`
    pub action: String,
    /// Domain the action originates from, e.g. `payroll`
    pub origin: String,
    pub risk: RiskLevel,
    /// Whether the action changes remote state
    pub mutating: bool,
}

impl ActionDescriptor {
    pub fn mutation(action: impl Into<String>, origin: impl Into<String>, risk: RiskLevel) -> Self {
        Self { action: action.into(), origin: origin.into(), risk, mutating: true }
    }

    pub fn read(action: impl Into<String>, origin: impl Into<String>) -> Self {
        Self { action: action.into(), origin: origin.into(), risk: RiskLevel::Low, mutating: false }
    }
}

/// Outcome of evaluating an [`ActionDescriptor`]
///
/// Created fresh per evaluation and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct GovernanceDecision {
    pub allowed: bool,
    pub reason: String,
    pub remediation: String,
    /// Set by the caller once a denial has been acted upon
    pub intercepted: bool,
}

impl GovernanceDecision {
    pub fn allow(reason: impl Into<String>) -> Self {
        Self { allowed: true, reason: reason.into(), remediation: String::new(), intercepted: false }
    }

    pub fn deny(reason: impl Into<String>, remediation: impl Into<String>) -> Self {
        Self {
            allowed: false,
            reason: reason.into(),
            remediation: remediation.into(),
            intercepted: false,
        }
    }

    /// Record that the denial stopped a call.
    #[must_use]
    pub fn intercept(mut self) -> Self {
        self.intercepted = true;
        self
    }
}
