//! Governance policy
//!
//! A stateless decision over an [`ActionDescriptor`]. Reads are always
//! allowed. A mutation is denied when its origin is restricted or when its
//! declared risk exceeds the configured ceiling. Every denial carries a reason
//! and a remediation hint, both of which end up verbatim in the error the
//! caller sees.

use std::collections::HashSet;

use workbase_domain::{ActionDescriptor, GovernanceConfig, GovernanceDecision, RiskLevel};

/// Decides whether an action may leave the process
#[derive(Debug, Clone)]
pub struct GovernancePolicy {
    max_mutation_risk: RiskLevel,
    restricted_origins: HashSet<String>,
}

impl Default for GovernancePolicy {
    fn default() -> Self {
        Self::from_config(&GovernanceConfig::default())
    }
}

impl GovernancePolicy {
    pub fn new(max_mutation_risk: RiskLevel) -> Self {
        Self { max_mutation_risk, restricted_origins: HashSet::new() }
    }

    pub fn from_config(config: &GovernanceConfig) -> Self {
        Self {
            max_mutation_risk: config.max_mutation_risk,
            restricted_origins: config
                .restricted_origins
                .iter()
                .map(|origin| origin.trim().to_ascii_lowercase())
                .collect(),
        }
    }

    /// Restrict every mutation originating from `origin`.
    #[must_use]
    pub fn restrict_origin(mut self, origin: impl AsRef<str>) -> Self {
        self.restricted_origins.insert(origin.as_ref().trim().to_ascii_lowercase());
        self
    }

    pub const fn max_mutation_risk(&self) -> RiskLevel {
        self.max_mutation_risk
    }

    pub fn evaluate(&self, action: &ActionDescriptor) -> GovernanceDecision {
        if !action.mutating {
            return GovernanceDecision::allow("read-only action");
        }

        if self.restricted_origins.contains(&action.origin.to_ascii_lowercase()) {
            return GovernanceDecision::deny(
                format!(
                    "{} is not permitted from the restricted '{}' domain",
                    action.action, action.origin
                ),
                format!(
                    "Ask a tenant administrator to lift the '{}' restriction or perform the \
                     change through an approved workflow",
                    action.origin
                ),
            );
        }

        if action.risk > self.max_mutation_risk {
            return GovernanceDecision::deny(
                format!(
                    "{} carries {} risk, above the permitted {} ceiling",
                    action.action, action.risk, self.max_mutation_risk
                ),
                format!(
                    "Request approval from a tenant administrator or raise \
                     governance.max_mutation_risk to {}",
                    action.risk
                ),
            );
        }

        GovernanceDecision::allow(format!("{} risk within the permitted ceiling", action.risk))
    }
}
