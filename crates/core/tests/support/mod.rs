//! Shared test helpers for `workbase-core` integration tests.
//!
//! Scripted gateways and recording sinks let facade tests assert on exactly
//! what crossed the network boundary and what was signalled.

pub mod gateway;

use std::sync::Arc;

use workbase_core::{
    CredentialStore, GovernancePolicy, LocalSettingsFallback, MemoryStore, SignalSink,
    WorkbaseApi,
};

pub use gateway::{RecordingSink, ScriptedGateway};

/// Facade wired to in-memory collaborators
pub struct Harness {
    pub api: WorkbaseApi,
    pub gateway: Arc<ScriptedGateway>,
    pub credentials: Arc<CredentialStore>,
    pub signals: Arc<RecordingSink>,
    pub durable: Arc<MemoryStore>,
}

impl Harness {
    pub fn new(gateway: ScriptedGateway) -> Self {
        Self::with_policy(gateway, GovernancePolicy::default())
    }

    pub fn with_policy(gateway: ScriptedGateway, governance: GovernancePolicy) -> Self {
        let gateway = Arc::new(gateway);
        let durable = Arc::new(MemoryStore::new());
        let credentials =
            Arc::new(CredentialStore::new(Arc::new(MemoryStore::new()), durable.clone()));
        let signals = Arc::new(RecordingSink::default());
        let api = WorkbaseApi::new(
            gateway.clone(),
            credentials.clone(),
            governance,
            signals.clone() as Arc<dyn SignalSink>,
            LocalSettingsFallback::new(durable.clone()),
        );
        Self { api, gateway, credentials, signals, durable }
    }
}
