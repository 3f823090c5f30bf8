//! Composition root
//!
//! Wires configuration into a ready [`WorkbaseApi`]: durable storage,
//! credential tiers, the signal bus, the resilient executor and governance.

use std::path::Path;
use std::sync::Arc;

use tracing::info;
use workbase_core::{
    CredentialStore, GovernancePolicy, KeyValueStore, LocalSettingsFallback, MemoryStore,
    SignalBus, WorkbaseApi,
};
use workbase_domain::{Config, Result, TokenBackend, WorkbaseError};

use crate::http::{ReqwestTransport, RequestExecutor, Transport};
use crate::storage::SqliteKeyValueStore;

/// Fully wired remote-data access layer
pub struct WorkbaseClient {
    api: WorkbaseApi,
    signals: SignalBus,
    credentials: Arc<CredentialStore>,
    database: Arc<SqliteKeyValueStore>,
}

impl WorkbaseClient {
    /// Build a client with the default reqwest transport.
    ///
    /// # Errors
    /// Returns `WorkbaseError::Config` for an invalid configuration and
    /// `WorkbaseError::Database` when the local store cannot be opened.
    pub fn from_config(config: &Config) -> Result<Self> {
        let transport = ReqwestTransport::new(config.api.user_agent.as_deref())?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Build a client over a caller-supplied transport.
    pub fn with_transport(config: &Config, transport: Arc<dyn Transport>) -> Result<Self> {
        config.validate()?;

        let database = Arc::new(SqliteKeyValueStore::open(Path::new(&config.storage.database_path))?);
        let persistent = persistent_tier(config, &database)?;
        let credentials = Arc::new(CredentialStore::with_tenant_header(
            Arc::new(MemoryStore::new()),
            persistent,
            config.api.tenant_header.clone(),
        ));
        let restored = credentials.restore()?;

        let signals = SignalBus::default();
        let executor = RequestExecutor::from_config(
            config,
            transport,
            Arc::clone(&credentials),
            Arc::new(signals.clone()),
        )?;
        let api = WorkbaseApi::new(
            Arc::new(executor),
            Arc::clone(&credentials),
            GovernancePolicy::from_config(&config.governance),
            Arc::new(signals.clone()),
            LocalSettingsFallback::new(database.clone()),
        );

        info!(
            base_url = %config.api.base_url,
            database = %config.storage.database_path,
            token_backend = %config.storage.token_backend,
            authenticated = restored.is_authenticated(),
            "Workbase client ready"
        );

        Ok(Self { api, signals, credentials, database })
    }

    pub const fn api(&self) -> &WorkbaseApi {
        &self.api
    }

    /// Bus carrying session-invalidated and governance signals
    pub const fn signals(&self) -> &SignalBus {
        &self.signals
    }

    pub fn credentials(&self) -> &Arc<CredentialStore> {
        &self.credentials
    }

    /// Local SQLite store backing the settings fallback
    pub fn database(&self) -> &Arc<SqliteKeyValueStore> {
        &self.database
    }
}

impl std::fmt::Debug for WorkbaseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkbaseClient")
            .field("credentials", &self.credentials)
            .field("database", &self.database)
            .finish_non_exhaustive()
    }
}

fn persistent_tier(
    config: &Config,
    database: &Arc<SqliteKeyValueStore>,
) -> Result<Arc<dyn KeyValueStore>> {
    match config.storage.token_backend {
        TokenBackend::Database => Ok(database.clone()),
        #[cfg(feature = "keychain")]
        TokenBackend::Keychain => Ok(Arc::new(crate::storage::KeychainStore::new(
            config.storage.keychain_service.clone(),
        ))),
        #[cfg(not(feature = "keychain"))]
        TokenBackend::Keychain => Err(WorkbaseError::Config(
            "token_backend = \"keychain\" requires the `keychain` feature".into(),
        )),
    }
}
