//! Platform keychain store for the persistent credential tier.
//!
//! Each key becomes one keychain entry under a fixed service name.

use keyring::Entry;
use tracing::debug;
use workbase_core::KeyValueStore;
use workbase_domain::{Result, WorkbaseError};

use crate::errors::InfraError;

/// Keychain-backed key/value store
#[derive(Debug, Clone)]
pub struct KeychainStore {
    service: String,
}

impl KeychainStore {
    pub fn new(service: impl Into<String>) -> Self {
        Self { service: service.into() }
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    fn entry(&self, key: &str) -> Result<Entry> {
        Entry::new(&self.service, key).map_err(|err| WorkbaseError::from(InfraError::from(err)))
    }
}

impl KeyValueStore for KeychainStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match self.entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(err) => Err(InfraError::from(err).into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entry(key)?.set_password(value).map_err(|err| WorkbaseError::from(InfraError::from(err)))?;
        debug!(service = %self.service, key, "keychain entry written");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        match self.entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(err) => Err(InfraError::from(err).into()),
        }
    }
}
