//! Local settings fallback
//!
//! Holds one record per [`SettingsClass`] under that class's fixed storage
//! key, serialized as JSON text. A record is written only when a remote
//! settings write fails and read only when a remote settings read fails.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;
use workbase_domain::{Result, SettingsClass, WorkbaseError};

use crate::storage::KeyValueStore;

/// Durable stand-in for the remote settings endpoints
#[derive(Clone)]
pub struct LocalSettingsFallback {
    store: Arc<dyn KeyValueStore>,
}

impl LocalSettingsFallback {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Last locally stored record for `class`, if any.
    pub fn load(&self, class: SettingsClass) -> Result<Option<Value>> {
        let Some(raw) = self.store.get(class.storage_key())? else {
            return Ok(None);
        };
        serde_json::from_str(&raw).map(Some).map_err(|err| {
            WorkbaseError::Storage(format!("corrupt fallback record for {class}: {err}"))
        })
    }

    /// Stored record, or the class's built-in default.
    ///
    /// Unreadable records are logged and replaced by the default.
    pub fn load_or_default(&self, class: SettingsClass) -> Value {
        match self.load(class) {
            Ok(Some(value)) => value,
            Ok(None) => {
                debug!(class = %class, "No local settings record, using default");
                class.default_value()
            }
            Err(err) => {
                warn!(class = %class, error = %err, "Local settings record unreadable, using default");
                class.default_value()
            }
        }
    }

    /// Overwrite the record for `class`.
    pub fn store(&self, class: SettingsClass, value: &Value) -> Result<()> {
        let raw = serde_json::to_string(value)
            .map_err(|err| WorkbaseError::Internal(format!("serialize {class}: {err}")))?;
        self.store.set(class.storage_key(), &raw)?;
        debug!(class = %class, "Local settings record written");
        Ok(())
    }

    /// Add `record` to a registry class and return it as stored.
    ///
    /// Records without an `id` get a locally generated one so later lists
    /// can address them.
    pub fn append(&self, class: SettingsClass, mut record: Value) -> Result<Value> {
        if !class.is_registry() {
            return Err(WorkbaseError::InvalidInput(format!("{class} is not a registry")));
        }

        if let Value::Object(fields) = &mut record {
            fields.entry("id").or_insert_with(|| Value::String(format!("local-{}", Uuid::new_v4())));
        }

        let mut entries = match self.load_or_default(class) {
            Value::Array(entries) => entries,
            other => {
                warn!(class = %class, found = %other, "Registry record was not a list, resetting");
                Vec::new()
            }
        };
        entries.push(record.clone());
        self.store(class, &Value::Array(entries))?;
        Ok(record)
    }
}

impl std::fmt::Debug for LocalSettingsFallback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalSettingsFallback").finish_non_exhaustive()
    }
}
