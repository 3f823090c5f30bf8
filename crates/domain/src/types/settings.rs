//! Settings classes eligible for local fallback

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
#[cfg(feature = "ts-gen")]
use ts_rs::TS;

use crate::constants::{
    AI_CONFIG_STORAGE_KEY, API_KEYS_STORAGE_KEY, FEATURE_FLAGS_STORAGE_KEY,
    NOTIFICATION_CONFIG_STORAGE_KEY, WEBHOOKS_STORAGE_KEY,
};
use crate::impl_domain_enum_conversions;

/// The fixed set of administrative settings that degrade to local storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub enum SettingsClass {
    FeatureFlags,
    NotificationConfig,
    AiConfig,
    ApiKeys,
    Webhooks,
}

impl_domain_enum_conversions!(SettingsClass {
    FeatureFlags => "feature_flags",
    NotificationConfig => "notification_config",
    AiConfig => "ai_config",
    ApiKeys => "api_keys",
    Webhooks => "webhooks",
});

impl SettingsClass {
    pub const ALL: [Self; 5] =
        [Self::FeatureFlags, Self::NotificationConfig, Self::AiConfig, Self::ApiKeys, Self::Webhooks];

    /// Durable storage key holding this class's fallback record
    pub const fn storage_key(self) -> &'static str {
        match self {
            Self::FeatureFlags => FEATURE_FLAGS_STORAGE_KEY,
            Self::NotificationConfig => NOTIFICATION_CONFIG_STORAGE_KEY,
            Self::AiConfig => AI_CONFIG_STORAGE_KEY,
            Self::ApiKeys => API_KEYS_STORAGE_KEY,
            Self::Webhooks => WEBHOOKS_STORAGE_KEY,
        }
    }

    /// Registry classes hold a list of issued records rather than one blob.
    pub const fn is_registry(self) -> bool {
        matches!(self, Self::ApiKeys | Self::Webhooks)
    }

    /// Built-in value returned when neither the remote nor local storage has one
    pub fn default_value(self) -> Value {
        match self {
            Self::FeatureFlags => json!({}),
            Self::NotificationConfig => {
                json!({"emailEnabled": true, "pushEnabled": false, "digest": "daily"})
            }
            Self::AiConfig => json!({"provider": "none", "enabled": false}),
            Self::ApiKeys | Self::Webhooks => json!([]),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_storage_keys_are_unique() {
        let keys: HashSet<&str> = SettingsClass::ALL.iter().map(|c| c.storage_key()).collect();
        assert_eq!(keys.len(), SettingsClass::ALL.len());
    }

    #[test]
    fn test_registry_defaults_are_arrays() {
        for class in SettingsClass::ALL {
            assert_eq!(class.is_registry(), class.default_value().is_array());
        }
    }
}
