//! Static operation catalogue
//!
//! Every facade method is backed by one [`Operation`]. Whether an operation
//! may degrade to local storage, and the risk it declares to governance, is
//! fixed here and never inferred from the error at hand.

use workbase_domain::{RiskLevel, SettingsClass};

/// Behaviour of an operation when the remote call fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    /// Failures reach the caller unchanged
    None,
    /// Serve the last local record, or the built-in default
    Read(SettingsClass),
    /// Persist the payload locally and report success
    Write(SettingsClass),
    /// Append the payload to a local registry and report success
    Append(SettingsClass),
}

impl Fallback {
    pub const fn settings_class(self) -> Option<SettingsClass> {
        match self {
            Self::None => None,
            Self::Read(class) | Self::Write(class) | Self::Append(class) => Some(class),
        }
    }

    /// Whether the fallback needs the request payload
    pub const fn stores_payload(self) -> bool {
        matches!(self, Self::Write(_) | Self::Append(_))
    }
}

/// Static definition of a facade operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    pub name: &'static str,
    pub fallback: Fallback,
    /// Declared risk of a mutation; `None` skips governance
    pub risk: Option<RiskLevel>,
}

impl Operation {
    const fn read(name: &'static str) -> Self {
        Self { name, fallback: Fallback::None, risk: None }
    }

    const fn mutation(name: &'static str, risk: RiskLevel) -> Self {
        Self { name, fallback: Fallback::None, risk: Some(risk) }
    }

    const fn with_fallback(mut self, fallback: Fallback) -> Self {
        self.fallback = fallback;
        self
    }

    /// Settings-class operations are the only ones allowed to fall back.
    pub const fn is_settings_class(&self) -> bool {
        self.fallback.settings_class().is_some()
    }
}

/// Origin reported to governance for settings changes
pub const SETTINGS_ORIGIN: &str = "settings";

// Session
pub const LOGIN: Operation = Operation::read("login");
pub const LOGOUT: Operation = Operation::read("logout");
pub const HEALTH_CHECK: Operation = Operation::read("health_check");

// Entities
pub const LIST_ENTITIES: Operation = Operation::read("list_entities");
pub const GET_ENTITY: Operation = Operation::read("get_entity");
pub const CREATE_ENTITY: Operation = Operation::mutation("create_entity", RiskLevel::Low);
pub const UPDATE_ENTITY: Operation = Operation::mutation("update_entity", RiskLevel::Low);
pub const DELETE_ENTITY: Operation = Operation::mutation("delete_entity", RiskLevel::High);
pub const UPLOAD_ATTACHMENT: Operation = Operation::mutation("upload_attachment", RiskLevel::Medium);
pub const DOWNLOAD_ATTACHMENT: Operation = Operation::read("download_attachment");
pub const SUBMIT_PAYROLL_RUN: Operation =
    Operation::mutation("submit_payroll_run", RiskLevel::Critical);

// Settings
pub const GET_FEATURE_FLAGS: Operation =
    Operation::read("get_feature_flags").with_fallback(Fallback::Read(SettingsClass::FeatureFlags));
pub const UPDATE_FEATURE_FLAGS: Operation =
    Operation::mutation("update_feature_flags", RiskLevel::Medium)
        .with_fallback(Fallback::Write(SettingsClass::FeatureFlags));
pub const GET_NOTIFICATION_CONFIG: Operation = Operation::read("get_notification_config")
    .with_fallback(Fallback::Read(SettingsClass::NotificationConfig));
pub const UPDATE_NOTIFICATION_CONFIG: Operation =
    Operation::mutation("update_notification_config", RiskLevel::Medium)
        .with_fallback(Fallback::Write(SettingsClass::NotificationConfig));
pub const GET_AI_CONFIG: Operation =
    Operation::read("get_ai_config").with_fallback(Fallback::Read(SettingsClass::AiConfig));
pub const UPDATE_AI_CONFIG: Operation = Operation::mutation("update_ai_config", RiskLevel::Medium)
    .with_fallback(Fallback::Write(SettingsClass::AiConfig));
pub const LIST_API_KEYS: Operation =
    Operation::read("list_api_keys").with_fallback(Fallback::Read(SettingsClass::ApiKeys));
pub const CREATE_API_KEY: Operation = Operation::mutation("create_api_key", RiskLevel::High)
    .with_fallback(Fallback::Append(SettingsClass::ApiKeys));
pub const LIST_WEBHOOKS: Operation =
    Operation::read("list_webhooks").with_fallback(Fallback::Read(SettingsClass::Webhooks));
pub const CREATE_WEBHOOK: Operation = Operation::mutation("create_webhook", RiskLevel::Medium)
    .with_fallback(Fallback::Append(SettingsClass::Webhooks));

/// Every operation the facade exposes
pub const CATALOGUE: &[Operation] = &[
    LOGIN,
    LOGOUT,
    HEALTH_CHECK,
    LIST_ENTITIES,
    GET_ENTITY,
    CREATE_ENTITY,
    UPDATE_ENTITY,
    DELETE_ENTITY,
    UPLOAD_ATTACHMENT,
    DOWNLOAD_ATTACHMENT,
    SUBMIT_PAYROLL_RUN,
    GET_FEATURE_FLAGS,
    UPDATE_FEATURE_FLAGS,
    GET_NOTIFICATION_CONFIG,
    UPDATE_NOTIFICATION_CONFIG,
    GET_AI_CONFIG,
    UPDATE_AI_CONFIG,
    LIST_API_KEYS,
    CREATE_API_KEY,
    LIST_WEBHOOKS,
    CREATE_WEBHOOK,
];
