//! Application constants
//!
//! Centralized location for wire header names, storage keys and defaults
//! shared by the call path.

// Header contract
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const DEFAULT_TENANT_HEADER: &str = "X-Tenant-ID";
pub const BEARER_PREFIX: &str = "Bearer ";

/// Tenant id values that mean "no tenant selected".
pub const TENANT_SENTINELS: &[&str] = &["", "null", "undefined"];

// Credential storage keys
pub const TOKEN_STORAGE_KEY: &str = "workbase.auth.token";
pub const TENANT_STORAGE_KEY: &str = "workbase.auth.tenant_id";

// Fallback storage keys, one per settings class
pub const FEATURE_FLAGS_STORAGE_KEY: &str = "workbase.settings.feature_flags";
pub const NOTIFICATION_CONFIG_STORAGE_KEY: &str = "workbase.settings.notifications";
pub const AI_CONFIG_STORAGE_KEY: &str = "workbase.settings.ai_config";
pub const API_KEYS_STORAGE_KEY: &str = "workbase.settings.api_keys";
pub const WEBHOOKS_STORAGE_KEY: &str = "workbase.settings.webhooks";

// Call path defaults
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_BASE_DELAY_MS: u64 = 500;
pub const DEFAULT_PER_ATTEMPT_TIMEOUT_MS: u64 = 15_000;
pub const DEFAULT_RATE_LIMIT_MAX_REQUESTS: usize = 60;
pub const DEFAULT_RATE_LIMIT_WINDOW_MS: u64 = 60_000;

// Signals
pub const SIGNAL_CHANNEL_CAPACITY: usize = 256;
pub const SIGNAL_SESSION_INVALIDATED: &str = "session-invalidated";
pub const SIGNAL_GOVERNANCE_INGESTED: &str = "governance-signal-ingested";
