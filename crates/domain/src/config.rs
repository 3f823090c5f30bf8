//! Configuration structures
//!
//! Every section carries serde defaults so a config file only needs to name
//! what it overrides.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BASE_DELAY_MS, DEFAULT_BASE_URL, DEFAULT_MAX_ATTEMPTS, DEFAULT_PER_ATTEMPT_TIMEOUT_MS,
    DEFAULT_RATE_LIMIT_MAX_REQUESTS, DEFAULT_RATE_LIMIT_WINDOW_MS, DEFAULT_TENANT_HEADER,
};
use crate::impl_domain_enum_conversions;
use crate::types::RiskLevel;
use crate::{Result, WorkbaseError};

/// Top-level application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub retry: RetryConfig,
    pub rate_limit: RateLimitConfig,
    pub storage: StorageConfig,
    pub governance: GovernanceConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Reject configurations the call path cannot operate with.
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(WorkbaseError::Config("api.base_url must not be empty".into()));
        }
        if self.api.tenant_header.trim().is_empty() {
            return Err(WorkbaseError::Config("api.tenant_header must not be empty".into()));
        }
        if self.retry.max_attempts == 0 {
            return Err(WorkbaseError::Config("retry.max_attempts must be at least 1".into()));
        }
        if self.rate_limit.window_ms == 0 {
            return Err(WorkbaseError::Config("rate_limit.window_ms must be positive".into()));
        }
        Ok(())
    }
}

/// Remote service settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Fixed base every request path is appended to
    pub base_url: String,
    /// Header carrying the tenant scope
    pub tenant_header: String,
    pub user_agent: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            tenant_header: DEFAULT_TENANT_HEADER.to_string(),
            user_agent: None,
        }
    }
}

/// Retry and timeout settings for the request executor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub per_attempt_timeout_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay_ms: DEFAULT_BASE_DELAY_MS,
            per_attempt_timeout_ms: DEFAULT_PER_ATTEMPT_TIMEOUT_MS,
        }
    }
}

/// Sliding-window admission settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub max_requests: usize,
    pub window_ms: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self { max_requests: DEFAULT_RATE_LIMIT_MAX_REQUESTS, window_ms: DEFAULT_RATE_LIMIT_WINDOW_MS }
    }
}

/// Where persisted tokens live
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenBackend {
    /// Same SQLite file as the settings fallback
    #[default]
    Database,
    /// Platform keychain (requires the `keychain` feature of the infra crate)
    Keychain,
}

impl_domain_enum_conversions!(TokenBackend {
    Database => "database",
    Keychain => "keychain",
});

/// Local durable storage settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub database_path: String,
    pub token_backend: TokenBackend,
    pub keychain_service: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: "workbase.db".to_string(),
            token_backend: TokenBackend::Database,
            keychain_service: "Workbase.session".to_string(),
        }
    }
}

/// Governance policy settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GovernanceConfig {
    /// Highest risk a mutating action may declare and still proceed
    pub max_mutation_risk: RiskLevel,
    /// Origin domains whose mutations are always vetoed
    pub restricted_origins: Vec<String>,
}

impl Default for GovernanceConfig {
    fn default() -> Self {
        Self { max_mutation_risk: RiskLevel::High, restricted_origins: Vec::new() }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), json: false }
    }
}
