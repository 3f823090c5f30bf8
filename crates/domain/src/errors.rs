//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Workbase infrastructure and local faults
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum WorkbaseError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Security error: {0}")]
    Security(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for Workbase operations
pub type Result<T> = std::result::Result<T, WorkbaseError>;

/// Categories of call-path errors for retry logic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorCategory {
    /// Local admission refused the call; the caller backs off
    RateLimit,
    /// An attempt outlived its per-attempt timeout - retryable
    Timeout,
    /// Transport failure - retryable
    Network,
    /// The remote rejected the session - terminal
    Authentication,
    /// Non-2xx status other than 401 - retryable until attempts run out
    Remote,
    /// Vetoed before leaving the process - terminal
    Governance,
    /// Local configuration or storage fault - terminal
    Local,
}

/// Errors surfaced by the remote call path
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("Rate limit exceeded, retry in {wait_ms}ms")]
    RateLimitExceeded { wait_ms: u64 },

    #[error("Request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Remote error (status {status}): {body}")]
    Remote { status: u16, body: String },

    #[error("Action blocked by governance policy: {reason}. Remediation: {remediation}")]
    GovernanceBlocked { reason: String, remediation: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl ApiError {
    /// Get the error category for this error
    pub const fn category(&self) -> ApiErrorCategory {
        match self {
            Self::RateLimitExceeded { .. } => ApiErrorCategory::RateLimit,
            Self::Timeout { .. } => ApiErrorCategory::Timeout,
            Self::Network(_) => ApiErrorCategory::Network,
            Self::Unauthorized(_) => ApiErrorCategory::Authentication,
            Self::Remote { .. } => ApiErrorCategory::Remote,
            Self::GovernanceBlocked { .. } => ApiErrorCategory::Governance,
            Self::Config(_) | Self::Storage(_) => ApiErrorCategory::Local,
        }
    }

    /// Whether the executor may issue another attempt after this error
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self.category(),
            ApiErrorCategory::Timeout | ApiErrorCategory::Network | ApiErrorCategory::Remote
        )
    }

    /// Whether this error invalidates the active session
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }

    /// HTTP status carried by a remote error, if any
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<WorkbaseError> for ApiError {
    fn from(err: WorkbaseError) -> Self {
        match err {
            WorkbaseError::Network(message) => Self::Network(message),
            WorkbaseError::Auth(message) => Self::Unauthorized(message),
            WorkbaseError::Config(message) | WorkbaseError::InvalidInput(message) => {
                Self::Config(message)
            }
            WorkbaseError::Database(message)
            | WorkbaseError::Security(message)
            | WorkbaseError::Storage(message)
            | WorkbaseError::NotFound(message)
            | WorkbaseError::Internal(message) => Self::Storage(message),
        }
    }
}
