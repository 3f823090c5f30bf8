//! Conversions from external infrastructure errors into domain errors.

#[cfg(feature = "keychain")]
use keyring::Error as KeyringError;
use r2d2::Error as PoolError;
use reqwest::Error as HttpError;
use rusqlite::Error as SqlError;
use workbase_domain::{ApiError, WorkbaseError};

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub WorkbaseError);

impl From<InfraError> for WorkbaseError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<WorkbaseError> for InfraError {
    fn from(value: WorkbaseError) -> Self {
        Self(value)
    }
}

impl From<InfraError> for ApiError {
    fn from(value: InfraError) -> Self {
        Self::from(value.0)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoWorkbaseError {
    fn into_workbase(self) -> WorkbaseError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → WorkbaseError */
/* -------------------------------------------------------------------------- */

impl IntoWorkbaseError for SqlError {
    fn into_workbase(self) -> WorkbaseError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match err.code {
                    ErrorCode::DatabaseBusy => WorkbaseError::Database("database is busy".into()),
                    ErrorCode::DatabaseLocked => {
                        WorkbaseError::Database("database is locked".into())
                    }
                    ErrorCode::ReadOnly => {
                        WorkbaseError::Storage("database file is read-only".into())
                    }
                    ErrorCode::CannotOpen => {
                        WorkbaseError::Storage(format!("unable to open database file: {message}"))
                    }
                    ErrorCode::DiskFull => WorkbaseError::Storage("disk is full".into()),
                    _ => WorkbaseError::Database(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => WorkbaseError::NotFound("no rows returned by query".into()),
            RE::FromSqlConversionFailure(_, _, cause) => {
                WorkbaseError::Database(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, _, ty) => {
                WorkbaseError::Database(format!("invalid column type: {ty}"))
            }
            RE::Utf8Error(_) => {
                WorkbaseError::Database("invalid UTF-8 returned from sqlite".into())
            }
            RE::InvalidPath(path) => WorkbaseError::Storage(format!(
                "invalid database path: {}",
                path.to_string_lossy()
            )),
            other => WorkbaseError::Database(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        Self(value.into_workbase())
    }
}

/* -------------------------------------------------------------------------- */
/* r2d2::Error → WorkbaseError */
/* -------------------------------------------------------------------------- */

impl From<PoolError> for InfraError {
    fn from(value: PoolError) -> Self {
        Self(WorkbaseError::Database(format!("connection pool error: {value}")))
    }
}

/* -------------------------------------------------------------------------- */
/* keyring::Error → WorkbaseError */
/* -------------------------------------------------------------------------- */

#[cfg(feature = "keychain")]
impl IntoWorkbaseError for KeyringError {
    fn into_workbase(self) -> WorkbaseError {
        use KeyringError::*;

        let description = self.to_string();

        match self {
            NoEntry => WorkbaseError::NotFound("keychain entry not found".into()),
            BadEncoding(_) => {
                WorkbaseError::Security("credential in keychain is not valid UTF-8".into())
            }
            TooLong(name, limit) => WorkbaseError::Security(format!(
                "keychain attribute '{name}' exceeds platform limit ({limit})"
            )),
            Invalid(attr, reason) => {
                WorkbaseError::Security(format!("keychain attribute '{attr}' is invalid: {reason}"))
            }
            PlatformFailure(err) => {
                WorkbaseError::Security(format!("keychain platform error: {err}"))
            }
            NoStorageAccess(err) => {
                WorkbaseError::Security(format!("unable to access secure storage: {err}"))
            }
            _ => WorkbaseError::Security(description),
        }
    }
}

#[cfg(feature = "keychain")]
impl From<KeyringError> for InfraError {
    fn from(value: KeyringError) -> Self {
        Self(value.into_workbase())
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → ApiError */
/* -------------------------------------------------------------------------- */

/// Transport failures on the call path.
///
/// Everything here is a `Network` error so the executor retries it; status
/// codes are classified by the executor itself, never by reqwest.
pub fn transport_error(err: &HttpError) -> ApiError {
    if err.is_timeout() {
        return ApiError::Network("HTTP request timed out".into());
    }

    if err.is_connect() {
        return ApiError::Network(format!("HTTP connection failure: {err}"));
    }

    if err.is_body() || err.is_decode() {
        return ApiError::Network(format!("failed to read response body: {err}"));
    }

    ApiError::Network(err.to_string())
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        Self(WorkbaseError::Network(value.to_string()))
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
