//! Session and credential types

use serde::{Deserialize, Serialize};
#[cfg(feature = "ts-gen")]
use ts_rs::TS;

use crate::impl_domain_enum_conversions;

/// Storage durability tier for the active token
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub enum Durability {
    /// Lives for the current process only
    #[default]
    Ephemeral,
    /// Survives process restart
    Persistent,
}

impl_domain_enum_conversions!(Durability {
    Ephemeral => "ephemeral",
    Persistent => "persistent",
});

/// Snapshot of the authenticated session
///
/// Owned by the credential store; everything else only ever sees clones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct Session {
    pub token: Option<String>,
    pub tenant_id: Option<String>,
    pub durability: Durability,
}

impl Session {
    /// Whether a bearer token is currently attached
    pub const fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

/// Login form payload passed through to `/auth/login`
#[derive(Clone, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

impl LoginCredentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self { email: email.into(), password: password.into() }
    }
}

impl std::fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_session_is_anonymous() {
        let session = Session::default();
        assert!(!session.is_authenticated());
        assert_eq!(session.durability, Durability::Ephemeral);
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let creds = LoginCredentials::new("ops@example.com", "hunter2");
        let debug = format!("{creds:?}");
        assert!(debug.contains("ops@example.com"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_durability_round_trip() {
        assert_eq!("persistent".parse::<Durability>().unwrap(), Durability::Persistent);
        assert_eq!(Durability::Ephemeral.to_string(), "ephemeral");
    }
}
