//! Credential store
//!
//! Sole owner of the active [`Session`]. The token lives in exactly one of two
//! tiers: the ephemeral tier (process lifetime) or the persistent tier
//! (survives restart). Writing a token to one tier removes it from the other,
//! so at most one token is ever active.
//!
//! Reads never touch storage: the store keeps the current session in memory
//! and every mutation writes through to the backing tier first. A logout is
//! therefore visible to every caller the moment it returns.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info, warn};
use workbase_domain::constants::{
    BEARER_PREFIX, CONTENT_TYPE_JSON, DEFAULT_TENANT_HEADER, HEADER_AUTHORIZATION,
    HEADER_CONTENT_TYPE, TENANT_SENTINELS, TENANT_STORAGE_KEY, TOKEN_STORAGE_KEY,
};
use workbase_domain::{Durability, RequestBody, Result, Session};

use crate::storage::KeyValueStore;

/// Whether a tenant id means "no tenant selected".
///
/// Empty strings and the literal strings `null` / `undefined` leak in from
/// loosely typed callers and must never be sent as a tenant scope.
pub fn is_sentinel_tenant(tenant_id: &str) -> bool {
    let trimmed = tenant_id.trim();
    TENANT_SENTINELS.iter().any(|sentinel| trimmed.eq_ignore_ascii_case(sentinel))
}

/// Owner of the active token and tenant scope
pub struct CredentialStore {
    ephemeral: Arc<dyn KeyValueStore>,
    persistent: Arc<dyn KeyValueStore>,
    tenant_header: String,
    session: RwLock<Session>,
}

impl CredentialStore {
    /// Create a store over the two tiers with the default tenant header name.
    ///
    /// The store starts anonymous; call [`Self::restore`] to pick up a
    /// persisted session.
    pub fn new(ephemeral: Arc<dyn KeyValueStore>, persistent: Arc<dyn KeyValueStore>) -> Self {
        Self::with_tenant_header(ephemeral, persistent, DEFAULT_TENANT_HEADER)
    }

    pub fn with_tenant_header(
        ephemeral: Arc<dyn KeyValueStore>,
        persistent: Arc<dyn KeyValueStore>,
        tenant_header: impl Into<String>,
    ) -> Self {
        Self {
            ephemeral,
            persistent,
            tenant_header: tenant_header.into(),
            session: RwLock::new(Session::default()),
        }
    }

    /// Reload the session from storage.
    ///
    /// The persistent tier wins when both tiers hold a token. Returns the
    /// restored snapshot.
    pub fn restore(&self) -> Result<Session> {
        let (token, durability) = match self.persistent.get(TOKEN_STORAGE_KEY)? {
            Some(token) => (Some(token), Durability::Persistent),
            None => (self.ephemeral.get(TOKEN_STORAGE_KEY)?, Durability::Ephemeral),
        };
        let tenant_id = self
            .tier(durability)
            .get(TENANT_STORAGE_KEY)?
            .filter(|tenant| !is_sentinel_tenant(tenant));

        let restored = Session { token, tenant_id, durability };
        info!(
            authenticated = restored.is_authenticated(),
            durability = %restored.durability,
            "Session restored"
        );
        *self.session.write() = restored.clone();
        Ok(restored)
    }

    /// Snapshot of the current session
    pub fn session(&self) -> Session {
        self.session.read().clone()
    }

    pub fn get_token(&self) -> Option<String> {
        self.session.read().token.clone()
    }

    /// Make `token` the only active token, stored at `durability`.
    ///
    /// The tenant scope follows the token into its tier.
    pub fn set_token(&self, token: &str, durability: Durability) -> Result<()> {
        let mut session = self.session.write();
        let target = self.tier(durability);
        let other = self.tier(other_durability(durability));

        target.set(TOKEN_STORAGE_KEY, token)?;
        other.remove(TOKEN_STORAGE_KEY)?;
        other.remove(TENANT_STORAGE_KEY)?;
        if let Some(tenant_id) = session.tenant_id.as_deref() {
            target.set(TENANT_STORAGE_KEY, tenant_id)?;
        }

        session.token = Some(token.to_owned());
        session.durability = durability;
        debug!(durability = %durability, "Token stored");
        Ok(())
    }

    /// Drop the token from both tiers. The tenant scope is kept.
    pub fn clear_token(&self) -> Result<()> {
        let mut session = self.session.write();
        self.ephemeral.remove(TOKEN_STORAGE_KEY)?;
        self.persistent.remove(TOKEN_STORAGE_KEY)?;
        session.token = None;
        debug!("Token cleared");
        Ok(())
    }

    pub fn get_tenant_id(&self) -> Option<String> {
        self.session.read().tenant_id.clone()
    }

    /// Set or unset the tenant scope.
    ///
    /// Sentinel values are treated as `None`.
    pub fn set_tenant_id(&self, tenant_id: Option<&str>) -> Result<()> {
        let tenant_id = tenant_id.filter(|tenant| !is_sentinel_tenant(tenant));
        let mut session = self.session.write();
        let tier = self.tier(session.durability);

        match tenant_id {
            Some(tenant) => tier.set(TENANT_STORAGE_KEY, tenant)?,
            None => tier.remove(TENANT_STORAGE_KEY)?,
        }

        session.tenant_id = tenant_id.map(str::to_owned);
        debug!(tenant_id = ?session.tenant_id, "Tenant scope changed");
        Ok(())
    }

    /// Tear down the whole session and return what was active.
    ///
    /// Storage failures are logged and do not stop the teardown: the in-memory
    /// session is always reset, so no later call can pick up the old token.
    pub fn logout(&self) -> Session {
        let mut session = self.session.write();
        for tier in [&self.ephemeral, &self.persistent] {
            for key in [TOKEN_STORAGE_KEY, TENANT_STORAGE_KEY] {
                if let Err(err) = tier.remove(key) {
                    warn!(key, error = %err, "Failed to remove credential during logout");
                }
            }
        }
        let previous = std::mem::take(&mut *session);
        info!(tenant_id = ?previous.tenant_id, "Session cleared");
        previous
    }

    /// Name of the tenant-scope header
    pub fn tenant_header(&self) -> &str {
        &self.tenant_header
    }

    /// Headers attached to every outbound call.
    ///
    /// Content type is omitted for binary bodies so the transport can set its
    /// own boundary. Authorization is present only with a token; the tenant
    /// header only with a non-sentinel tenant id.
    pub fn compose_headers(&self, body: &RequestBody) -> Vec<(String, String)> {
        let session = self.session.read();
        let mut headers = Vec::with_capacity(3);

        if !body.is_binary() {
            headers.push((HEADER_CONTENT_TYPE.to_owned(), CONTENT_TYPE_JSON.to_owned()));
        }
        if let Some(token) = session.token.as_deref() {
            headers.push((HEADER_AUTHORIZATION.to_owned(), format!("{BEARER_PREFIX}{token}")));
        }
        if let Some(tenant_id) = session.tenant_id.as_deref() {
            if !is_sentinel_tenant(tenant_id) {
                headers.push((self.tenant_header.clone(), tenant_id.to_owned()));
            }
        }
        headers
    }

    fn tier(&self, durability: Durability) -> &Arc<dyn KeyValueStore> {
        match durability {
            Durability::Ephemeral => &self.ephemeral,
            Durability::Persistent => &self.persistent,
        }
    }
}

const fn other_durability(durability: Durability) -> Durability {
    match durability {
        Durability::Ephemeral => Durability::Persistent,
        Durability::Persistent => Durability::Ephemeral,
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let session = self.session.read();
        f.debug_struct("CredentialStore")
            .field("authenticated", &session.is_authenticated())
            .field("tenant_id", &session.tenant_id)
            .field("durability", &session.durability)
            .finish_non_exhaustive()
    }
}
