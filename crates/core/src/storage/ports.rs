//! Key/value storage port
//!
//! Both credential tiers and the settings fallback persist plain strings under
//! fixed keys. Adapters decide where the bytes live: process memory, a SQLite
//! file or the platform keychain.

use workbase_domain::Result;

/// Synchronous string key/value store.
///
/// Values are small (tokens, tenant ids, settings blobs) so adapters are
/// expected to answer without yielding.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Insert or overwrite the value stored under `key`.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}
