//! Key/value storage adapters

#[cfg(feature = "keychain")]
pub mod keychain_store;
pub mod sqlite_store;

#[cfg(feature = "keychain")]
pub use keychain_store::KeychainStore;
pub use sqlite_store::SqliteKeyValueStore;
