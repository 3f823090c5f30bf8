//! Session ownership and header composition

pub mod store;

pub use store::{is_sentinel_tenant, CredentialStore};
