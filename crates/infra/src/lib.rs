//! # Workbase Infrastructure
//!
//! Infrastructure implementations of the core ports.
//!
//! This crate contains:
//! - The resilient HTTP request executor and its reqwest transport
//! - SQLite (and optional keychain) key/value storage
//! - Configuration loading and tracing setup
//! - [`WorkbaseClient`], which wires everything together
//!
//! ## Architecture
//! - Implements traits defined in `workbase-core`
//! - Depends on `workbase-common`, `workbase-domain` and `workbase-core`
//! - Contains all "impure" code (network, disk, platform keychain)

pub mod client;
pub mod config;
pub mod errors;
pub mod http;
pub mod observability;
pub mod storage;

// Re-export commonly used items
pub use client::WorkbaseClient;
pub use errors::InfraError;
pub use http::{ReqwestTransport, RequestExecutor, Transport, TransportRequest, TransportResponse};
pub use observability::init_tracing;
pub use storage::SqliteKeyValueStore;
#[cfg(feature = "keychain")]
pub use storage::KeychainStore;
