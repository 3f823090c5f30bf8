//! # Workbase Core
//!
//! Pure business logic for the remote-data access layer - no HTTP, database
//! or platform code.
//!
//! This crate contains:
//! - The credential store and tenant header composition
//! - Response key normalization
//! - Governance policy and the signal bus
//! - The settings fallback and the domain facade
//! - Port interfaces (traits) implemented by `workbase-infra`
//!
//! ## Architecture Principles
//! - Only depends on `workbase-domain`
//! - All external effects go through [`KeyValueStore`], [`RemoteGateway`]
//!   and [`SignalSink`]

pub mod api;
pub mod governance;
pub mod normalize;
pub mod session;
pub mod settings;
pub mod signals;
pub mod storage;

// Infrastructure ports
pub mod gateway_ports;

pub use api::{Fallback, Operation, WorkbaseApi, CATALOGUE};
pub use gateway_ports::RemoteGateway;
pub use governance::GovernancePolicy;
pub use normalize::{camel_case_key, normalize_keys, ResponseNormalizer};
pub use session::{is_sentinel_tenant, CredentialStore};
pub use settings::LocalSettingsFallback;
pub use signals::{SignalBus, SignalSink};
pub use storage::{KeyValueStore, MemoryStore};
