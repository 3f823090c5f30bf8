//! # Workbase Domain
//!
//! Data types shared by every layer of the Workbase remote-data access layer.
//!
//! This crate contains:
//! - Error types and Result definitions
//! - Configuration structures
//! - Request, response, session, governance, settings and signal types
//! - Wire and storage constants
//!
//! ## Architecture
//! - No dependencies on other Workbase crates
//! - Only external dependencies allowed
//! - Pure data structures, no I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
