//! Domain facade: one method per domain operation

pub mod operations;
pub mod service;

pub use operations::{Fallback, Operation, CATALOGUE};
pub use service::WorkbaseApi;
