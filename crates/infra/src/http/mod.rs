//! Outbound HTTP: transport adapter and the resilient request executor

pub mod executor;
pub mod transport;

pub use executor::RequestExecutor;
pub use transport::{build_url, ReqwestTransport, Transport, TransportRequest, TransportResponse};
