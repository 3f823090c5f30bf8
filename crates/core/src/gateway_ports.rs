//! Remote gateway port
//!
//! The single boundary through which every domain operation reaches the
//! remote service. The production adapter is the request executor in
//! `workbase-infra`; tests substitute scripted gateways.
//!
//! # Example
//!
//! ```no_run
//! use workbase_core::RemoteGateway;
//! use workbase_domain::RequestDescriptor;
//!
//! async fn ping(gateway: &impl RemoteGateway) -> bool {
//!     gateway.execute(RequestDescriptor::get("/health").build()).await.is_ok()
//! }
//! ```

use async_trait::async_trait;
use workbase_domain::{ApiError, RequestDescriptor, ResponsePayload};

/// Executes one logical remote call.
///
/// Implementations own admission, retries, session teardown on `401` and
/// response normalization; callers only see the final outcome.
#[async_trait]
pub trait RemoteGateway: Send + Sync {
    async fn execute(&self, request: RequestDescriptor) -> Result<ResponsePayload, ApiError>;
}
