//! Resilience primitives for the remote call path
//!
//! This module provides **generic, reusable** building blocks:
//! - **Clock**: monotonic time source with a mock for deterministic tests
//! - **Sliding-window limiter**: caps admissions per rolling window
//! - **Retry policy**: bounded attempts with exponential backoff
//!
//! None of these sleep or perform I/O. The request executor in
//! `workbase-infra` composes them into the actual retry loop.

pub mod clock;
pub mod error;
pub mod rate_limiter;
pub mod retry;

pub use clock::{Clock, MockClock, SystemClock};
pub use error::{ConfigError, ConfigResult};
pub use rate_limiter::{SlidingWindowConfig, SlidingWindowLimiter};
pub use retry::{RetryPolicy, RetryPolicyBuilder};
