//! Modular common utilities shared across Workbase crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `runtime`: resilience primitives (clock, rate limiter, retry policy)
//!
//! Further tiers land here as more generic utilities are extracted from the
//! call path.

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Runtime tier
// --------------------------------------------------------------------
#[cfg(feature = "runtime")]
pub mod resilience;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "runtime")]
pub use resilience::{
    Clock, ConfigError, ConfigResult, MockClock, RetryPolicy, RetryPolicyBuilder,
    SlidingWindowConfig, SlidingWindowLimiter, SystemClock,
};
