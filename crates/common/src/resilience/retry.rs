//! Bounded retry policy with exponential backoff
//!
//! The policy only answers "how many attempts" and "how long to wait";
//! the retry loop itself lives with the caller so it can classify errors in
//! its own terms.
//!
//! Delay invariant: attempt `n` (1-based retry number) waits
//! `base_delay * 2^(n-1)`; attempt 0 never waits.

use std::time::Duration;

use super::error::{ConfigError, ConfigResult};

/// Doublings beyond this saturate rather than overflow.
const MAX_BACKOFF_SHIFT: u32 = 20;

/// Retry policy for one logical call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
    per_attempt_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            per_attempt_timeout: Duration::from_secs(15),
        }
    }
}

impl RetryPolicy {
    /// Create a policy; `max_attempts` is clamped to at least one.
    pub fn new(max_attempts: u32, base_delay: Duration, per_attempt_timeout: Duration) -> Self {
        Self { max_attempts: max_attempts.max(1), base_delay, per_attempt_timeout }
    }

    /// Start building a policy from the defaults
    pub fn builder() -> RetryPolicyBuilder {
        RetryPolicyBuilder::default()
    }

    /// Total attempts, initial try included
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub const fn base_delay(&self) -> Duration {
        self.base_delay
    }

    pub const fn per_attempt_timeout(&self) -> Duration {
        self.per_attempt_timeout
    }

    /// Delay preceding attempt `attempt` (0-based).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        let shift = (attempt - 1).min(MAX_BACKOFF_SHIFT);
        self.base_delay.saturating_mul(1u32 << shift)
    }

    /// Delay to sleep after failed attempt `attempt` (0-based), i.e.
    /// `base_delay * 2^attempt`.
    pub fn backoff_after(&self, attempt: u32) -> Duration {
        self.delay_for_attempt(attempt.saturating_add(1))
    }

    /// Whether attempt `attempt` (0-based) is the last one allowed
    pub const fn is_final_attempt(&self, attempt: u32) -> bool {
        attempt + 1 >= self.max_attempts
    }

    /// Every inter-attempt delay, in order
    pub fn backoff_schedule(&self) -> Vec<Duration> {
        (0..self.max_attempts.saturating_sub(1)).map(|attempt| self.backoff_after(attempt)).collect()
    }
}

/// Builder for [`RetryPolicy`]
#[derive(Debug, Default)]
pub struct RetryPolicyBuilder {
    policy: RetryPolicy,
}

impl RetryPolicyBuilder {
    /// Configure the total number of attempts (initial try + retries).
    pub const fn max_attempts(mut self, attempts: u32) -> Self {
        self.policy.max_attempts = attempts;
        self
    }

    pub const fn base_delay(mut self, delay: Duration) -> Self {
        self.policy.base_delay = delay;
        self
    }

    pub const fn per_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.policy.per_attempt_timeout = timeout;
        self
    }

    pub fn build(self) -> ConfigResult<RetryPolicy> {
        if self.policy.max_attempts == 0 {
            return Err(ConfigError::Invalid { message: "max_attempts must be at least 1".into() });
        }
        if self.policy.per_attempt_timeout.is_zero() {
            return Err(ConfigError::Invalid {
                message: "per_attempt_timeout must be greater than zero".into(),
            });
        }
        Ok(self.policy)
    }
}
