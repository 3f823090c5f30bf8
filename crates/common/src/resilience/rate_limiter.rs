//! Sliding-window admission limiter
//!
//! Caps outbound call volume to `max_requests` per rolling `window`. The
//! limiter is a synchronous yes/no oracle: it never sleeps, and a rejected
//! caller receives a wait hint from [`SlidingWindowLimiter::remaining_wait`]
//! instead.
//!
//! Admission is a single critical section (prune, count, append) so
//! concurrent callers can never overshoot the cap.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{debug, trace};

use super::clock::{Clock, SystemClock};
use super::error::{ConfigError, ConfigResult};

/// Configuration for the sliding-window limiter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlidingWindowConfig {
    /// Maximum admissions per window; zero rejects everything
    pub max_requests: usize,
    /// Length of the rolling window
    pub window: Duration,
}

impl Default for SlidingWindowConfig {
    fn default() -> Self {
        Self { max_requests: 60, window: Duration::from_secs(60) }
    }
}

impl SlidingWindowConfig {
    /// Validate the configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if self.window.is_zero() {
            return Err(ConfigError::Invalid { message: "window must be greater than zero".into() });
        }
        Ok(())
    }
}

#[derive(Debug)]
struct WindowState {
    max_requests: usize,
    /// Admission timestamps, oldest first
    timestamps: VecDeque<Instant>,
}

impl WindowState {
    fn prune(&mut self, now: Instant, window: Duration) {
        while let Some(&oldest) = self.timestamps.front() {
            if now.saturating_duration_since(oldest) > window {
                self.timestamps.pop_front();
            } else {
                break;
            }
        }
    }
}

/// Rolling-window rate limiter
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
///
/// use workbase_common::resilience::SlidingWindowLimiter;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let limiter = SlidingWindowLimiter::new(2, Duration::from_secs(1))?;
///
/// assert!(limiter.try_admit());
/// assert!(limiter.try_admit());
/// assert!(!limiter.try_admit());
/// assert!(limiter.remaining_wait() > Duration::ZERO);
/// # Ok(())
/// # }
/// ```
pub struct SlidingWindowLimiter<C: Clock = SystemClock> {
    window: Duration,
    state: Arc<Mutex<WindowState>>,
    clock: Arc<C>,
}

impl<C: Clock> SlidingWindowLimiter<C> {
    /// Create a new limiter with a custom clock
    pub fn with_clock(max_requests: usize, window: Duration, clock: C) -> ConfigResult<Self> {
        let config = SlidingWindowConfig { max_requests, window };
        config.validate()?;

        Ok(Self {
            window,
            state: Arc::new(Mutex::new(WindowState {
                max_requests,
                timestamps: VecDeque::with_capacity(max_requests.min(1024)),
            })),
            clock: Arc::new(clock),
        })
    }

    /// Try to admit one call.
    ///
    /// Prunes timestamps that fell out of the window, then admits and records
    /// `now` if the window has room. A rejection leaves the window untouched.
    pub fn try_admit(&self) -> bool {
        let now = self.clock.now();
        let mut state = self.state.lock();

        if state.max_requests == 0 {
            debug!("Rate limit: capacity is zero, rejecting");
            return false;
        }

        state.prune(now, self.window);

        if state.timestamps.len() < state.max_requests {
            state.timestamps.push_back(now);
            trace!(in_window = state.timestamps.len(), max = state.max_requests, "Admitted call");
            true
        } else {
            debug!(in_window = state.timestamps.len(), max = state.max_requests, "Rate limit: window full");
            false
        }
    }

    /// Time until the oldest recorded admission leaves the window.
    ///
    /// Zero while the window has room. Uses the oldest entry as recorded,
    /// without pruning first, so an expired entry yields zero. With a capacity
    /// of zero nothing can ever be admitted and the full window is returned.
    pub fn remaining_wait(&self) -> Duration {
        let now = self.clock.now();
        let state = self.state.lock();

        if state.timestamps.len() < state.max_requests {
            return Duration::ZERO;
        }

        match state.timestamps.front() {
            Some(&oldest) => (oldest + self.window).saturating_duration_since(now),
            None => self.window,
        }
    }

    /// [`Self::remaining_wait`] in whole milliseconds, rounded up so a
    /// non-zero wait never reports as zero.
    pub fn remaining_wait_ms(&self) -> u64 {
        let wait = self.remaining_wait();
        let micros = wait.as_micros();
        let millis = micros.div_ceil(1000);
        u64::try_from(millis).unwrap_or(u64::MAX)
    }

    /// Change capacity without clearing history.
    pub fn set_max_requests(&self, max_requests: usize) {
        let mut state = self.state.lock();
        debug!(from = state.max_requests, to = max_requests, "Rate limit capacity changed");
        state.max_requests = max_requests;
    }

    /// Current capacity
    pub fn max_requests(&self) -> usize {
        self.state.lock().max_requests
    }

    /// Window length
    pub const fn window(&self) -> Duration {
        self.window
    }

    /// Number of admissions currently recorded (unpruned)
    pub fn recorded(&self) -> usize {
        self.state.lock().timestamps.len()
    }

    /// Forget all recorded admissions
    pub fn reset(&self) {
        self.state.lock().timestamps.clear();
    }
}

impl SlidingWindowLimiter<SystemClock> {
    /// Create a new limiter with the system clock
    pub fn new(max_requests: usize, window: Duration) -> ConfigResult<Self> {
        Self::with_clock(max_requests, window, SystemClock)
    }

    /// Create a limiter from a validated configuration
    pub fn from_config(config: &SlidingWindowConfig) -> ConfigResult<Self> {
        Self::new(config.max_requests, config.window)
    }
}

impl<C: Clock> Clone for SlidingWindowLimiter<C> {
    fn clone(&self) -> Self {
        Self {
            window: self.window,
            state: Arc::clone(&self.state),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<C: Clock> std::fmt::Debug for SlidingWindowLimiter<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlidingWindowLimiter")
            .field("window", &self.window)
            .field("max_requests", &self.max_requests())
            .field("recorded", &self.recorded())
            .finish()
    }
}
