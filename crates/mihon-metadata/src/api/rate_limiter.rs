//! Fixed-delay rate limiter.
//!
//! Jikan allows 3 requests per second and 60 per minute. A fixed pause after
//! every remote call keeps a sequential run under both limits; there is no
//! adaptive backoff.

use std::time::Duration;
use tokio::time::sleep;

/// Sleeps a fixed delay after every remote call
#[derive(Debug)]
pub struct RateLimiter {
    /// Pause applied after each call
    delay: Duration,
    /// Remote calls seen so far
    calls: u64,
}

impl RateLimiter {
    /// Create a new rate limiter
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            calls: 0,
        }
    }

    /// Configured pause
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Record a finished remote call and wait out the delay.
    ///
    /// Called whether the call succeeded or not.
    pub async fn pause(&mut self) {
        self.calls += 1;

        if !self.delay.is_zero() {
            tracing::debug!(
                wait_ms = self.delay.as_millis() as u64,
                calls = self.calls,
                "Rate limit: pausing after request"
            );
            sleep(self.delay).await;
        }
    }

    /// Number of remote calls recorded
    pub fn calls(&self) -> u64 {
        self.calls
    }
}
