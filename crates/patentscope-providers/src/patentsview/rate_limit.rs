//! Request pacing for the search API
//!
//! The API enforces a global request rate; the client respects it with a
//! fixed pause before every request. Modeled as a named component owned by
//! the fetcher so the policy stays visible and testable rather than an
//! inline sleep.

use std::time::Duration;
use tokio::time::sleep;

/// Fixed-delay rate limiter
///
/// Stateless: the pause is unconditional, matching the API's "one request per
/// delay window" guidance. Tests run under tokio's paused clock so the pause
/// costs no wall-clock time.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    delay: Duration,
}

impl RateLimiter {
    /// Create a limiter with the given inter-request delay
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Create a limiter from a delay in milliseconds
    pub fn from_millis(delay_ms: u64) -> Self {
        Self::new(Duration::from_millis(delay_ms))
    }

    /// The configured inter-request delay
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Pause before the next request
    pub async fn pause(&self) {
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
    }
}
