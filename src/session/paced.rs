//! Pacing policy for the outbound send loop.
//!
//! The service has no acknowledgment-based flow control, so a fixed delay
//! after each chunk send is the pipeline's only backpressure mechanism.
//! The pause is a cooperative yield point, not a blocking sleep, and the
//! delay is injectable so tests run without it.

use crate::defaults::PACING_DELAY_MS;
use std::time::Duration;
use tokio::time::sleep;

/// Fixed inter-chunk delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacer {
    delay: Duration,
}

impl Pacer {
    /// Creates a pacer with a custom delay.
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Pacer that never waits, for tests.
    pub fn none() -> Self {
        Self::new(Duration::ZERO)
    }

    /// The configured delay.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Yields for one pacing interval.
    pub async fn pause(&self) {
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
    }
}

impl Default for Pacer {
    fn default() -> Self {
        Self::new(Duration::from_millis(PACING_DELAY_MS))
    }
}
