//! Request throttling shared by the network collaborators.
//!
//! Every outbound request awaits [`Throttle::wait`] first. [`FixedDelay`] spaces
//! consecutive requests by a constant interval; other strategies (adaptive
//! backoff, token buckets) can be dropped in without touching the callers.

use async_trait::async_trait;
use std::fmt::Debug;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep};
use tracing::trace;

/// Default spacing between registry requests (SEC asks for at most 10 per second).
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(150);

/// Gate awaited before each outbound request.
#[async_trait]
pub trait Throttle: Send + Sync + Debug {
    /// Waits until the next request may be sent.
    async fn wait(&self);
}

/// Throttle enforcing a fixed minimum interval between requests.
#[derive(Debug)]
pub struct FixedDelay {
    last_request: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl FixedDelay {
    /// Creates a throttle with the given minimum interval.
    #[must_use]
    pub fn new(min_interval: Duration) -> Self {
        Self {
            last_request: Mutex::new(None),
            min_interval,
        }
    }
}

impl Default for FixedDelay {
    fn default() -> Self {
        Self::new(DEFAULT_REQUEST_DELAY)
    }
}

#[async_trait]
impl Throttle for FixedDelay {
    async fn wait(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                let remaining = self.min_interval - elapsed;
                trace!(wait_ms = remaining.as_millis() as u64, "Throttling request");
                sleep(remaining).await;
            }
        }
        *last = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_request_is_not_delayed() {
        let throttle = FixedDelay::new(Duration::from_secs(5));
        let start = Instant::now();
        throttle.wait().await;
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_consecutive_requests_are_spaced() {
        let throttle = FixedDelay::new(Duration::from_millis(40));
        let start = Instant::now();
        throttle.wait().await;
        throttle.wait().await;
        throttle.wait().await;
        assert!(start.elapsed() >= Duration::from_millis(80));
    }
}
