//! Request spacing for the upstream API

use crate::constants::MIN_REQUEST_INTERVAL_MS;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};

/// Spaces out request starts by a fixed minimum interval
///
/// Callers queue on a fair async mutex that stays locked while the
/// caller at the head of the queue waits out the interval. Two concurrent
/// `acquire()` calls can therefore never compute their delay from the same
/// previous start.
///
/// Share one limiter between clients by wrapping it in an `Arc` and passing
/// it to `CoinGeckoClient::with_limiter`.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_start: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Creates a limiter with the given spacing
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_start: Mutex::new(None),
        }
    }

    /// Returns the configured spacing
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Waits until a new request may start, then records its start time
    pub async fn acquire(&self) {
        let mut last_start = self.last_start.lock().await;

        if let Some(previous) = *last_start {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                let wait = self.min_interval - elapsed;
                tracing::trace!(
                    wait_ms = wait.as_millis() as u64,
                    "Throttling upstream request"
                );
                sleep(wait).await;
            }
        }

        *last_start = Some(Instant::now());
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(Duration::from_millis(MIN_REQUEST_INTERVAL_MS))
    }
}
