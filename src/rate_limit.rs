use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, instrument};

/// Request pacer for NCBI E-utilities usage policy
///
/// NCBI allows 3 requests per second without an API key and 10 with one.
/// Every call to [`acquire`](Self::acquire) waits until at least
/// `1 / rate` seconds have passed since the previous call returned.
#[derive(Clone, Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    next_slot: Arc<Mutex<Option<Instant>>>,
}

impl RateLimiter {
    /// Create a pacer allowing `rate` requests per second.
    /// Non-positive or non-finite rates disable pacing.
    pub fn new(rate: f64) -> Self {
        let min_interval = if rate.is_finite() && rate > 0.0 {
            Duration::from_secs_f64(1.0 / rate)
        } else {
            Duration::ZERO
        };

        Self {
            min_interval,
            next_slot: Arc::new(Mutex::new(None)),
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Wait for the next request slot
    #[instrument(skip(self))]
    pub async fn acquire(&self) {
        let mut next_slot = self.next_slot.lock().await;
        let now = Instant::now();

        if let Some(slot) = *next_slot {
            if slot > now {
                debug!(
                    wait_ms = (slot - now).as_millis() as u64,
                    "Waiting for request slot"
                );
                sleep_until(slot).await;
            }
        }

        *next_slot = Some(Instant::now() + self.min_interval);
    }
}
