//! Request pacing shared by all calls made through one client.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};

/// Hands out request slots no closer together than the configured interval.
#[derive(Clone, Debug)]
pub struct RateLimiter {
    interval: Duration,
    next_slot: Arc<Mutex<Option<Instant>>>,
}

impl RateLimiter {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_slot: Arc::new(Mutex::new(None)),
        }
    }

    /// Waits for the next free slot and reserves the one after it.
    pub async fn acquire(&self) {
        let mut slot = self.next_slot.lock().await;
        if let Some(at) = *slot {
            sleep_until(at).await;
        }
        if self.interval.is_zero() {
            return;
        }
        *slot = Some(Instant::now() + self.interval);
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}
