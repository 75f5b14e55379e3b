//! Outbound request throttle.
//!
//! One throttle is shared by every store built from the same [`crate::Api`].
//! It caps concurrent in-flight requests and paces request starts to a
//! fixed number per sliding window.

use crate::config::ThrottleConfig;
use crate::error::{ApiError, ApiResult};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedSemaphorePermit, Semaphore};
use tokio::time::{sleep, Instant};
use tracing::trace;

/// Concurrency cap plus start-rate limiter.
#[derive(Debug)]
pub struct Throttle {
    permits: Arc<Semaphore>,
    starts: Mutex<VecDeque<Instant>>,
    rate: usize,
    window: Duration,
}

/// Held for the duration of one request; releases its slot on drop.
#[derive(Debug)]
pub struct ThrottlePermit {
    _permit: OwnedSemaphorePermit,
}

impl Throttle {
    pub fn new(config: &ThrottleConfig) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(config.concurrent.max(1))),
            starts: Mutex::new(VecDeque::new()),
            rate: (config.rate as usize).max(1),
            window: Duration::from_millis(config.rate_per_ms.max(1)),
        }
    }

    /// Waits for a free slot and a start within the rate window.
    pub async fn acquire(&self) -> ApiResult<ThrottlePermit> {
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|_| ApiError::Config("request throttle is closed".to_string()))?;

        loop {
            let mut starts = self.starts.lock().await;
            let now = Instant::now();
            while starts
                .front()
                .is_some_and(|start| now.duration_since(*start) >= self.window)
            {
                starts.pop_front();
            }

            if starts.len() < self.rate {
                starts.push_back(now);
                break;
            }

            let wait = starts
                .front()
                .map_or(self.window, |oldest| self.window - now.duration_since(*oldest));
            drop(starts);
            trace!("Throttle window full, waiting {:?}", wait);
            sleep(wait).await;
        }

        Ok(ThrottlePermit { _permit: permit })
    }

    /// Free concurrency slots right now.
    pub fn available_slots(&self) -> usize {
        self.permits.available_permits()
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Self::new(&ThrottleConfig::default())
    }
}
