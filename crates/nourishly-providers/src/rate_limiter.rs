// ABOUTME: Minimum-interval rate limiter owned by a single provider instance
// ABOUTME: Waits inline until the configured interval since the previous call has elapsed
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nourishly

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};
use tracing::debug;

/// Local throttle enforcing a minimum gap between outbound calls
///
/// The wait and the timestamp update happen while holding one async mutex,
/// so concurrent callers sharing an instance are serialized and the gap holds
/// between every pair of consecutive calls.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Limiter allowing one call per `min_interval`
    #[must_use]
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_call: Mutex::new(None),
        }
    }

    /// Configured interval
    #[must_use]
    pub const fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Wait until a call is allowed, then record it
    ///
    /// Returns how long the caller was held back.
    pub async fn acquire(&self) -> Duration {
        let mut last_call = self.last_call.lock().await;
        let mut waited = Duration::ZERO;

        if let Some(previous) = *last_call {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                waited = self.min_interval - elapsed;
                debug!(wait_ms = waited.as_millis() as u64, "Rate limit wait");
                sleep(waited).await;
            }
        }

        *last_call = Some(Instant::now());
        waited
    }

    /// Forget the previous call
    pub async fn reset(&self) {
        *self.last_call.lock().await = None;
    }
}
