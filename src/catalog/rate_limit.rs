//! Request pacing.
//!
//! Goodreads asks clients to keep to one request per second. Every request
//! made by the client runs inside a [`Turn`]:
//! 1. [`RateLimit::acquire`] waits for the previous turn to finish and for
//!    the interval since the last call to pass
//! 2. the request is sent
//! 3. [`Turn::finish`] stamps the call time and pauses, success or failure
//!
//! The turn is held across all three steps, so two requests through the same
//! limiter never overlap and never start closer than the interval, even when
//! issued concurrently.
//!
//! This is a flat delay: no bursts, no backoff. State lives in the limiter
//! instance, so separate clients don't throttle each other.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, MutexGuard};
use tokio::time::Instant;

/// Default minimum gap between two requests
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(1000);

/// Gate around each outbound call.
///
/// Implement this trait to drop the delay in tests.
#[async_trait]
pub trait RateLimit: Send + Sync {
    /// Wait until a call is allowed and claim the turn for it
    async fn acquire<'a>(&'a self) -> Turn<'a>;
}

/// Exclusive right to make one call. Finish it once the call returns.
pub struct Turn<'a> {
    slot: Option<(MutexGuard<'a, Option<Instant>>, Duration)>,
}

impl Turn<'_> {
    /// A turn that imposes no pacing
    pub fn unpaced() -> Self {
        Self { slot: None }
    }

    /// Record the call and hold the turn for the rest of the interval
    pub async fn finish(self) {
        if let Some((mut last_call, interval)) = self.slot {
            let now = Instant::now();
            *last_call = Some(now);
            tokio::time::sleep_until(now + interval).await;
        }
    }
}

/// Fixed-interval limiter
#[derive(Debug)]
pub struct IntervalLimiter {
    interval: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl IntervalLimiter {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_call: Mutex::new(None),
        }
    }
}

impl Default for IntervalLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL)
    }
}

#[async_trait]
impl RateLimit for IntervalLimiter {
    async fn acquire<'a>(&'a self) -> Turn<'a> {
        let last_call = self.last_call.lock().await;
        // A turn whose pause was cut short still owes the rest of the interval
        if let Some(last) = *last_call {
            tokio::time::sleep_until(last + self.interval).await;
        }
        Turn {
            slot: Some((last_call, self.interval)),
        }
    }
}

/// Limiter that never waits
#[cfg(test)]
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDelay;

#[cfg(test)]
#[async_trait]
impl RateLimit for NoDelay {
    async fn acquire<'a>(&'a self) -> Turn<'a> {
        Turn::unpaced()
    }
}
