//! Rate limiting implementation
//!
//! Two modes:
//! - minimum interval between consecutive requests, measured from the moment
//!   the previous request finished (successfully or not)
//! - token bucket, via the governor crate

use governor::clock::DefaultClock;
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as Governor};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tokio::time::Instant;
use tracing::trace;

/// Configuration for rate limiting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RateLimiterConfig {
    /// Keep at least `interval_ms` between the end of one request and the
    /// start of the next
    MinInterval {
        /// Minimum gap in milliseconds
        interval_ms: u64,
    },
    /// Token bucket
    TokenBucket {
        /// Maximum number of requests per second
        requests_per_second: u32,
        /// Burst size (max tokens in bucket)
        burst_size: u32,
    },
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self::MinInterval { interval_ms: 1000 }
    }
}

impl RateLimiterConfig {
    /// Minimum interval config
    pub fn min_interval(interval: Duration) -> Self {
        Self::MinInterval {
            interval_ms: interval.as_millis() as u64,
        }
    }

    /// Token bucket config
    pub fn token_bucket(requests_per_second: u32, burst_size: u32) -> Self {
        Self::TokenBucket {
            requests_per_second,
            burst_size,
        }
    }
}

#[derive(Clone)]
enum Limiter {
    MinInterval {
        interval: Duration,
        last_request: Arc<Mutex<Option<Instant>>>,
    },
    TokenBucket(Arc<Governor<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>>),
}

/// Rate limiter shared by every clone of a connection
#[derive(Clone)]
pub struct RateLimiter {
    limiter: Limiter,
}

impl RateLimiter {
    /// Create a new rate limiter with the given config
    pub fn new(config: &RateLimiterConfig) -> Self {
        let limiter = match config {
            RateLimiterConfig::MinInterval { interval_ms } => Limiter::MinInterval {
                interval: Duration::from_millis(*interval_ms),
                last_request: Arc::new(Mutex::new(None)),
            },
            RateLimiterConfig::TokenBucket {
                requests_per_second,
                burst_size,
            } => {
                let rate = NonZeroU32::new(*requests_per_second).unwrap_or(NonZeroU32::MIN);
                let burst = NonZeroU32::new(*burst_size).unwrap_or(NonZeroU32::MIN);
                let quota = Quota::per_second(rate).allow_burst(burst);
                Limiter::TokenBucket(Arc::new(Governor::direct(quota)))
            }
        };

        Self { limiter }
    }

    /// Wait until a request may be sent.
    ///
    /// Hold the returned permit for the duration of the request. In
    /// minimum-interval mode, dropping it records the completion time, so the
    /// next request is spaced from this one even if it failed.
    pub async fn acquire(&self) -> RatePermit {
        match &self.limiter {
            Limiter::MinInterval {
                interval,
                last_request,
            } => {
                let slot = Arc::clone(last_request).lock_owned().await;
                if let Some(previous) = *slot {
                    let elapsed = previous.elapsed();
                    if elapsed < *interval {
                        let wait = *interval - elapsed;
                        trace!("Rate limit: sleeping {wait:?}");
                        tokio::time::sleep(wait).await;
                    }
                }
                RatePermit { slot: Some(slot) }
            }
            Limiter::TokenBucket(limiter) => {
                limiter.until_ready().await;
                RatePermit { slot: None }
            }
        }
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.limiter {
            Limiter::MinInterval { interval, .. } => f
                .debug_struct("RateLimiter")
                .field("min_interval", interval)
                .finish(),
            Limiter::TokenBucket(_) => f.debug_struct("RateLimiter").finish_non_exhaustive(),
        }
    }
}

/// Permission to send one request
#[must_use = "the permit must be held until the request completes"]
pub struct RatePermit {
    slot: Option<OwnedMutexGuard<Option<Instant>>>,
}

impl Drop for RatePermit {
    fn drop(&mut self) {
        if let Some(slot) = self.slot.as_mut() {
            **slot = Some(Instant::now());
        }
    }
}
