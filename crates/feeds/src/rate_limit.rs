//! Token bucket rate limiter for the upstream APIs.
//!
//! One bucket per client. `acquire` sleeps until a token is available, so a
//! burst of roster fetches spreads out instead of tripping the upstream's
//! request limit.

use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use log::{debug, warn};
use tokio::time::Instant;

/// Default rate limit: 600 requests per minute.
const DEFAULT_REQUESTS_PER_MINUTE: u32 = 600;

/// Default bucket capacity (allows bursting).
const DEFAULT_BUCKET_CAPACITY: f64 = 20.0;

#[derive(Clone, Debug)]
pub struct RateLimitConfig {
    pub requests_per_minute: u32,
    pub burst_capacity: f64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_minute: DEFAULT_REQUESTS_PER_MINUTE,
            burst_capacity: DEFAULT_BUCKET_CAPACITY,
        }
    }
}

#[derive(Debug)]
struct TokenBucket {
    tokens: f64,
    last_update: Instant,
    /// Tokens per second.
    rate: f64,
    capacity: f64,
}

impl TokenBucket {
    fn new(config: &RateLimitConfig) -> Self {
        let capacity = config.burst_capacity.max(1.0);
        Self {
            tokens: capacity,
            last_update: Instant::now(),
            rate: f64::from(config.requests_per_minute.max(1)) / 60.0,
            capacity,
        }
    }

    fn refill(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_update).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.rate).min(self.capacity);
        self.last_update = now;
    }

    /// Takes a token if one is available, otherwise returns the wait.
    fn take_or_wait(&mut self) -> Option<Duration> {
        self.refill();
        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            None
        } else {
            Some(Duration::from_secs_f64((1.0 - self.tokens) / self.rate))
        }
    }
}

/// Thread-safe token bucket shared by every request of one client.
pub struct RateLimiter {
    name: &'static str,
    bucket: Mutex<TokenBucket>,
}

impl RateLimiter {
    pub fn new(name: &'static str, config: RateLimitConfig) -> Self {
        Self {
            name,
            bucket: Mutex::new(TokenBucket::new(&config)),
        }
    }

    fn lock_bucket(&self) -> MutexGuard<'_, TokenBucket> {
        self.bucket.lock().unwrap_or_else(|poisoned| {
            warn!("Rate limiter mutex for {} was poisoned, recovering", self.name);
            poisoned.into_inner()
        })
    }

    /// Takes a token without waiting.
    pub fn try_acquire(&self) -> bool {
        self.lock_bucket().take_or_wait().is_none()
    }

    /// Waits until a token is available, then takes it.
    pub async fn acquire(&self) {
        loop {
            // Guard dropped before sleeping.
            let wait = self.lock_bucket().take_or_wait();
            match wait {
                None => return,
                Some(wait) => {
                    debug!("Rate limited {}: waiting {:?}", self.name, wait);
                    tokio::time::sleep(wait).await;
                }
            }
        }
    }
}
