//! In-memory rate limiting for password attempts.
//!
//! DESIGN
//! ======
//! Sliding-window counters backed by `HashMap<String, VecDeque<Instant>>`.
//! Two limits are enforced on login, register and reauthenticate:
//! - Per key (normalized email, or user id for reauthentication): 10/5min
//! - Global: 300/min
//!
//! Every attempt counts, successful or not. State is per process and resets
//! on restart.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use crate::config::env_parse;

const DEFAULT_PER_KEY_LIMIT: usize = 10;
const DEFAULT_PER_KEY_WINDOW_SECS: u64 = 300;
const DEFAULT_GLOBAL_LIMIT: usize = 300;
const DEFAULT_GLOBAL_WINDOW_SECS: u64 = 60;

#[derive(Clone, Copy, Debug)]
pub struct AuthLimits {
    pub per_key_limit: usize,
    pub per_key_window: Duration,
    pub global_limit: usize,
    pub global_window: Duration,
}

impl AuthLimits {
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            per_key_limit: env_parse("AUTH_RATE_LIMIT_PER_KEY", DEFAULT_PER_KEY_LIMIT),
            per_key_window: Duration::from_secs(env_parse(
                "AUTH_RATE_LIMIT_PER_KEY_WINDOW_SECS",
                DEFAULT_PER_KEY_WINDOW_SECS,
            )),
            global_limit: env_parse("AUTH_RATE_LIMIT_GLOBAL", DEFAULT_GLOBAL_LIMIT),
            global_window: Duration::from_secs(env_parse(
                "AUTH_RATE_LIMIT_GLOBAL_WINDOW_SECS",
                DEFAULT_GLOBAL_WINDOW_SECS,
            )),
        }
    }
}

impl Default for AuthLimits {
    fn default() -> Self {
        Self {
            per_key_limit: DEFAULT_PER_KEY_LIMIT,
            per_key_window: Duration::from_secs(DEFAULT_PER_KEY_WINDOW_SECS),
            global_limit: DEFAULT_GLOBAL_LIMIT,
            global_window: Duration::from_secs(DEFAULT_GLOBAL_WINDOW_SECS),
        }
    }
}

// =============================================================================
// ERROR TYPE
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    #[error("too many attempts (max {limit} per {window_secs}s)")]
    PerKeyExceeded { limit: usize, window_secs: u64 },
    #[error("too many sign-in attempts overall (max {limit} per {window_secs}s)")]
    GlobalExceeded { limit: usize, window_secs: u64 },
}

// =============================================================================
// RATE LIMITER
// =============================================================================

#[derive(Clone)]
pub struct AuthRateLimiter {
    inner: Arc<Mutex<LimiterInner>>,
    limits: AuthLimits,
}

#[derive(Default)]
struct LimiterInner {
    per_key: HashMap<String, VecDeque<Instant>>,
    global: VecDeque<Instant>,
}

impl AuthRateLimiter {
    #[must_use]
    pub fn new(limits: AuthLimits) -> Self {
        Self { inner: Arc::new(Mutex::new(LimiterInner::default())), limits }
    }

    /// Check both limits for `key`, then record the attempt.
    ///
    /// # Errors
    ///
    /// Returns which limit is exhausted; the attempt is not recorded.
    pub fn check_and_record(&self, key: &str) -> Result<(), RateLimitError> {
        self.check_and_record_at(key, Instant::now())
    }

    fn check_and_record_at(&self, key: &str, now: Instant) -> Result<(), RateLimitError> {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let limits = self.limits;

        prune_window(&mut inner.global, now, limits.global_window);
        if inner.global.len() >= limits.global_limit {
            return Err(RateLimitError::GlobalExceeded {
                limit: limits.global_limit,
                window_secs: limits.global_window.as_secs(),
            });
        }

        let attempts = inner.per_key.entry(key.to_owned()).or_default();
        prune_window(attempts, now, limits.per_key_window);
        if attempts.len() >= limits.per_key_limit {
            return Err(RateLimitError::PerKeyExceeded {
                limit: limits.per_key_limit,
                window_secs: limits.per_key_window.as_secs(),
            });
        }

        attempts.push_back(now);
        inner.global.push_back(now);
        // Keys whose window fully expired are dropped lazily here.
        inner.per_key.retain(|_, q| !q.is_empty());
        Ok(())
    }
}

fn prune_window(deque: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    while let Some(&front) = deque.front() {
        if now.duration_since(front) > window {
            deque.pop_front();
        } else {
            break;
        }
    }
}

#[cfg(test)]
#[path = "rate_limit_test.rs"]
mod tests;
