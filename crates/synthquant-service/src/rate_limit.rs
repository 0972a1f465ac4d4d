//! Per-key fixed-window rate limiting.
//!
//! Each API key owns its own window counter behind its own mutex, so the
//! check-then-increment sequence is atomic per key while unrelated keys
//! never contend. The outer map lock is held only long enough to fetch or
//! insert a key's entry.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};

use crate::error::ServiceError;

/// Limiter tuning. Defaults to 10 requests per 60 second window.
#[derive(Debug, Clone)]
pub struct RateLimiterConfig {
    pub limit: u32,
    pub window: Duration,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            limit: 10,
            window: Duration::from_secs(60),
        }
    }
}

/// Outcome of one rate-limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed { remaining: u32 },
    Denied { retry_after: Duration },
}

impl Decision {
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allowed { .. })
    }

    /// Map a denial to the wire-level error, with `retry_after` rounded up
    /// to whole seconds and never below 1.
    pub fn into_result(self) -> Result<u32, ServiceError> {
        match self {
            Decision::Allowed { remaining } => Ok(remaining),
            Decision::Denied { retry_after } => Err(ServiceError::RateLimited {
                retry_after_secs: (retry_after.as_secs_f64().ceil() as u64).max(1),
            }),
        }
    }
}

struct KeyState {
    window_start: Instant,
    count: u32,
}

/// Fixed-window counter keyed by API key.
pub struct ApiKeyRateLimiter {
    config: RateLimiterConfig,
    keys: RwLock<HashMap<String, Arc<Mutex<KeyState>>>>,
}

impl ApiKeyRateLimiter {
    pub fn new(config: RateLimiterConfig) -> Self {
        Self {
            config,
            keys: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(RateLimiterConfig::default())
    }

    /// Atomically check the key's window and consume one slot.
    ///
    /// A request after the window has elapsed starts a fresh window with
    /// count 1; a request inside a full window is denied with the time left
    /// until the window rolls over.
    pub fn check_and_increment(&self, api_key: &str) -> Decision {
        let entry = self.entry_for(api_key);
        let mut state = entry.lock().expect("rate limit key state should not be poisoned");

        let now = Instant::now();
        let elapsed = now.duration_since(state.window_start);

        if elapsed >= self.config.window {
            state.window_start = now;
            state.count = 1;
            return Decision::Allowed {
                remaining: self.config.limit.saturating_sub(1),
            };
        }

        if state.count < self.config.limit {
            state.count += 1;
            return Decision::Allowed {
                remaining: self.config.limit - state.count,
            };
        }

        Decision::Denied {
            retry_after: self.config.window - elapsed,
        }
    }

    /// Report the key's current standing without consuming a slot.
    ///
    /// A key that has never been seen has its full quota; a key in a full
    /// window is reported denied with the same `retry_after` a real request
    /// would receive.
    pub fn status(&self, api_key: &str) -> Decision {
        let entry = {
            let keys = self.keys.read().expect("rate limit key map should not be poisoned");
            match keys.get(api_key) {
                Some(entry) => entry.clone(),
                None => {
                    return Decision::Allowed {
                        remaining: self.config.limit,
                    }
                }
            }
        };
        let state = entry.lock().expect("rate limit key state should not be poisoned");

        let elapsed = state.window_start.elapsed();
        if elapsed >= self.config.window {
            return Decision::Allowed {
                remaining: self.config.limit,
            };
        }
        if state.count < self.config.limit {
            return Decision::Allowed {
                remaining: self.config.limit - state.count,
            };
        }
        Decision::Denied {
            retry_after: self.config.window - elapsed,
        }
    }

    fn entry_for(&self, api_key: &str) -> Arc<Mutex<KeyState>> {
        {
            let keys = self.keys.read().expect("rate limit key map should not be poisoned");
            if let Some(entry) = keys.get(api_key) {
                return entry.clone();
            }
        }

        let mut keys = self.keys.write().expect("rate limit key map should not be poisoned");
        keys.entry(api_key.to_owned())
            .or_insert_with(|| {
                Arc::new(Mutex::new(KeyState {
                    // A zero-count window that started now, so the first
                    // request consumes slot 1 of the current window.
                    window_start: Instant::now(),
                    count: 0,
                }))
            })
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(limit: u32, window: Duration) -> ApiKeyRateLimiter {
        ApiKeyRateLimiter::new(RateLimiterConfig { limit, window })
    }

    #[test]
    fn allows_up_to_the_limit_then_denies() {
        let limiter = limiter(10, Duration::from_secs(60));

        for n in 0..10 {
            let decision = limiter.check_and_increment("key-a");
            assert!(decision.is_allowed(), "request {n} should pass");
        }

        match limiter.check_and_increment("key-a") {
            Decision::Denied { retry_after } => {
                assert!(retry_after <= Duration::from_secs(60));
                assert!(retry_after > Duration::ZERO);
            }
            Decision::Allowed { .. } => panic!("11th request should be denied"),
        }
    }

    #[test]
    fn keys_are_counted_independently() {
        let limiter = limiter(1, Duration::from_secs(60));

        assert!(limiter.check_and_increment("key-a").is_allowed());
        assert!(limiter.check_and_increment("key-b").is_allowed());
        assert!(!limiter.check_and_increment("key-a").is_allowed());
    }

    #[test]
    fn window_rollover_resets_the_count() {
        let limiter = limiter(2, Duration::from_millis(40));

        assert!(limiter.check_and_increment("key-a").is_allowed());
        assert!(limiter.check_and_increment("key-a").is_allowed());
        assert!(!limiter.check_and_increment("key-a").is_allowed());

        std::thread::sleep(Duration::from_millis(60));

        match limiter.check_and_increment("key-a") {
            Decision::Allowed { remaining } => assert_eq!(remaining, 1),
            Decision::Denied { .. } => panic!("new window should admit the request"),
        }
    }

    #[test]
    fn remaining_counts_down() {
        let limiter = limiter(3, Duration::from_secs(60));

        assert_eq!(
            limiter.check_and_increment("key-a"),
            Decision::Allowed { remaining: 2 }
        );
        assert_eq!(
            limiter.check_and_increment("key-a"),
            Decision::Allowed { remaining: 1 }
        );
        assert_eq!(
            limiter.check_and_increment("key-a"),
            Decision::Allowed { remaining: 0 }
        );
    }

    #[test]
    fn status_reports_without_consuming() {
        let limiter = limiter(3, Duration::from_secs(60));

        assert_eq!(
            limiter.status("key-a"),
            Decision::Allowed { remaining: 3 }
        );

        limiter.check_and_increment("key-a");
        for _ in 0..5 {
            assert_eq!(
                limiter.status("key-a"),
                Decision::Allowed { remaining: 2 }
            );
        }

        // The repeated peeks left the quota untouched
        assert_eq!(
            limiter.check_and_increment("key-a"),
            Decision::Allowed { remaining: 1 }
        );
    }

    #[test]
    fn status_of_a_full_window_is_denied() {
        let limiter = limiter(1, Duration::from_secs(60));
        assert!(limiter.check_and_increment("key-a").is_allowed());

        match limiter.status("key-a") {
            Decision::Denied { retry_after } => assert!(retry_after > Duration::ZERO),
            Decision::Allowed { .. } => panic!("full window should report denied"),
        }
    }

    #[test]
    fn denial_converts_to_a_ceiled_retry_after() {
        let allowed = Decision::Allowed { remaining: 4 };
        assert_eq!(allowed.into_result(), Ok(4));

        let denied = Decision::Denied {
            retry_after: Duration::from_millis(500),
        };
        assert_eq!(
            denied.into_result(),
            Err(ServiceError::RateLimited { retry_after_secs: 1 })
        );

        let denied = Decision::Denied {
            retry_after: Duration::from_millis(59_200),
        };
        assert_eq!(
            denied.into_result(),
            Err(ServiceError::RateLimited { retry_after_secs: 60 })
        );
    }

    #[test]
    fn concurrent_requests_never_exceed_the_limit() {
        let limiter = Arc::new(limiter(50, Duration::from_secs(60)));
        let mut handles = Vec::new();

        for _ in 0..8 {
            let limiter = limiter.clone();
            handles.push(std::thread::spawn(move || {
                let mut allowed = 0_u32;
                for _ in 0..25 {
                    if limiter.check_and_increment("shared").is_allowed() {
                        allowed += 1;
                    }
                }
                allowed
            }));
        }

        let total: u32 = handles
            .into_iter()
            .map(|handle| handle.join().expect("worker thread should not panic"))
            .sum();
        assert_eq!(total, 50);
    }
}
