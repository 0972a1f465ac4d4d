use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use governor::clock::DefaultClock;
use governor::state::direct::NotKeyed;
use governor::state::InMemoryState;
use governor::{Quota, RateLimiter};

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Smoothed rate budget applied to outgoing provider calls.
///
/// Calibration can fan out across symbols, and the upstream chart endpoint is
/// unauthenticated. The throttle spreads calls over the quota window so a
/// multi-asset request does not burst the provider.
#[derive(Clone)]
pub struct UpstreamThrottle {
    limiter: Arc<DirectRateLimiter>,
}

impl UpstreamThrottle {
    pub fn new(quota_window: Duration, quota_limit: u32) -> Self {
        Self {
            limiter: Arc::new(RateLimiter::direct(quota_from_window(
                quota_window,
                quota_limit,
            ))),
        }
    }

    /// Default budget: 30 chart calls per minute.
    pub fn chart_default() -> Self {
        Self::new(Duration::from_secs(60), 30)
    }

    /// Tries to spend one unit of budget. Returns the recommended wait when
    /// the budget is exhausted.
    pub fn acquire(&self) -> Result<(), Duration> {
        match self.limiter.check() {
            Ok(()) => Ok(()),
            Err(not_until) => {
                Err(not_until.wait_time_from(governor::clock::Clock::now(&DefaultClock::default())))
            }
        }
    }
}

fn quota_from_window(quota_window: Duration, quota_limit: u32) -> Quota {
    let safe_limit = quota_limit.max(1);
    let burst = NonZeroU32::new(safe_limit).expect("safe limit must be non-zero");

    let seconds_per_cell = (quota_window.as_secs_f64() / f64::from(safe_limit)).max(0.001);
    let period = Duration::from_secs_f64(seconds_per_cell);

    Quota::with_period(period)
        .expect("period is always greater than zero")
        .allow_burst(burst)
}
