//! Fixed-delay pacing for image-server handshakes
//!
//! The upstream service limits how quickly handshakes may be requested, so
//! consecutive calls are spaced by a fixed minimum delay measured from the
//! start of one call to the start of the next. This is a throttle, not a
//! backoff: it applies whether or not the previous call succeeded.
//!
//! The spacing is a GCRA limiter with a one-cell burst, which admits exactly
//! one call per period. The clock is a type parameter so tests can drive it
//! with a fake clock instead of waiting on the wall clock.

use std::future::Future;
use std::time::Duration;

use governor::clock::{Clock, DefaultClock, FakeRelativeClock};
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use tracing::debug;

/// A governor clock that also knows how to wait
pub trait PacingClock: Clock + Send + Sync + 'static {
    /// Wait for `duration` as measured by this clock
    fn pause(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

impl PacingClock for DefaultClock {
    async fn pause(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

impl PacingClock for FakeRelativeClock {
    async fn pause(&self, duration: Duration) {
        self.advance(duration);
    }
}

type DirectLimiter<C> =
    RateLimiter<NotKeyed, InMemoryState, C, NoOpMiddleware<<C as Clock>::Instant>>;

/// Serializes calls to at most one per `delay`
pub struct RateGovernor<C: PacingClock = DefaultClock> {
    /// `None` when the delay is zero and pacing is disabled
    limiter: Option<DirectLimiter<C>>,
    clock: C,
    delay: Duration,
}

impl RateGovernor<DefaultClock> {
    /// Create a governor driven by the wall clock
    pub fn new(delay: Duration) -> Self {
        Self::with_clock(delay, DefaultClock::default())
    }
}

impl<C: PacingClock> RateGovernor<C> {
    /// Create a governor driven by `clock`
    pub fn with_clock(delay: Duration, clock: C) -> Self {
        let limiter =
            Quota::with_period(delay).map(|quota| RateLimiter::direct_with_clock(quota, &clock));

        Self {
            limiter,
            clock,
            delay,
        }
    }

    /// Configured minimum delay between call starts
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Wait until the next call may start
    ///
    /// The first call is admitted immediately; each later call is admitted no
    /// sooner than `delay` after the previous admission.
    pub async fn acquire(&self) {
        let Some(limiter) = &self.limiter else {
            return;
        };

        loop {
            match limiter.check() {
                Ok(()) => return,
                Err(not_until) => {
                    let wait = not_until.wait_time_from(self.clock.now());
                    debug!("Pacing handshake, waiting {:?}", wait);
                    self.clock.pause(wait).await;
                }
            }
        }
    }
}

impl<C: PacingClock> std::fmt::Debug for RateGovernor<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateGovernor")
            .field("delay", &self.delay)
            .field("enabled", &self.limiter.is_some())
            .finish()
    }
}
