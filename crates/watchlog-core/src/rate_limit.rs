use std::time::{Duration, Instant};
use tracing::trace;

/// Paces outbound requests to the metadata provider.
pub trait RateLimiter {
    /// Blocks until the next request may start.
    fn acquire(&mut self);

    /// Records that a request has just finished.
    fn complete(&mut self);
}

/// Keeps at least `min_interval` between the end of one request and the
/// start of the next.
#[derive(Debug)]
pub struct FixedIntervalLimiter {
    min_interval: Duration,
    last_finished: Option<Instant>,
}

impl FixedIntervalLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_finished: None,
        }
    }

    pub fn from_millis(millis: u64) -> Self {
        Self::new(Duration::from_millis(millis))
    }
}

impl RateLimiter for FixedIntervalLimiter {
    fn acquire(&mut self) {
        let Some(last) = self.last_finished else {
            return;
        };
        let elapsed = last.elapsed();
        if elapsed < self.min_interval {
            let wait = self.min_interval - elapsed;
            trace!("Rate limit: waiting {:?}", wait);
            std::thread::sleep(wait);
        }
    }

    fn complete(&mut self) {
        self.last_finished = Some(Instant::now());
    }
}

/// No pacing at all. Used for stubbed providers.
#[derive(Debug, Default)]
pub struct Unlimited;

impl RateLimiter for Unlimited {
    fn acquire(&mut self) {}

    fn complete(&mut self) {}
}
