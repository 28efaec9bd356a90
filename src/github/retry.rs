//! Retry and stall policies for the paginated collector.

use std::time::Duration;

/// Bounded retry with exponential backoff for direct-path failures.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Consecutive failed attempts on one link before giving up
    pub max_attempts: u32,
    /// Delay after the first failure
    pub initial_backoff: Duration,
    /// Upper bound for any single delay
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_backoff: Duration::from_millis(1000),
            max_backoff: Duration::from_millis(60_000),
        }
    }
}

impl RetryPolicy {
    /// Delay to wait after the `failures`-th consecutive failure (1-based).
    pub fn backoff(&self, failures: u32) -> Duration {
        let exponent = failures.saturating_sub(1).min(31);
        self.initial_backoff
            .saturating_mul(2u32.pow(exponent))
            .min(self.max_backoff)
    }
}

/// What to do when no credential has quota left.
#[derive(Debug, Clone)]
pub struct StallPolicy {
    /// Extra probe rounds before failing; 0 fails on the first empty round
    pub reprobes: u32,
    /// Sleep between probe rounds
    pub interval: Duration,
}

impl Default for StallPolicy {
    fn default() -> Self {
        Self {
            reprobes: 0,
            interval: Duration::from_secs(60),
        }
    }
}
